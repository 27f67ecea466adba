use crate::lake::WarehouseConnection;
use anyhow::{Context, Result};
use datafusion::dataframe::{DataFrame, DataFrameWriteOptions};
use futures::TryStreamExt;
use object_store::path::Path;
use tracing::info;

pub const SONGS_TABLE: &str = "songs/songs.parquet";
pub const ARTISTS_TABLE: &str = "artists/artists.parquet";
pub const USERS_TABLE: &str = "users/users.parquet";
pub const TIME_TABLE: &str = "time/time.parquet";
pub const SONGPLAYS_TABLE: &str = "songplays/songplays.parquet";

/// Persists a table under the output root as Parquet, optionally hive-partitioned.
///
/// Overwrite semantics: everything under the table prefix is deleted first,
/// then the new files are written. There is no atomicity across the tables of
/// a run; an interruption can leave some tables stale and others fresh.
pub async fn write_table(
    lake: &WarehouseConnection,
    table: DataFrame,
    table_path: &str,
    partition_by: &[&str],
) -> Result<()> {
    clear_table(lake, table_path)
        .await
        .with_context(|| format!("clearing previous contents of {table_path}"))?;
    let dest = format!("{}/{}/", lake.output_root(), table_path);
    let mut options = DataFrameWriteOptions::new();
    if !partition_by.is_empty() {
        options = options.with_partition_by(partition_by.iter().map(|c| (*c).to_owned()).collect());
    }
    table
        .write_parquet(&dest, options, None)
        .await
        .with_context(|| format!("writing table to {dest}"))?;
    info!("wrote table {table_path}");
    Ok(())
}

async fn clear_table(lake: &WarehouseConnection, table_path: &str) -> Result<()> {
    let prefix = Path::from(format!("{}/{}", lake.output_prefix, table_path));
    let locations: Vec<Path> = lake
        .output_store
        .list(Some(&prefix))
        .map_ok(|meta| meta.location)
        .try_collect()
        .await
        .with_context(|| format!("listing objects under {prefix}"))?;
    for location in locations {
        lake.output_store
            .delete(&location)
            .await
            .with_context(|| format!("deleting {location}"))?;
    }
    Ok(())
}
