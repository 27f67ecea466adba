use crate::sink;
use anyhow::{Context, Result};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::prelude::{DataFrame, NdJsonReadOptions, ParquetReadOptions, SessionContext};

/// Song metadata files sit three directories deep under the input root.
pub const SONG_DATA_GLOB: &str = "song_data/*/*/*/*.json";
/// Event log files sit two directories deep under the input root.
pub const LOG_DATA_GLOB: &str = "log_data/*/*/*.json";

/// Fixed schema of the raw song metadata records. Rows that do not decode
/// against it are a reader-level error that aborts the run.
pub fn song_schema() -> Schema {
    Schema::new(vec![
        Field::new("song_id", DataType::Utf8, true),
        Field::new("title", DataType::Utf8, true),
        Field::new("year", DataType::Int32, true),
        Field::new("duration", DataType::Float64, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("artist_name", DataType::Utf8, true),
        Field::new("artist_location", DataType::Utf8, true),
        Field::new("artist_latitude", DataType::Float64, true),
        Field::new("artist_longitude", DataType::Float64, true),
    ])
}

/// Loads the raw song metadata as one JSON object per line, with the fixed schema.
pub async fn read_song_records(ctx: &SessionContext, input_root: &str) -> Result<DataFrame> {
    let pattern = format!("{}/{SONG_DATA_GLOB}", input_root.trim_end_matches('/'));
    let schema = song_schema();
    let options = NdJsonReadOptions::default().schema(&schema);
    ctx.read_json(pattern.clone(), options)
        .await
        .with_context(|| format!("reading song records from {pattern}"))
}

/// Loads the raw event logs with an inferred schema; unknown extra fields are
/// tolerated and carried along.
pub async fn read_event_records(ctx: &SessionContext, input_root: &str) -> Result<DataFrame> {
    let pattern = format!("{}/{LOG_DATA_GLOB}", input_root.trim_end_matches('/'));
    ctx.read_json(pattern.clone(), NdJsonReadOptions::default())
        .await
        .with_context(|| format!("reading event records from {pattern}"))
}

/// Reads the songs dimension back from the warehouse output, restoring the
/// hive partition columns the writer moved into the directory layout.
pub async fn read_song_dim_output(ctx: &SessionContext, output_root: &str) -> Result<DataFrame> {
    let path = format!(
        "{}/{}/",
        output_root.trim_end_matches('/'),
        sink::SONGS_TABLE
    );
    let options = ParquetReadOptions::default().table_partition_cols(vec![
        ("year".to_owned(), DataType::Int32),
        ("artist_id".to_owned(), DataType::Utf8),
    ]);
    ctx.read_parquet(path.clone(), options)
        .await
        .with_context(|| format!("reading songs dimension from {path}"))
}

/// Reads the artists dimension back from the warehouse output.
pub async fn read_artist_dim_output(ctx: &SessionContext, output_root: &str) -> Result<DataFrame> {
    let path = format!(
        "{}/{}/",
        output_root.trim_end_matches('/'),
        sink::ARTISTS_TABLE
    );
    ctx.read_parquet(path.clone(), ParquetReadOptions::default())
        .await
        .with_context(|| format!("reading artists dimension from {path}"))
}
