use crate::lake::WarehouseConnection;
use crate::{dimensions, fact, sink, source, time};
use anyhow::{Context, Result};
use datafusion::prelude::{SessionContext, col, lit};
use tracing::info;

/// Loads the raw song metadata and writes the songs and artists dimensions.
pub async fn process_song_data(ctx: &SessionContext, lake: &WarehouseConnection) -> Result<()> {
    info!("processing song data from {}", lake.input_root());
    let song_records = source::read_song_records(ctx, lake.input_root()).await?;
    ctx.register_table("song_records", song_records.into_view())
        .with_context(|| "registering song_records")?;

    let song_dim = dimensions::build_song_dim(ctx).await?;
    sink::write_table(lake, song_dim, sink::SONGS_TABLE, &["year", "artist_id"]).await?;

    let artist_dim = dimensions::build_artist_dim(ctx).await?;
    sink::write_table(lake, artist_dim, sink::ARTISTS_TABLE, &[]).await?;
    Ok(())
}

/// Loads the event logs and writes the users and time dimensions and the
/// songplays fact table.
pub async fn process_log_data(ctx: &SessionContext, lake: &WarehouseConnection) -> Result<()> {
    info!("processing log data from {}", lake.input_root());
    let events = source::read_event_records(ctx, lake.input_root()).await?;
    // only song plays feed the star schema
    let events = events
        .filter(col("page").eq(lit("NextSong")))
        .with_context(|| "filtering NextSong events")?;
    ctx.register_table("event_records", events.into_view())
        .with_context(|| "registering event_records")?;

    let user_dim = dimensions::build_user_dim(ctx).await?;
    sink::write_table(lake, user_dim, sink::USERS_TABLE, &[]).await?;

    let time_dim = time::build_time_dim(ctx).await?;
    ctx.register_table("time_dim", time_dim.clone().into_view())
        .with_context(|| "registering time_dim")?;
    sink::write_table(lake, time_dim, sink::TIME_TABLE, &["year", "month"]).await?;

    // the fact join resolves against the dimensions as written to the
    // warehouse, not against the in-memory frames
    let song_dim = source::read_song_dim_output(ctx, lake.output_root()).await?;
    ctx.register_table("song_dim", song_dim.into_view())
        .with_context(|| "registering song_dim")?;
    let artist_dim = source::read_artist_dim_output(ctx, lake.output_root()).await?;
    ctx.register_table("artist_dim", artist_dim.into_view())
        .with_context(|| "registering artist_dim")?;

    let songplays = fact::build_songplays(ctx).await?;
    sink::write_table(lake, songplays, sink::SONGPLAYS_TABLE, &["year", "month"]).await?;
    Ok(())
}

/// Runs the whole pipeline. Songs are processed and written strictly before
/// log processing begins, because the fact assembly reads the songs and
/// artists output back from the warehouse. Any stage error aborts the run.
pub async fn run(ctx: &SessionContext, lake: &WarehouseConnection) -> Result<()> {
    process_song_data(ctx, lake)
        .await
        .with_context(|| "processing song data")?;
    process_log_data(ctx, lake)
        .await
        .with_context(|| "processing log data")?;
    info!("run complete");
    Ok(())
}
