use anyhow::{Context, Result};
use datafusion::prelude::{DataFrame, SessionContext};

/// Builds the users dimension from the NextSong events registered as `event_records`.
///
/// Duplicate rows are dropped on the raw columns first; the raw string id is
/// then trimmed and cast to an integer. A non-numeric id fails the cast and
/// aborts the run rather than being coerced or dropped.
pub async fn build_user_dim(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.sql(
        r#"
        SELECT CAST(TRIM("userId") AS INT) AS user_id,
               "firstName" AS first_name,
               "lastName" AS last_name,
               gender,
               level
        FROM (
            SELECT DISTINCT "userId", "firstName", "lastName", gender, level
            FROM event_records
        ) AS raw_users
        "#,
    )
    .await
    .with_context(|| "building users dimension")
}

/// Builds the songs dimension from the raw records registered as `song_records`.
/// Empty-string sentinel ids are filtered out before dedup.
pub async fn build_song_dim(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.sql(
        r"
        SELECT DISTINCT song_id, title, artist_id, year, duration
        FROM song_records
        WHERE song_id <> ''
        ",
    )
    .await
    .with_context(|| "building songs dimension")
}

/// Builds the artists dimension from the artist columns of `song_records`.
pub async fn build_artist_dim(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.sql(
        r"
        SELECT DISTINCT artist_id,
               artist_name AS name,
               artist_location AS location,
               artist_latitude AS latitude,
               artist_longitude AS longitude
        FROM song_records
        WHERE artist_id <> ''
        ",
    )
    .await
    .with_context(|| "building artists dimension")
}
