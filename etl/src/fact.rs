use anyhow::{Context, Result};
use datafusion::prelude::{DataFrame, SessionContext};

/// Assembles the songplays fact table.
///
/// Expects four views on the context: `event_records` (NextSong events),
/// `time_dim` (in memory), and `song_dim` / `artist_dim` read back from the
/// warehouse output.
///
/// `songplay_id` is a surrogate assigned per run; it is unique within the run
/// but carries no ordering or density meaning. The time join is inner, so a
/// play whose timestamp has no time dimension row is dropped; the song and
/// artist joins are left joins, so unmatched plays keep null foreign keys
/// instead of being dropped. Title and name matching is exact string
/// equality, with no normalization.
pub async fn build_songplays(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.sql(
        r#"
        WITH plays AS (
            SELECT row_number() OVER () AS songplay_id,
                   ts AS start_time,
                   CAST(TRIM("userId") AS INT) AS user_id,
                   level,
                   length,
                   song,
                   artist,
                   "sessionId" AS session_id,
                   location,
                   "userAgent" AS user_agent
            FROM event_records
        )
        SELECT plays.songplay_id,
               plays.start_time,
               plays.user_id,
               plays.level,
               plays.length,
               plays.session_id,
               plays.location,
               plays.user_agent,
               song_dim.artist_id,
               song_dim.song_id,
               time_dim.year,
               time_dim.month
        FROM plays
        JOIN time_dim ON plays.start_time = time_dim.start_time
        LEFT JOIN song_dim ON plays.song = song_dim.title
            AND plays.length = song_dim.duration
        LEFT JOIN artist_dim ON plays.artist = artist_dim.name
            AND song_dim.artist_id = artist_dim.artist_id
        "#,
    )
    .await
    .with_context(|| "building songplays fact table")
}
