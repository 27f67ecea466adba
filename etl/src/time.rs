use anyhow::{Context, Result};
use datafusion::prelude::{DataFrame, SessionContext};

/// Builds the time dimension from the NextSong events registered as `event_records`.
///
/// `ts` is an epoch-millisecond value; integer division by 1000 truncates to
/// epoch seconds before the calendar decomposition. The wall clock is pinned
/// to UTC so the derived columns do not depend on the machine's local zone.
/// The original millisecond value is kept as the `start_time` key.
pub async fn build_time_dim(ctx: &SessionContext) -> Result<DataFrame> {
    ctx.sql(
        r"
        SELECT start_time,
               CAST(date_part('hour', start_dt) AS INT) AS hour,
               CAST(date_part('day', start_dt) AS INT) AS day,
               CAST(date_part('week', start_dt) AS INT) AS week,
               CAST(date_part('month', start_dt) AS INT) AS month,
               CAST(date_part('year', start_dt) AS INT) AS year,
               to_char(start_dt, '%a') AS weekday
        FROM (
            SELECT DISTINCT ts AS start_time,
                   to_timestamp_seconds(ts / 1000) AS start_dt
            FROM event_records
        ) AS event_times
        ",
    )
    .await
    .with_context(|| "building time dimension")
}
