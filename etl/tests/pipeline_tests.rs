
use datafusion::arrow::array::{Array, Int32Array, Int64Array, StringArray};
use playlake_etl::context::make_session_context;
use playlake_etl::pipeline;
use test_helpers::{
    TS_MATCHED_PLAY, TS_UNMATCHED_PLAY, collect_one, count_rows, make_default_warehouse,
    open_output_session,
};

#[tokio::test]
async fn test_song_dim_drops_sentinels_and_duplicates() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    let out = open_output_session(&warehouse.lake).await;
    let batch = collect_one(&out, "SELECT song_id, title, year FROM songs ORDER BY song_id").await;
    let song_ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("song_id column");
    assert_eq!(song_ids.len(), 2);
    assert_eq!(song_ids.value(0), "SOAAA01");
    assert_eq!(song_ids.value(1), "SOBBB02");
    for i in 0..song_ids.len() {
        assert!(!song_ids.value(i).is_empty());
    }

    // the duplicated source line collapsed to one row
    let distinct = count_rows(
        &out,
        "SELECT COUNT(*) FROM (SELECT DISTINCT song_id, title, artist_id, year, duration FROM songs) AS t",
    )
    .await;
    let total = count_rows(&out, "SELECT COUNT(*) FROM songs").await;
    assert_eq!(distinct, total);
}

#[tokio::test]
async fn test_artist_dim_drops_sentinels_and_duplicates() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    let out = open_output_session(&warehouse.lake).await;
    let batch = collect_one(&out, "SELECT artist_id, name FROM artists").await;
    let artist_ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("artist_id column");
    // three source rows carry the same artist values, the sentinel is filtered
    assert_eq!(artist_ids.len(), 1);
    assert_eq!(artist_ids.value(0), "ARAAA01");
    let names = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("name column");
    assert_eq!(names.value(0), "Test Artist");
}

#[tokio::test]
async fn test_user_dim_parses_padded_ids() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    let out = open_output_session(&warehouse.lake).await;
    let batch = collect_one(
        &out,
        "SELECT user_id, first_name, last_name, gender, level FROM users",
    )
    .await;
    let user_ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .expect("user_id column");
    // both NextSong events come from the same user; the Home event's user
    // must not appear
    assert_eq!(user_ids.len(), 1);
    assert_eq!(user_ids.value(0), 42);
    let levels = batch
        .column(4)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("level column");
    assert_eq!(levels.value(0), "paid");
}

#[tokio::test]
async fn test_fact_enrichment_resolves_exact_matches() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    let out = open_output_session(&warehouse.lake).await;
    let batch = collect_one(
        &out,
        "SELECT start_time, song_id, artist_id, user_id, year, month \
         FROM songplays ORDER BY start_time",
    )
    .await;
    let start_times = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("start_time column");
    let song_ids = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("song_id column");
    let artist_ids = batch
        .column(2)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("artist_id column");

    // both NextSong events survive, the Home event does not
    assert_eq!(start_times.len(), 2);

    // exact title/length/name match resolves both foreign keys
    assert_eq!(start_times.value(0), TS_MATCHED_PLAY);
    assert_eq!(song_ids.value(0), "SOAAA01");
    assert_eq!(artist_ids.value(0), "ARAAA01");

    // the unmatched play is kept with null references, not dropped
    assert_eq!(start_times.value(1), TS_UNMATCHED_PLAY);
    assert!(song_ids.is_null(1));
    assert!(artist_ids.is_null(1));

    let years = batch
        .column(4)
        .as_any()
        .downcast_ref::<Int32Array>()
        .expect("year column");
    let months = batch
        .column(5)
        .as_any()
        .downcast_ref::<Int32Array>()
        .expect("month column");
    for i in 0..2 {
        assert_eq!(years.value(i), 2018);
        assert_eq!(months.value(i), 11);
    }
}

#[tokio::test]
async fn test_songplay_ids_are_unique_within_a_run() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    let out = open_output_session(&warehouse.lake).await;
    let distinct = count_rows(
        &out,
        "SELECT COUNT(*) FROM (SELECT DISTINCT songplay_id FROM songplays) AS t",
    )
    .await;
    let total = count_rows(&out, "SELECT COUNT(*) FROM songplays").await;
    assert_eq!(distinct, total);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_non_play_events_filtered_everywhere() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    let out = open_output_session(&warehouse.lake).await;
    // ts of the Home event
    let in_time = count_rows(
        &out,
        "SELECT COUNT(*) FROM time_dim WHERE start_time = 1541717800000",
    )
    .await;
    assert_eq!(in_time, 0);
    let in_users = count_rows(&out, "SELECT COUNT(*) FROM users WHERE user_id = 77").await;
    assert_eq!(in_users, 0);
    let in_plays = count_rows(
        &out,
        "SELECT COUNT(*) FROM songplays WHERE start_time = 1541717800000",
    )
    .await;
    assert_eq!(in_plays, 0);
}

#[tokio::test]
async fn test_partitioned_output_layout() {
    let warehouse = make_default_warehouse();
    let ctx = make_session_context(&warehouse.lake).expect("make_session_context");
    pipeline::run(&ctx, &warehouse.lake).await.expect("run");

    // hive-style directories carry the partition values
    let songs_2018 = warehouse
        .output
        .path()
        .join("songs/songs.parquet/year=2018/artist_id=ARAAA01");
    assert!(songs_2018.is_dir(), "missing {}", songs_2018.display());
    let songs_2017 = warehouse
        .output
        .path()
        .join("songs/songs.parquet/year=2017/artist_id=ARAAA01");
    assert!(songs_2017.is_dir(), "missing {}", songs_2017.display());
    let time_nov = warehouse
        .output
        .path()
        .join("time/time.parquet/year=2018/month=11");
    assert!(time_nov.is_dir(), "missing {}", time_nov.display());
    let plays_nov = warehouse
        .output
        .path()
        .join("songplays/songplays.parquet/year=2018/month=11");
    assert!(plays_nov.is_dir(), "missing {}", plays_nov.display());
}
