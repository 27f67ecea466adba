//! Playlake ETL: reshapes song metadata and play-event logs into a partitioned star schema.
//!
//! All parsing, joins, deduplication and Parquet writing are delegated to
//! DataFusion; this crate owns the column-mapping contract between the raw
//! NDJSON sources and the warehouse tables.

// crate-specific lint exceptions:
#![allow(clippy::missing_errors_doc)]

/// Run configuration loaded from a local TOML file
pub mod config;
/// Session context and runtime environment for the dataframe engine
pub mod context;
/// Dimension builders for the songs, artists and users tables
pub mod dimensions;
/// Songplays fact assembly and foreign-key resolution
pub mod fact;
/// Connection to the input and output object stores
pub mod lake;
/// End-to-end orchestration of a run
pub mod pipeline;
/// Partitioned, overwriting Parquet writer
pub mod sink;
/// Readers for the raw NDJSON sources and the written dimension output
pub mod source;
/// Calendar decomposition of event timestamps
pub mod time;
