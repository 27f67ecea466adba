//! Playlake ETL batch runner

use anyhow::{Context, Result};
use clap::Parser;
use playlake_etl::config::EtlConfig;
use playlake_etl::context::make_session_context;
use playlake_etl::lake::connect_to_warehouse;
use playlake_etl::pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "Playlake ETL")]
#[clap(about = "Batch job loading song-play logs into the star schema", version, author)]
struct Cli {
    /// Path to the TOML file holding the object store credentials and roots
    #[clap(long, default_value = "etl.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    let config = EtlConfig::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    let lake = connect_to_warehouse(&config).with_context(|| "connecting to warehouse")?;
    let ctx = make_session_context(&lake).with_context(|| "make_session_context")?;
    pipeline::run(&ctx, &lake).await
}
