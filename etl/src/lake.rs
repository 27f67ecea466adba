use crate::config::{AwsKeys, EtlConfig};
use anyhow::{Context, Result};
use object_store::ObjectStore;
use object_store::path::Path;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Handles on the object stores holding the raw input tree and the warehouse output.
///
/// The output store and prefix are kept separately from the session context so
/// the sink can implement overwrite semantics (list + delete) directly against
/// the store.
#[derive(Clone)]
pub struct WarehouseConnection {
    pub input_url: Url,
    pub output_url: Url,
    pub input_store: Arc<dyn ObjectStore>,
    pub output_store: Arc<dyn ObjectStore>,
    pub output_prefix: Path,
}

impl WarehouseConnection {
    /// Input root URL without a trailing slash, ready for glob suffixes.
    pub fn input_root(&self) -> &str {
        self.input_url.as_str().trim_end_matches('/')
    }

    /// Output root URL without a trailing slash, ready for table path suffixes.
    pub fn output_root(&self) -> &str {
        self.output_url.as_str().trim_end_matches('/')
    }
}

fn make_store(url: &Url, keys: Option<&AwsKeys>) -> Result<(Arc<dyn ObjectStore>, Path)> {
    let (store, path) = match (url.scheme(), keys) {
        ("s3", Some(keys)) => object_store::parse_url_opts(
            url,
            [
                ("aws_access_key_id", keys.access_key_id.clone()),
                ("aws_secret_access_key", keys.secret_access_key.clone()),
            ],
        )
        .with_context(|| format!("building s3 store for {url}"))?,
        _ => object_store::parse_url(url).with_context(|| format!("building store for {url}"))?,
    };
    Ok((Arc::from(store), path))
}

pub fn connect_to_warehouse(config: &EtlConfig) -> Result<WarehouseConnection> {
    let input_url = Url::parse(&config.pipeline.input_root)
        .with_context(|| format!("parsing input root {}", config.pipeline.input_root))?;
    let output_url = Url::parse(&config.pipeline.output_root)
        .with_context(|| format!("parsing output root {}", config.pipeline.output_root))?;
    let (input_store, _) = make_store(&input_url, config.aws.as_ref())?;
    let (output_store, output_prefix) = make_store(&output_url, config.aws.as_ref())?;
    info!(
        "connected to warehouse: input={} output={}",
        input_url, output_url
    );
    Ok(WarehouseConnection {
        input_url,
        output_url,
        input_store,
        output_store,
        output_prefix,
    })
}
