use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_INPUT_ROOT: &str = "s3://udacity-dend";
pub const DEFAULT_OUTPUT_ROOT: &str = "s3://spark-dev2/spark-project";

/// Credentials for the remote object store holding both the input and output roots.
#[derive(Debug, Clone, Deserialize)]
pub struct AwsKeys {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Input and output root locations, as URLs (`s3://…` or `file://…`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineRoots {
    pub input_root: String,
    pub output_root: String,
}

impl Default for PipelineRoots {
    fn default() -> Self {
        Self {
            input_root: DEFAULT_INPUT_ROOT.to_owned(),
            output_root: DEFAULT_OUTPUT_ROOT.to_owned(),
        }
    }
}

/// Run configuration, read once before any processing begins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EtlConfig {
    pub aws: Option<AwsKeys>,
    #[serde(default)]
    pub pipeline: PipelineRoots,
}

impl EtlConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }
}
