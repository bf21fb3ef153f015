use anyhow::{Context, Result};
use revealer_core::SessionConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of the `--config` TOML file.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionConfig,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded {config:?} from {}", path.display());
        Ok(config)
    }
}
