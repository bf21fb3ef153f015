use anyhow::{Context, Result};
use revealer_core::RevealSession;
use revealer_core::memory::MemoryWorld;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything one invocation reads and writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub world: MemoryWorld,
    pub session: RevealSession,
}

impl State {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| {
            format!(
                "Could not read state file {}, create one with `init`",
                path.display()
            )
        })?;
        let state: Self = serde_json::from_str(&text)
            .with_context(|| format!("Corrupt state file {}", path.display()))?;
        state
            .world
            .validate()
            .with_context(|| format!("Corrupt state file {}", path.display()))?;
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).context("Could not serialize state")?;
        fs::write(path, json)
            .with_context(|| format!("Could not write state file {}", path.display()))?;
        log::debug!("State written to {}", path.display());
        Ok(())
    }
}
