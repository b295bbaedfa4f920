use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkstationConfig {
    /// Minimum number of defining behaviors required to enable a locate.
    pub minimum_defining_count: usize,
}

impl WorkstationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workstation config {}", path_ref.display()))?;
        let config: WorkstationConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workstation config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(minimum_defining_count: usize) -> Self {
        Self {
            minimum_defining_count,
        }
    }
}
