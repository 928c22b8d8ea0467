use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Optional TOML configuration file. Every field is optional; the CLI layer
/// fills in whatever the file leaves out.
///
/// ```toml
/// [server]
/// bind = "0.0.0.0:9000"
/// queue_capacity = 128
///
/// [dispatch]
/// max_total = 47
/// sync_threshold = 43
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub dispatch: Option<DispatchSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchSection {
    pub max_total: Option<u32>,
    pub sync_threshold: Option<u32>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
