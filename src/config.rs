use std::path::Path;

use serde::Deserialize;

use crate::errors::RelayError;

/// Operational parameters that never reach the wire protocol — the port and
/// password are CLI arguments (§6), not config, because they gate the
/// observable handshake.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub server_name: String,
    pub log_level: String,
    pub listen_backlog: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: "ircrelay".to_string(),
            log_level: "info".to_string(),
            listen_backlog: 128,
        }
    }
}

impl Config {
    /// Loads and parses the TOML configuration file, if present.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RelayError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| RelayError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| RelayError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
