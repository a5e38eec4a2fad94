//! Configuration Module
//!
//! Handles loading server configuration from a JSON file.
//!
//! The file carries three values, grouped by component:
//!
//! ```json
//! {
//!     "ram":    { "maxSizeMB": 10 },
//!     "disk":   { "dbFile": "cache.db" },
//!     "socket": { "socketPath": "/tmp/tierkv.sock" }
//! }
//! ```
//!
//! A missing file, malformed JSON, or a missing field aborts startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Server configuration parameters, as loaded from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Memory-tier settings
    pub ram: RamConfig,
    /// Durable-tier settings
    pub disk: DiskConfig,
    /// Socket settings
    pub socket: SocketConfig,
}

/// Memory-tier section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RamConfig {
    /// Maximum memory-tier size in megabytes
    #[serde(rename = "maxSizeMB")]
    pub max_size_mb: u64,
}

/// Durable-tier section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DiskConfig {
    /// Path to the SQLite database file (created if absent)
    #[serde(rename = "dbFile")]
    pub db_file: PathBuf,
}

/// Socket section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct SocketConfig {
    /// Path to the Unix socket
    #[serde(rename = "socketPath")]
    pub socket_path: PathBuf,
}

impl Config {
    /// Loads the configuration from the given JSON file.
    ///
    /// Relative `dbFile` and `socketPath` entries are resolved against the
    /// current working directory so the rest of the program only ever sees
    /// absolute paths.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        config.disk.db_file = absolutize(&config.disk.db_file)?;
        config.socket.socket_path = absolutize(&config.socket.socket_path)?;
        Ok(config)
    }

    /// Memory-tier cap converted to bytes.
    pub fn max_bytes(&self) -> usize {
        (self.ram.max_size_mb as usize) * 1024 * 1024
    }
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
