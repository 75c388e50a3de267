//! Server configuration via `metadir.toml`
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working server. Command-line flags are applied on top of whatever the file
//! says.

use crate::error::{Result, ServerError};
use metadir_storage::{
    FileSource, NoSource, SnapshotSource, SourceFormat, WaitConfig, LATEST,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "metadir.toml";

fn default_listen() -> String {
    ":80".to_string()
}

fn default_listen_reload() -> String {
    "127.0.0.1:8112".to_string()
}

fn default_source_version() -> String {
    LATEST.to_string()
}

/// Where snapshots are loaded from on start and on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Snapshot file; when unset the server starts empty and reloads fail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// File layout: `"tree"` (default) or `"environment"`
    #[serde(default)]
    pub format: SourceFormat,
    /// Version an `"environment"` file is published under (default: `latest`)
    #[serde(default = "default_source_version")]
    pub version: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: SourceFormat::default(),
            version: default_source_version(),
        }
    }
}

impl SourceConfig {
    /// Build the snapshot source this section describes.
    pub fn build(&self) -> Arc<dyn SnapshotSource> {
        match (&self.path, self.format) {
            (None, _) => Arc::new(NoSource),
            (Some(path), SourceFormat::Tree) => Arc::new(FileSource::new(path)),
            (Some(path), SourceFormat::Environment) => {
                Arc::new(FileSource::environment(path, self.version.clone()))
            }
        }
    }
}

/// Server configuration loaded from `metadir.toml`.
///
/// # Example
///
/// ```toml
/// listen = ":80"
/// listen_reload = "127.0.0.1:8112"
/// enable_xff = false
///
/// [wait]
/// default_secs = 60
/// max_secs = 120
///
/// [source]
/// path = "/var/lib/metadir/answers.json"
/// format = "tree"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Public listener (default: `:80`, all interfaces)
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Admin listener for `POST /v1/reload` (default: `127.0.0.1:8112`)
    #[serde(default = "default_listen_reload")]
    pub listen_reload: String,
    /// Trust `X-Forwarded-For` for the client address
    #[serde(default)]
    pub enable_xff: bool,
    /// Debug-level logging
    #[serde(default)]
    pub debug: bool,
    /// Append logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Long-poll timeouts
    #[serde(default)]
    pub wait: WaitConfig,
    /// Snapshot source
    #[serde(default)]
    pub source: SourceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            listen_reload: default_listen_reload(),
            enable_xff: false,
            debug: false,
            log_file: None,
            wait: WaitConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# metadir configuration
#
# Public listener. ":80" means every interface, port 80.
listen = ":80"

# Admin listener for POST /v1/reload. Keep it on loopback.
listen_reload = "127.0.0.1:8112"

# Use X-Forwarded-For as the client address (behind a trusted proxy only).
enable_xff = false

# Debug-level logging.
debug = false

# Append logs to a file instead of stderr.
# log_file = "/var/log/metadir.log"

[wait]
# Timeout for ?wait=true requests that give no maxWait (seconds).
default_secs = 60
# Ceiling for client-supplied maxWait (seconds).
max_secs = 120
# Longest a waiter sleeps between re-checks (milliseconds).
tick_ms = 1000

[source]
# Snapshot file loaded on start and re-read on every reload.
# path = "/var/lib/metadir/answers.json"
# "tree" = {"<version>": {...}}, "environment" = one environment record
format = "tree"
# Version an "environment" file is published under.
version = "latest"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if either
    /// listen address is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ServerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: ServerConfig = toml::from_str(&content).map_err(|e| ServerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        // Validate the addresses eagerly
        config.listen_addr()?;
        config.reload_addr()?;
        Ok(config)
    }

    /// Public listener as a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen(&self.listen)
    }

    /// Admin listener as a socket address.
    pub fn reload_addr(&self) -> Result<SocketAddr> {
        parse_listen(&self.listen_reload)
    }
}

/// Accepts `host:port` or `:port` (all interfaces).
pub fn parse_listen(addr: &str) -> Result<SocketAddr> {
    let full = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    full.parse()
        .map_err(|_| ServerError::InvalidAddress(addr.to_string()))
}
