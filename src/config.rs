// src/config.rs

//! Manages node configuration: the settings schema, defaulting, clamping,
//! and validation.

use crate::core::cluster::ClusterConfig;
use crate::core::errors::OpalKVError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

// Closed intervals for the storage-engine tuning knobs. Out-of-range values
// are clamped during normalization, never rejected.
const WRITE_BUFFER_SIZE_MIN: u64 = 4;
const WRITE_BUFFER_SIZE_MAX: u64 = 128;
const BLOCK_CACHE_SIZE_MIN: u64 = 8;
const BLOCK_CACHE_SIZE_MAX: u64 = 4096;
const MAX_TABLE_SIZE_MIN: u64 = 8;
const MAX_TABLE_SIZE_MAX: u64 = 64;
const MAX_OPEN_FILES_MIN: u64 = 500;
const MAX_OPEN_FILES_MAX: u64 = 10000;

/// The only compression algorithm the table engine accepts besides "none".
pub const TABLE_COMPRESS_SNAPPY: &str = "snappy";
pub const TABLE_COMPRESS_NONE: &str = "none";

/// Represents the full node configuration.
///
/// A `Config` is built once at process start (from defaults, a TOML file,
/// or an option source), passed through [`Config::normalize`] exactly once,
/// and treated as read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Performance settings.
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Feature settings.
    #[serde(default)]
    pub feature: FeatureConfig,

    /// Cluster settings.
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// If `true`, this process dials cluster masters as a client and must
    /// know at least one of them. Process-local, never serialized.
    #[serde(skip)]
    pub client_connect_enable: bool,
}

/// Storage layer settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// The directory all table and log files live under. Required: parsing
    /// fails without it.
    #[serde(default)]
    pub data_directory: String,
}

/// Network server settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    /// The address the node listens on, e.g. `"127.0.0.1:9100"`.
    #[serde(default)]
    pub bind: String,

    /// Shared secret clients must present when connecting.
    #[serde(default)]
    pub auth_secret_key: String,

    /// TLS material for the authenticated channel, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_tls_cert: Option<TlsCertConfig>,
}

/// TLS private key and certificate, as file paths, inline data, or both.
///
/// File and data fields come in pairs. During normalization a non-empty
/// `*_file` path fills its empty `*_data` twin; inline data is never
/// overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TlsCertConfig {
    #[serde(default)]
    pub server_key_file: String,
    #[serde(default)]
    pub server_key_data: String,
    #[serde(default)]
    pub server_cert_file: String,
    #[serde(default)]
    pub server_cert_data: String,
}

impl TlsCertConfig {
    /// Fills each empty `*_data` field from its `*_file` twin. Best effort:
    /// a failed read leaves the data field empty and the node keeps booting.
    fn materialize(&mut self) {
        if !self.server_key_file.is_empty() && self.server_key_data.is_empty() {
            match fs::read_to_string(&self.server_key_file) {
                Ok(data) => self.server_key_data = data.trim().to_string(),
                Err(e) => warn!(
                    "Could not read TLS key file '{}': {}",
                    self.server_key_file, e
                ),
            }
        }

        if !self.server_cert_file.is_empty() && self.server_cert_data.is_empty() {
            match fs::read_to_string(&self.server_cert_file) {
                Ok(data) => self.server_cert_data = data.trim().to_string(),
                Err(e) => warn!(
                    "Could not read TLS cert file '{}': {}",
                    self.server_cert_file, e
                ),
            }
        }
    }
}

/// Storage-engine tuning knobs. Sizes are in MiB.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceConfig {
    /// Memtable size, clamped to [4, 128].
    #[serde(default = "default_write_buffer_size")]
    pub write_buffer_size: u64,

    /// Block cache capacity, clamped to [8, 4096].
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: u64,

    /// On-disk table size, clamped to [8, 64].
    #[serde(default = "default_max_table_size")]
    pub max_table_size: u64,

    /// Open file-handle budget, clamped to [500, 10000].
    #[serde(default = "default_max_open_files")]
    pub max_open_files: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            write_buffer_size: default_write_buffer_size(),
            block_cache_size: default_block_cache_size(),
            max_table_size: default_max_table_size(),
            max_open_files: default_max_open_files(),
        }
    }
}

fn default_write_buffer_size() -> u64 {
    WRITE_BUFFER_SIZE_MIN
}
fn default_block_cache_size() -> u64 {
    BLOCK_CACHE_SIZE_MIN
}
fn default_max_table_size() -> u64 {
    MAX_TABLE_SIZE_MIN
}
fn default_max_open_files() -> u64 {
    MAX_OPEN_FILES_MIN
}

/// Feature toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureConfig {
    /// Skip writing per-entry metadata.
    #[serde(default)]
    pub write_meta_disable: bool,

    /// Skip the write-ahead log.
    #[serde(default)]
    pub write_log_disable: bool,

    /// Table block compression, `"snappy"` or `"none"`. Unknown names are
    /// coerced to `"none"` during normalization.
    #[serde(default = "default_table_compress_name")]
    pub table_compress_name: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            write_meta_disable: false,
            write_log_disable: false,
            table_compress_name: default_table_compress_name(),
        }
    }
}

fn default_table_compress_name() -> String {
    TABLE_COMPRESS_NONE.to_string()
}

impl Config {
    /// Creates a configuration with every setting defaulted except the data
    /// directory, which is set to the lexically cleaned `data_dir`.
    pub fn new(data_dir: &str) -> Self {
        Self {
            storage: StorageConfig {
                data_directory: clean_path(data_dir),
            },
            ..Self::default()
        }
    }

    /// Creates a `Config` by reading and parsing a TOML file, then
    /// normalizing it. [`Config::validate`] stays a separate caller step.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        Ok(config.normalize())
    }

    /// Pulls every setting into its documented domain.
    ///
    /// Idempotent: each step is an absorbing clamp or coercion, so applying
    /// this twice yields the same result as once.
    pub fn normalize(mut self) -> Self {
        self.performance.write_buffer_size = self
            .performance
            .write_buffer_size
            .clamp(WRITE_BUFFER_SIZE_MIN, WRITE_BUFFER_SIZE_MAX);

        self.performance.block_cache_size = self
            .performance
            .block_cache_size
            .clamp(BLOCK_CACHE_SIZE_MIN, BLOCK_CACHE_SIZE_MAX);

        self.performance.max_table_size = self
            .performance
            .max_table_size
            .clamp(MAX_TABLE_SIZE_MIN, MAX_TABLE_SIZE_MAX);

        self.performance.max_open_files = self
            .performance
            .max_open_files
            .clamp(MAX_OPEN_FILES_MIN, MAX_OPEN_FILES_MAX);

        if self.feature.table_compress_name != TABLE_COMPRESS_SNAPPY {
            self.feature.table_compress_name = TABLE_COMPRESS_NONE.to_string();
        }

        if let Some(cert) = self.server.auth_tls_cert.as_mut() {
            cert.materialize();
        }

        self
    }

    /// Checks the cross-field invariants the clamp policy cannot repair.
    ///
    /// A client-connecting node without any configured cluster master is the
    /// single hard failure this layer surfaces.
    pub fn validate(&self) -> Result<(), OpalKVError> {
        if self.client_connect_enable && self.cluster.masters.is_empty() {
            return Err(OpalKVError::NoClusterMasters);
        }

        Ok(())
    }
}

/// Lexically cleans a path: collapses redundant separators and resolves `.`
/// and `..` components without touching the filesystem.
pub(crate) fn clean_path(path: &str) -> String {
    let mut out = PathBuf::new();

    for comp in Path::new(path).components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                let at_root = matches!(out.components().next_back(), Some(Component::RootDir));
                if can_pop {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            c => out.push(c.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }

    out.to_string_lossy().into_owned()
}
