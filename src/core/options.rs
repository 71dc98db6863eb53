// src/core/options.rs

//! The option-source parsing contract: an abstract key/value provider and
//! the fixed key set [`Config::from_options`] recognizes.

use crate::config::{Config, clean_path};
use crate::core::errors::OpalKVError;
use indexmap::IndexMap;

/// A read-only, ordered key/value option provider.
///
/// Concrete loaders (connection strings, config files, environment) live
/// outside this crate; parsing only needs presence-checked lookup with
/// string and integer coercion.
pub trait OptionSource {
    /// Returns the value for `key` coerced to a string, if present.
    fn get_str(&self, key: &str) -> Option<String>;

    /// Returns the value for `key` coerced to an integer, if present.
    fn get_i64(&self, key: &str) -> Option<i64>;
}

/// Ordered string-map form, used by tests and simple loaders. Values that
/// do not parse as integers read as absent through `get_i64`.
impl OptionSource for IndexMap<String, String> {
    fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }
}

impl Config {
    /// Builds a draft `Config` from an option source and normalizes it.
    ///
    /// Only the data directory is required; every other recognized key is
    /// optional, and out-of-domain values are corrected by
    /// [`Config::normalize`]. [`Config::validate`] stays a distinct caller
    /// step.
    pub fn from_options(src: &impl OptionSource) -> Result<Self, OpalKVError> {
        let mut config = Config::default();

        // Storage settings. `data_dir` is the short alias accepted from
        // older connection strings.
        if let Some(v) = src.get_str("storage/data_directory") {
            config.storage.data_directory = clean_path(&v);
        } else if let Some(v) = src.get_str("data_dir") {
            config.storage.data_directory = clean_path(&v);
        } else {
            return Err(OpalKVError::DataDirectoryNotFound);
        }

        // Server settings.
        if let Some(v) = src.get_str("server/bind") {
            config.server.bind = v;
        }

        // Performance settings.
        if let Some(v) = src.get_i64("performance/write_buffer_size") {
            config.performance.write_buffer_size = v.max(0) as u64;
        }

        if let Some(v) = src.get_i64("performance/block_cache_size") {
            config.performance.block_cache_size = v.max(0) as u64;
        }

        if let Some(v) = src.get_i64("performance/max_open_files") {
            config.performance.max_open_files = v.max(0) as u64;
        }

        if let Some(v) = src.get_i64("performance/max_table_size") {
            config.performance.max_table_size = v.max(0) as u64;
        }

        // Feature settings. Flags are strict: only the literal "true"
        // enables, never "1" or case variants.
        if src.get_str("feature/write_meta_disable").as_deref() == Some("true") {
            config.feature.write_meta_disable = true;
        }

        if src.get_str("feature/write_log_disable").as_deref() == Some("true") {
            config.feature.write_log_disable = true;
        }

        Ok(config.normalize())
    }
}
