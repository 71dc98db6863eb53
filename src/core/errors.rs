// src/core/errors.rs

//! Defines the primary error type for the configuration layer.

use thiserror::Error;

/// The main error enum, representing all surfaced configuration failures.
///
/// The list is deliberately short: out-of-range numerics, unknown
/// compression names, and unreadable TLS files are corrected or ignored
/// during normalization instead of being surfaced, so a node keeps booting
/// on imperfect input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpalKVError {
    /// Neither `storage/data_directory` nor its `data_dir` alias was present
    /// in the option source.
    #[error("No storage/data_directory Found")]
    DataDirectoryNotFound,

    /// A client-connecting node was configured without any cluster master.
    #[error("no cluster/masters setup")]
    NoClusterMasters,
}
