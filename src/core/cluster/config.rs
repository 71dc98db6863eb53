// src/core/cluster/config.rs

//! Defines the cluster-specific configuration options.

use crate::config::TlsCertConfig;
use serde::{Deserialize, Serialize};

/// Holds all configuration settings related to cluster membership.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClusterConfig {
    /// The masters a client may connect to, in announcement order.
    #[serde(default)]
    pub masters: Vec<MasterConfig>,
}

/// A single cluster master endpoint.
///
/// The address is the master's identity and is expected to be unique within
/// the list. The auth fields override the node-wide server settings for
/// this master when set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MasterConfig {
    /// Host:port of the master.
    #[serde(default)]
    pub addr: String,

    /// Overrides `server.auth_secret_key` for this master when non-empty.
    #[serde(default)]
    pub auth_secret_key: String,

    /// Overrides the node TLS material for this master when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_tls_cert: Option<TlsCertConfig>,
}

impl ClusterConfig {
    /// Looks up a master by address. First match wins.
    pub fn master(&self, addr: &str) -> Option<&MasterConfig> {
        self.masters.iter().find(|m| m.addr == addr)
    }
}
