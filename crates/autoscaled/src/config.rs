//! autoscaled.toml configuration parser.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use autoscale_api::{InstanceOverride, SnapshotDefaults};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Per-(project/instance) overrides keyed by `"{project}/{instance}"`.
    /// See [`DaemonConfig::snapshot_defaults`] for how these reach an
    /// `InstanceSnapshot`.
    #[serde(default)]
    pub instances: HashMap<String, InstanceDefaults>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub location: String,
}

fn default_backend() -> String {
    "memory".to_string()
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            location: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Default resize endpoint base URL, used when a snapshot doesn't
    /// carry its own `resize_endpoint`.
    pub default_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info,autoscaled=debug,autoscale_core=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDefaults {
    pub resize_endpoint: Option<String>,
    pub downstream_topic: Option<String>,
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Builds the per-tick merge defaults (`state` backend/location plus
    /// `instances` overrides) that both ingress adapters apply to a
    /// snapshot before it reaches the orchestrator.
    pub fn snapshot_defaults(&self) -> SnapshotDefaults {
        SnapshotDefaults {
            state_backend: Some(self.state.backend.clone()),
            state_location: if self.state.location.is_empty() {
                None
            } else {
                Some(self.state.location.clone())
            },
            instances: self
                .instances
                .iter()
                .map(|(key, defaults)| {
                    (
                        key.clone(),
                        InstanceOverride {
                            resize_endpoint: defaults.resize_endpoint.clone(),
                            downstream_topic: defaults.downstream_topic.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}
