//! TOML-backed process configuration, loaded per the teacher's
//! `kotoba-deploy-cli` pattern of a config-file path plus CLI overrides.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub in_memory_store: bool,
    /// Address of the execution runtime the bridge dials at bootstrap
    /// (spec §4.5). Unused by `InProcessExecutionBridge`, which never
    /// dials out, but kept so a future networked bridge has somewhere to
    /// read its endpoint from without another config cycle.
    #[serde(default = "default_execution_bridge_endpoint")]
    pub execution_bridge_endpoint: String,
    /// Backoff schedule, in seconds, for `connect_with_retry` bootstrap
    /// dials. Must have the same length as the retry's attempt count.
    #[serde(default = "default_retry_schedule_secs")]
    pub retry_schedule_secs: Vec<u64>,
}

fn default_listen_addr() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

fn default_data_dir() -> String {
    "./agentforge-data".to_string()
}

fn default_execution_bridge_endpoint() -> String {
    "in-process".to_string()
}

fn default_retry_schedule_secs() -> Vec<u64> {
    vec![1, 2, 4]
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
            data_dir: default_data_dir(),
            in_memory_store: false,
            execution_bridge_endpoint: default_execution_bridge_endpoint(),
            retry_schedule_secs: default_retry_schedule_secs(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&raw)?)
            }
            None => Ok(ServerConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_path_uses_defaults() {
        let config = ServerConfig::load(None).unwrap();
        assert!(!config.in_memory_store);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agentforge.toml");
        std::fs::write(&path, "in_memory_store = true\n").unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert!(config.in_memory_store);
        assert_eq!(config.data_dir, "./agentforge-data");
    }
}
