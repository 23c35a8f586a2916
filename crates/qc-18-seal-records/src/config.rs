//! Record handler configuration from environment variables.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Default secondary store name.
pub const DEFAULT_DELEGATE_NAME: &str = "sealtx";

/// Default secondary store channel.
pub const DEFAULT_DELEGATE_CHANNEL: &str = "tradechannel";

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Peer scope that receives delegated lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationTarget {
    /// Logical name of the secondary store.
    pub name: String,
    /// Channel the secondary store is reachable on.
    pub channel: String,
}

impl DelegationTarget {
    /// Create a target.
    pub fn new(name: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
        }
    }
}

impl Default for DelegationTarget {
    fn default() -> Self {
        Self::new(DEFAULT_DELEGATE_NAME, DEFAULT_DELEGATE_CHANNEL)
    }
}

/// Configuration for the record handler and its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealConfig {
    /// Where unresolved lookups are forwarded.
    pub delegation: DelegationTarget,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            delegation: DelegationTarget::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }
}

impl SealConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEAL_DELEGATE_NAME`: Secondary store name (default: sealtx)
    /// - `SEAL_DELEGATE_CHANNEL`: Secondary store channel (default: tradechannel)
    /// - `SEAL_LOG_LEVEL` or `RUST_LOG`: Log level (default: debug)
    /// - `SEAL_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            delegation: DelegationTarget {
                name: lookup("SEAL_DELEGATE_NAME")
                    .unwrap_or_else(|| DEFAULT_DELEGATE_NAME.to_string()),
                channel: lookup("SEAL_DELEGATE_CHANNEL")
                    .unwrap_or_else(|| DEFAULT_DELEGATE_CHANNEL.to_string()),
            },

            log_level: lookup("SEAL_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),

            json_logs: lookup("SEAL_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Reject configurations that cannot route delegated calls.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the delegate name or channel is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delegation.name.trim().is_empty() {
            return Err(ConfigError::EmptyDelegateName);
        }
        if self.delegation.channel.trim().is_empty() {
            return Err(ConfigError::EmptyDelegateChannel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SealConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, SealConfig::default());
        assert_eq!(config.delegation.name, "sealtx");
        assert_eq!(config.delegation.channel, "tradechannel");
        assert_eq!(config.log_level, "debug");
        assert!(!config.json_logs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = SealConfig::from_lookup(lookup_from(&[
            ("SEAL_DELEGATE_NAME", "legacy"),
            ("SEAL_DELEGATE_CHANNEL", "archive"),
            ("RUST_LOG", "warn"),
            ("SEAL_JSON_LOGS", "1"),
        ]));
        assert_eq!(config.delegation, DelegationTarget::new("legacy", "archive"));
        assert_eq!(config.log_level, "warn");
        assert!(config.json_logs);
    }

    #[test]
    fn test_seal_log_level_wins_over_rust_log() {
        let config = SealConfig::from_lookup(lookup_from(&[
            ("SEAL_LOG_LEVEL", "trace"),
            ("RUST_LOG", "warn"),
        ]));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_validate_rejects_blank_target() {
        let mut config = SealConfig::default();
        config.delegation.name = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyDelegateName));

        let mut config = SealConfig::default();
        config.delegation.channel = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyDelegateChannel));
    }

    #[test]
    fn test_target_serde() {
        let target: DelegationTarget =
            serde_json::from_str(r#"{"name":"sealtx","channel":"tradechannel"}"#).unwrap();
        assert_eq!(target, DelegationTarget::default());
    }
}
