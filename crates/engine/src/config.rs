// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration, read from `kvetch.toml`.

use kv_adapters::{DirectoryError, OrgChart};
use kv_scanner::{LogScanner, RuleTableConfig, ScanError, ScannerRegistry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub escalation: EscalationConfig,
    pub scanner: ScannerConfig,
    pub directory: DirectoryConfig,
    pub notify: NotifyConfig,
}

/// Who gets told, and how patient to be.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscalationConfig {
    /// Fallback contact when attribution is ambiguous
    pub build_monitor: String,
    /// Claimant name that marks an infrastructure claim
    pub system_claimant: String,
    /// Window in which the same notification is not repeated
    pub throttle_hours: u64,
    /// Failure age after which a claimant's manager is copied
    pub manager_cc_hours: u64,
    pub from: String,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            build_monitor: "build-monitor@localhost".to_string(),
            system_claimant: "SYSTEM".to_string(),
            throttle_hours: 23,
            manager_cc_hours: 24,
            from: "kvetch@localhost".to_string(),
        }
    }
}

impl EscalationConfig {
    kv_core::setters! {
        into {
            build_monitor: String,
            system_claimant: String,
            from: String,
        }
        set {
            throttle_hours: u64,
            manager_cc_hours: u64,
        }
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_secs(self.throttle_hours * 3_600)
    }

    pub fn manager_cc_after(&self) -> Duration {
        Duration::from_secs(self.manager_cc_hours * 3_600)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Registry key of the scanner to use
    pub name: String,
    /// Summary lines shown per build when several builds are listed
    pub summary_limit: usize,
    /// Additional named rule tables
    pub tables: BTreeMap<String, RuleTableConfig>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            name: ScannerRegistry::DEFAULT.to_string(),
            summary_limit: 10,
            tables: BTreeMap::new(),
        }
    }
}

impl ScannerConfig {
    pub fn registry(&self) -> Result<ScannerRegistry, ScanError> {
        let mut registry = ScannerRegistry::with_builtin();
        registry.register_tables(&self.tables)?;
        Ok(registry)
    }

    /// The configured scanner, or `name` when given.
    pub fn scanner(&self, name: Option<&str>) -> Result<Arc<dyn LogScanner>, ScanError> {
        self.registry()?.get(name.unwrap_or(&self.name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Nested team JSON; relative paths resolve against the config file
    pub org_chart: Option<PathBuf>,
    pub email_domain: Option<String>,
    pub contacts: BTreeMap<String, String>,
}

impl DirectoryConfig {
    pub fn open(&self, base: &Path) -> Result<OrgChart, DirectoryError> {
        let mut chart = match &self.org_chart {
            Some(path) => OrgChart::load(&base.join(path))?,
            None => OrgChart::default(),
        };
        if let Some(domain) = &self.email_domain {
            chart = chart.email_domain(domain.clone());
        }
        Ok(chart.contacts(self.contacts.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    /// Program and arguments receiving the message on stdin; unset prints instead
    pub command: Option<Vec<String>>,
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { command: None, timeout_secs: 30 }
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.escalation.build_monitor.trim().is_empty() {
            return Err(ConfigError::Invalid("escalation.build_monitor is empty".into()));
        }
        if self.escalation.throttle_hours == 0 {
            return Err(ConfigError::Invalid("escalation.throttle_hours must be positive".into()));
        }
        if self.notify.command.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::Invalid("notify.command is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
