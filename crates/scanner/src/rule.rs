// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered pattern tables.
//!
//! A table is tested top to bottom and the first matching rule decides what
//! happens to a line. Tables are always assembled as transitions, ignores
//! and errors, in that order, so a benign line listed under
//! `ignore` can never be shadowed by a broad error pattern.

use crate::error::ScanError;
use kv_core::{BuildPhase, FaultKind};
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// What a matching rule does with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Phase-boundary marker; the line itself is not recorded
    Enter(BuildPhase),
    /// Known benign line that would otherwise look like a failure
    Ignore,
    /// Failure line, re-tagged with `[ERROR]` when `prefix` is set
    Capture { prefix: bool, fault: FaultKind },
}

/// Marker that moves the scan into `phase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub pattern: String,
    pub phase: BuildPhase,
}

/// Pattern for lines worth keeping in the failure summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRule {
    pub pattern: String,
    /// Re-tag the line with `[ERROR]`; off for lines carrying their own marker
    #[serde(default = "default_prefix")]
    pub prefix: bool,
    #[serde(default = "default_kind")]
    pub kind: FaultKind,
}

fn default_prefix() -> bool {
    true
}

fn default_kind() -> FaultKind {
    FaultKind::Developer
}

impl ErrorRule {
    fn new(pattern: &str, prefix: bool, kind: FaultKind) -> Self {
        Self { pattern: pattern.to_string(), prefix, kind }
    }
}

/// Serializable description of a rule table (e.g. from `kvetch.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleTableConfig {
    #[serde(default)]
    pub transitions: Vec<TransitionRule>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub errors: Vec<ErrorRule>,
    /// Captured lines matching any of these are infrastructure failures,
    /// whatever rule captured them
    #[serde(default = "builtin_system_signals")]
    pub system_signals: Vec<String>,
}

impl Default for RuleTableConfig {
    fn default() -> Self {
        Self {
            transitions: Vec::new(),
            ignore: Vec::new(),
            errors: Vec::new(),
            system_signals: builtin_system_signals(),
        }
    }
}

fn builtin_system_signals() -> Vec<String> {
    [
        r"(?i)connection (refused|timed out|reset)",
        r"(?i)could not resolve host",
        r"(?i)no space left on device",
        r"(?i)permission denied \(publickey",
        r"(?i)host key verification failed",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl RuleTableConfig {
    /// The stock table for make-driven builds checked out with git.
    pub fn builtin() -> Self {
        use FaultKind::{Developer, System};

        let transition = |pattern: &str, phase| TransitionRule { pattern: pattern.into(), phase };
        Self {
            transitions: vec![
                transition(r"^git clone", BuildPhase::CheckOut),
                transition(r"make -f all\.mk all", BuildPhase::Build),
                transition(r"^Testing complete", BuildPhase::Epilogue),
            ],
            ignore: vec![r"^ERROR: Skipping .*permanently disabled".into()],
            errors: vec![
                ErrorRule::new(r": \*\*\*", true, Developer),
                ErrorRule::new(r"^\[ERROR\]", false, Developer),
                ErrorRule::new(r"^ERROR:", false, Developer),
                ErrorRule::new(r"^ssh: ", true, System),
                ErrorRule::new(r"^rsync: ", true, System),
                ErrorRule::new(r"^rsync error: ", true, System),
                ErrorRule::new(r"^FATAL: ", true, System),
                ErrorRule::new(r"^fatal: ", true, System),
                ErrorRule::new(r"^Caused: ", true, System),
                ErrorRule::new(r":\d+:\d+: error: ", true, Developer),
            ],
            system_signals: builtin_system_signals(),
        }
    }
}

/// Compiled, ordered rule table.
#[derive(Debug)]
pub struct RuleTable {
    rules: RegexSet,
    actions: Vec<RuleAction>,
    system_signals: RegexSet,
}

#[allow(clippy::expect_used)]
static BUILTIN: LazyLock<Arc<RuleTable>> = LazyLock::new(|| {
    Arc::new(RuleTable::compile(&RuleTableConfig::builtin()).expect("built-in rule table is valid"))
});

impl RuleTable {
    /// Shared instance of [`RuleTableConfig::builtin`].
    pub fn builtin() -> Arc<RuleTable> {
        Arc::clone(&BUILTIN)
    }

    /// Compile a table, laying sections out as transitions, ignores, errors.
    pub fn compile(config: &RuleTableConfig) -> Result<Self, ScanError> {
        let mut patterns = Vec::new();
        let mut actions = Vec::new();

        for rule in &config.transitions {
            if !rule.phase.is_reported() {
                return Err(ScanError::InvalidTransition {
                    pattern: rule.pattern.clone(),
                    phase: rule.phase,
                });
            }
            patterns.push(checked(&rule.pattern)?);
            actions.push(RuleAction::Enter(rule.phase));
        }
        for pattern in &config.ignore {
            patterns.push(checked(pattern)?);
            actions.push(RuleAction::Ignore);
        }
        for rule in &config.errors {
            patterns.push(checked(&rule.pattern)?);
            actions.push(RuleAction::Capture { prefix: rule.prefix, fault: rule.kind });
        }

        let signals =
            config.system_signals.iter().map(|p| checked(p)).collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules: compile_set(&patterns)?, actions, system_signals: compile_set(&signals)? })
    }

    /// Parse and compile a TOML rule table.
    pub fn from_toml(text: &str) -> Result<Self, ScanError> {
        let config: RuleTableConfig = toml::from_str(text)?;
        Self::compile(&config)
    }

    /// Action of the first rule matching `message`, if any.
    pub fn classify(&self, message: &str) -> Option<RuleAction> {
        self.rules.matches(message).iter().next().map(|index| self.actions[index])
    }

    /// Whether a captured line points at the build infrastructure.
    pub fn is_system_signal(&self, message: &str) -> bool {
        self.system_signals.is_match(message)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn checked(pattern: &str) -> Result<&str, ScanError> {
    Regex::new(pattern)
        .map(|_| pattern)
        .map_err(|source| ScanError::InvalidPattern { pattern: pattern.to_string(), source })
}

fn compile_set(patterns: &[&str]) -> Result<RegexSet, ScanError> {
    RegexSet::new(patterns)
        .map_err(|source| ScanError::InvalidPattern { pattern: patterns.join(" | "), source })
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
