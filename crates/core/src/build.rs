// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build facts as reported by the build system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Build the human-readable name the build system shows for a build.
///
/// Only the first path separator becomes ` » `: `group/job` build 7 is
/// `group » job #7`.
pub fn full_display_name(job: &str, number: u64) -> String {
    format!("{} #{}", job.replacen('/', " » ", 1), number)
}

/// Final result of a completed build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    #[serde(other)]
    Other,
}

crate::simple_display! {
    BuildResult {
        Success => "SUCCESS",
        Failure => "FAILURE",
        Unstable => "UNSTABLE",
        Aborted => "ABORTED",
        NotBuilt => "NOT_BUILT",
        Other => "OTHER",
    }
}

/// One commit in a build's change-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetEntry {
    pub author_email: String,
    pub commit_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_paths: Vec<String>,
}

impl ChangeSetEntry {
    pub fn new(author_email: impl Into<String>, commit_id: impl Into<String>) -> Self {
        Self {
            author_email: author_email.into(),
            commit_id: commit_id.into(),
            comment: String::new(),
            affected_paths: Vec::new(),
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Someone's assertion that they are looking into a failed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claimed_by: String,
    pub assigned_by: String,
    #[serde(default)]
    pub claim_date_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Claim {
    pub fn new(claimed_by: impl Into<String>, assigned_by: impl Into<String>) -> Self {
        Self {
            claimed_by: claimed_by.into(),
            assigned_by: assigned_by.into(),
            claim_date_ms: 0,
            reason: None,
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether this claim was made by the canonical system claimant.
    pub fn is_by(&self, claimant: &str) -> bool {
        self.claimed_by == claimant
    }
}

/// Input-contract violations in build facts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FactsError {
    #[error("{0} is still in progress")]
    InProgress(String),
    #[error("{0} completed without a result")]
    MissingResult(String),
}

/// Immutable snapshot of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFacts {
    pub job: String,
    pub number: u64,
    #[serde(default)]
    pub full_display_name: String,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` while the build is running
    #[serde(default)]
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub duration_ms: u64,
    /// Epoch milliseconds when the build started
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub change_set: Vec<ChangeSetEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<Claim>,
}

crate::builder! {
    pub struct BuildFactsBuilder => BuildFacts {
        into {
            job: String = "acme/widget",
            full_display_name: String = "",
            url: String = "",
        }
        set {
            number: u64 = 1,
            in_progress: bool = false,
            duration_ms: u64 = 60_000,
            timestamp_ms: u64 = 1_000_000,
            change_set: Vec<ChangeSetEntry> = Vec::new(),
        }
        option {
            description: String = None,
            result: BuildResult = Some(BuildResult::Failure),
            claim: Claim = None,
        }
    }
}

impl BuildFacts {
    /// Display name, derived from job and number when the source omitted it.
    pub fn display_name(&self) -> String {
        if self.full_display_name.is_empty() {
            full_display_name(&self.job, self.number)
        } else {
            self.full_display_name.clone()
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == Some(BuildResult::Success)
    }

    pub fn is_failure(&self) -> bool {
        self.result == Some(BuildResult::Failure)
    }

    /// Name of whoever claimed the build, if anyone did.
    pub fn claimant(&self) -> Option<&str> {
        self.claim.as_ref().map(|c| c.claimed_by.as_str())
    }

    /// Distinct change-set author addresses, sorted.
    pub fn authors(&self) -> Vec<String> {
        self.change_set
            .iter()
            .map(|c| c.author_email.trim())
            .filter(|a| !a.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Check that a build is complete enough to reason about.
    pub fn validate(&self) -> Result<&BuildResult, FactsError> {
        if self.in_progress {
            return Err(FactsError::InProgress(self.display_name()));
        }
        self.result.as_ref().ok_or_else(|| FactsError::MissingResult(self.display_name()))
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
