// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-level facts: which builds exist and how the latest ones ended.

use crate::BuildFacts;
use serde::{Deserialize, Serialize};

/// Summary of a job as reported by the build system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFacts {
    pub name: String,
    /// Known build numbers, newest first as the build system lists them
    #[serde(default)]
    pub builds: Vec<u64>,
    #[serde(default)]
    pub last_build: Option<u64>,
    #[serde(default)]
    pub last_completed_build: Option<u64>,
    #[serde(default)]
    pub last_failed_build: Option<u64>,
    #[serde(default)]
    pub last_successful_build: Option<u64>,
}

crate::builder! {
    pub struct JobFactsBuilder => JobFacts {
        into {
            name: String = "acme/widget",
        }
        set {
            builds: Vec<u64> = Vec::new(),
        }
        option {
            last_build: u64 = None,
            last_completed_build: u64 = None,
            last_failed_build: u64 = None,
            last_successful_build: u64 = None,
        }
    }
}

impl JobFacts {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Rebuild job facts from recorded builds, given oldest first.
    pub fn from_builds(name: impl Into<String>, builds: &[BuildFacts]) -> Self {
        let last = |pick: fn(&BuildFacts) -> bool| {
            builds.iter().rev().find(|b| pick(b)).map(|b| b.number)
        };
        Self {
            name: name.into(),
            builds: builds.iter().rev().map(|b| b.number).collect(),
            last_build: builds.last().map(|b| b.number),
            last_completed_build: last(|b| !b.in_progress),
            last_failed_build: last(BuildFacts::is_failure),
            last_successful_build: last(BuildFacts::is_success),
        }
    }

    /// First build of the current failure streak.
    ///
    /// Approximated as the build after the last success; that build is not
    /// checked to have actually failed (it may have been aborted).
    pub fn first_failure(&self) -> u64 {
        self.last_successful_build.map_or(1, |n| n + 1)
    }

    /// Whether `number` is the first success after the last recorded failure.
    pub fn is_recovery(&self, number: u64) -> bool {
        self.last_failed_build.is_some_and(|failed| failed + 1 == number)
    }

    /// Whether the most recent completed build succeeded.
    pub fn is_green(&self) -> bool {
        matches!(
            (self.last_successful_build, self.last_completed_build),
            (Some(ok), Some(done)) if ok == done
        )
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
