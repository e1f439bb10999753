// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent record of what has already been communicated about a job.

use serde::{Deserialize, Serialize};

/// Escalation record for one job.
///
/// There is at most one open escalation per job. It is only ever mutated
/// on behalf of its own job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationState {
    pub job: String,
    /// Last notified identity or address list
    #[serde(default)]
    pub target: String,
    /// Build the escalation refers to; [`Self::CLEARED`] when none is open
    pub build: i64,
    pub timestamp_ms: u64,
    /// Severity counter, starts at 1
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl EscalationState {
    /// Build number stored when no escalation is open.
    pub const CLEARED: i64 = -1;

    /// Record that `target` was notified about `build`.
    pub fn notified(
        job: impl Into<String>,
        build: u64,
        target: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Self {
            job: job.into(),
            target: target.into(),
            build: i64::try_from(build).unwrap_or(i64::MAX),
            timestamp_ms: now_ms,
            level: 1,
        }
    }

    /// Record that the job recovered and nothing is outstanding.
    pub fn cleared(job: impl Into<String>, now_ms: u64) -> Self {
        Self {
            job: job.into(),
            target: String::new(),
            build: Self::CLEARED,
            timestamp_ms: now_ms,
            level: 1,
        }
    }

    /// Whether an escalation is currently open.
    pub fn is_active(&self) -> bool {
        self.build != Self::CLEARED
    }

    /// Whether this record refers to `build`.
    pub fn refers_to(&self, build: u64) -> bool {
        i64::try_from(build).is_ok_and(|b| b == self.build)
    }

    /// Milliseconds since the record was written, saturating at zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
