// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{BuildFacts, BuildResult, ChangeSetEntry, Claim, JobFacts};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for transcript-shaped input.
pub mod strategies {
    use proptest::prelude::*;

    /// Lines that never match any built-in failure or phase pattern.
    pub fn arb_quiet_line() -> impl Strategy<Value = String> {
        "[a-z ]{0,40}".prop_map(|s| format!("info {}", s))
    }

    /// Optional bracketed ISO-8601 timestamp prefix.
    pub fn arb_timestamp_prefix() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            (0u32..24, 0u32..60, 0u32..60, 0u32..1000).prop_map(|(h, m, s, ms)| format!(
                "[2025-01-02T{:02}:{:02}:{:02}.{:03}Z] ",
                h, m, s, ms
            )),
        ]
    }
}

// ── Fact factory functions ──────────────────────────────────────────────

pub const TEST_JOB: &str = "acme/widget";

/// A failed build of [`TEST_JOB`] with one change-set author.
pub fn failed_build(number: u64, author: &str) -> BuildFacts {
    BuildFacts::builder()
        .job(TEST_JOB)
        .number(number)
        .result(BuildResult::Failure)
        .timestamp_ms(number * 1_000)
        .url(format!("https://ci.example.com/job/acme/job/widget/{}/", number))
        .change_set(vec![ChangeSetEntry::new(author, format!("c{}", number))])
        .build()
}

/// A failed build claimed by `claimant`.
pub fn claimed_build(number: u64, claimant: &str) -> BuildFacts {
    let mut build = failed_build(number, "bob@x.com");
    build.claim = Some(Claim::new(claimant, claimant).reason("looking into it"));
    build
}

pub fn successful_build(number: u64) -> BuildFacts {
    BuildFacts::builder()
        .job(TEST_JOB)
        .number(number)
        .result(BuildResult::Success)
        .timestamp_ms(number * 1_000)
        .build()
}

/// Job facts where builds after `last_ok` up to `last` all failed.
pub fn failing_job(last_ok: u64, last: u64) -> JobFacts {
    JobFacts::builder()
        .name(TEST_JOB)
        .builds((1..=last).rev().collect())
        .last_build(last)
        .last_completed_build(last)
        .last_failed_build(last)
        .last_successful_build(last_ok)
        .build()
}
