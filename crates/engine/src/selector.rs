// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Choosing which builds of a job to look at.

use kv_core::JobFacts;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid build selector {0:?}: expected a number or lastBuild-style name")]
pub struct SelectorError(pub String);

/// A build number, or one of the build system's symbolic references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSelector {
    Number(u64),
    LastBuild,
    LastCompletedBuild,
    LastFailedBuild,
    LastSuccessfulBuild,
}

impl BuildSelector {
    /// Build number this selector refers to in `job`, if any.
    pub fn resolve(self, job: &JobFacts) -> Option<u64> {
        match self {
            Self::Number(n) => Some(n),
            Self::LastBuild => job.last_build,
            Self::LastCompletedBuild => job.last_completed_build,
            Self::LastFailedBuild => job.last_failed_build,
            Self::LastSuccessfulBuild => job.last_successful_build,
        }
    }

    /// Resolve every selector, oldest first and without repeats.
    ///
    /// No selectors means every build the job lists.
    pub fn select(selectors: &[BuildSelector], job: &JobFacts) -> Vec<u64> {
        let numbers: BTreeSet<u64> = if selectors.is_empty() {
            job.builds.iter().copied().collect()
        } else {
            selectors.iter().filter_map(|s| s.resolve(job)).collect()
        };
        numbers.into_iter().collect()
    }
}

impl FromStr for BuildSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lastBuild" => Ok(Self::LastBuild),
            "lastCompletedBuild" => Ok(Self::LastCompletedBuild),
            "lastFailedBuild" => Ok(Self::LastFailedBuild),
            "lastSuccessfulBuild" => Ok(Self::LastSuccessfulBuild),
            _ => s.parse().map(Self::Number).map_err(|_| SelectorError(s.to_string())),
        }
    }
}

impl fmt::Display for BuildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::LastBuild => f.write_str("lastBuild"),
            Self::LastCompletedBuild => f.write_str("lastCompletedBuild"),
            Self::LastFailedBuild => f.write_str("lastFailedBuild"),
            Self::LastSuccessfulBuild => f.write_str("lastSuccessfulBuild"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_core::test_support::failing_job;
    use yare::parameterized;

    #[parameterized(
        number = { "42", BuildSelector::Number(42) },
        last = { "lastBuild", BuildSelector::LastBuild },
        completed = { "lastCompletedBuild", BuildSelector::LastCompletedBuild },
        failed = { "lastFailedBuild", BuildSelector::LastFailedBuild },
        successful = { "lastSuccessfulBuild", BuildSelector::LastSuccessfulBuild },
    )]
    fn parse_and_display(text: &str, selector: BuildSelector) {
        assert_eq!(text.parse::<BuildSelector>().unwrap(), selector);
        assert_eq!(selector.to_string(), text);
    }

    #[parameterized(
        negative = { "-1" },
        lowercase = { "lastbuild" },
        empty = { "" },
    )]
    fn parse_rejects(text: &str) {
        assert_eq!(text.parse::<BuildSelector>(), Err(SelectorError(text.to_string())));
    }

    #[test]
    fn select_sorts_and_dedups() {
        let job = failing_job(40, 43);
        let selected = BuildSelector::select(
            &[
                BuildSelector::LastBuild,
                BuildSelector::Number(41),
                BuildSelector::LastFailedBuild,
                BuildSelector::LastSuccessfulBuild,
            ],
            &job,
        );
        assert_eq!(selected, vec![40, 41, 43]);
    }

    #[test]
    fn select_defaults_to_all_builds() {
        let job = failing_job(40, 43);
        assert_eq!(BuildSelector::select(&[], &job), (1..=43).collect::<Vec<_>>());
    }

    #[test]
    fn unresolved_references_are_dropped() {
        let job = JobFacts::new("acme/widget");
        assert!(BuildSelector::select(&[BuildSelector::LastFailedBuild], &job).is_empty());
    }
}
