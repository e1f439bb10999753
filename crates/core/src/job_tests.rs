// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    after_success = { Some(41), 42 },
    never_passed  = { None, 1 },
)]
fn first_failure_follows_last_success(last_ok: Option<u64>, expected: u64) {
    let mut job = JobFacts::new("acme/widget");
    job.last_successful_build = last_ok;
    assert_eq!(job.first_failure(), expected);
}

#[yare::parameterized(
    right_after_failure = { Some(9), 10, true },
    gap_after_failure   = { Some(8), 10, false },
    same_build          = { Some(10), 10, false },
    never_failed        = { None, 10, false },
)]
fn recovery_is_next_build_after_failure(last_failed: Option<u64>, number: u64, expected: bool) {
    let mut job = JobFacts::new("acme/widget");
    job.last_failed_build = last_failed;
    assert_eq!(job.is_recovery(number), expected);
}

#[test]
fn green_when_last_completed_succeeded() {
    let job = JobFacts::builder().last_completed_build(12u64).last_successful_build(12u64).build();
    assert!(job.is_green());

    let job = JobFacts::builder().last_completed_build(12u64).last_successful_build(10u64).build();
    assert!(!job.is_green());

    assert!(!JobFacts::new("empty").is_green());
}

#[test]
fn parses_partial_json() {
    let job: JobFacts =
        serde_json::from_str(r#"{"name": "acme/widget", "last_failed_build": 3}"#).unwrap();
    assert_eq!(job.last_failed_build, Some(3));
    assert_eq!(job.last_successful_build, None);
    assert!(job.builds.is_empty());
}

#[test]
fn rebuilt_from_recorded_builds() {
    use crate::test_support::{failed_build, successful_build};
    let mut running = failed_build(5, "bob@x.com");
    running.in_progress = true;
    running.result = None;
    let builds =
        vec![successful_build(2), failed_build(3, "bob@x.com"), successful_build(4), running];

    let job = JobFacts::from_builds("acme/widget", &builds);
    assert_eq!(job.builds, vec![5, 4, 3, 2]);
    assert_eq!(job.last_build, Some(5));
    assert_eq!(job.last_completed_build, Some(4));
    assert_eq!(job.last_failed_build, Some(3));
    assert_eq!(job.last_successful_build, Some(4));
    assert!(job.is_green());
}
