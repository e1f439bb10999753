// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn notified_record_is_active_at_level_one() {
    let state = EscalationState::notified("acme/widget", 5, "alice", 1_000);
    assert!(state.is_active());
    assert!(state.refers_to(5));
    assert!(!state.refers_to(6));
    assert_eq!(state.level, 1);
}

#[test]
fn cleared_record_has_no_target() {
    let state = EscalationState::cleared("acme/widget", 2_000);
    assert!(!state.is_active());
    assert_eq!(state.build, -1);
    assert!(state.target.is_empty());
    assert_eq!(state.timestamp_ms, 2_000);
}

#[test]
fn age_saturates_for_clock_skew() {
    let state = EscalationState::notified("acme/widget", 5, "alice", 10_000);
    assert_eq!(state.age_ms(15_000), 5_000);
    assert_eq!(state.age_ms(9_000), 0);
}

#[test]
fn level_defaults_when_missing() {
    let state: EscalationState = serde_json::from_str(
        r#"{"job": "acme/widget", "target": "alice", "build": 5, "timestamp_ms": 1}"#,
    )
    .unwrap();
    assert_eq!(state.level, 1);
}
