// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch escalate` specs

use crate::prelude::*;

#[test]
fn dry_run_prints_message_and_writes_nothing() {
    let ws = Workspace::failing_widget();

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget", "--dry-run"])
        .passes()
        .stdout_has("From: kvetch@localhost\n")
        .stdout_has("To: bob@x.com\n")
        .stdout_has("Subject: [kvetch] acme » widget #42: failed\n")
        .stdout_has("Duration: 0:02:05\n")
        .stdout_has("  abc123 bob@x.com Tighten parser\n")
        .stdout_has("[ERROR] widget.c:10:5: error: expected ';'\n")
        .stderr_has("notified 1");

    assert!(!ws.has("state/state.json"));
}

#[test]
fn repeat_run_is_suppressed() {
    let ws = Workspace::failing_widget();

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget"])
        .passes()
        .stdout_has("To: bob@x.com")
        .stderr_has("notified 1")
        .stderr_has("recorded 2");
    assert!(ws.has("state/state.json"));
    assert!(ws.has("state/logs/acme/widget/42.log.zst"));

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget"])
        .passes()
        .stdout_lacks("Subject:")
        .stderr_has("suppressed 1");
}

#[test]
fn old_claim_copies_the_manager() {
    let ws = Workspace::failing_widget();
    ws.file(
        "kvetch.toml",
        "[directory]\norg_chart = \"org.json\"\nemail_domain = \"x.com\"\n",
    );
    ws.file("org.json", r#"{"lead": "dana", "members": ["alice"]}"#);
    ws.job(
        "acme/widget",
        r#"{"last_completed_build": 43, "last_failed_build": 43, "last_successful_build": 41}"#,
    );
    ws.build(
        "acme/widget",
        43,
        r#"{"result": "FAILURE", "claim": {"claimed_by": "alice", "assigned_by": "alice"}}"#,
        COMPILE_FAILURE,
    );

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget", "--dry-run"])
        .passes()
        .stdout_has("To: alice@x.com\n")
        .stdout_has("Cc: dana@x.com\n")
        .stdout_has("Subject: [kvetch] acme » widget #43: still failing after")
        .stdout_has("Claimed:  alice\n");
}

#[test]
fn unknown_claimant_goes_to_build_monitor() {
    let ws = Workspace::failing_widget();
    ws.build(
        "acme/widget",
        42,
        r#"{"result": "FAILURE", "claim": {"claimed_by": "zed", "assigned_by": "zed"}}"#,
        COMPILE_FAILURE,
    );

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget", "--dry-run"])
        .passes()
        .stdout_has("To: build-monitor@localhost\n")
        .stdout_has("claimant unreachable");
}

#[test]
fn infrastructure_failure_goes_to_build_monitor() {
    let ws = Workspace::failing_widget();
    ws.build(
        "acme/widget",
        42,
        r#"{"result": "FAILURE"}"#,
        "git clone x\nssh: connect to host git.example.com port 22: Connection refused\n",
    );

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget", "--dry-run"])
        .passes()
        .stdout_has("To: build-monitor@localhost\n")
        .stdout_has("infrastructure failure");
}

#[test]
fn view_selects_jobs() {
    let ws = Workspace::failing_widget();
    ws.file("ci/views/nightly.json", r#"{"jobs": ["acme/widget"]}"#);

    ws.kvetch()
        .args(&["escalate", "-v", "nightly", "--dry-run"])
        .passes()
        .stdout_has("To: bob@x.com");
}

#[test]
fn unknown_job_fails_the_run() {
    let ws = Workspace::failing_widget();

    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget", "-j", "acme/missing", "-n", "--dry-run"])
        .fails()
        .code_is(1)
        .stdout_has("To: bob@x.com")
        .stderr_has("1 build(s) failed");
}

#[test]
fn no_jobs_is_a_usage_error() {
    let ws = Workspace::failing_widget();
    ws.kvetch().args(&["escalate"]).fails().code_is(2).stderr_has("no jobs given");
}

#[test]
fn missing_source_is_a_usage_error() {
    let ws = Workspace::new();
    let state = ws.path("state");
    cli()
        .args(&["--state-dir", &state.to_string_lossy(), "escalate", "-j", "acme/widget"])
        .fails()
        .code_is(2)
        .stderr_has("no build source");
}

#[test]
fn bad_selector_is_rejected() {
    let ws = Workspace::failing_widget();
    ws.kvetch()
        .args(&["escalate", "-j", "acme/widget", "-b", "yesterday"])
        .fails()
        .code_is(2)
        .stderr_has("invalid build selector");
}
