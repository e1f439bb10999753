// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch record` and `kvetch db` specs

use crate::prelude::*;

fn recorded_widget() -> Workspace {
    let ws = Workspace::failing_widget();
    ws.kvetch().args(&["record", "-j", "acme/widget"]).passes().stderr_has("recorded 2");
    ws
}

#[test]
fn list_shows_recorded_builds() {
    let ws = recorded_widget();
    ws.kvetch().args(&["db", "list", "-j", "acme/widget"]).passes().stdout_eq(
        "acme » widget #41  SUCCESS  0:00:00\n\
         acme » widget #42  FAILURE  0:02:05\n",
    );
}

#[test]
fn record_twice_skips_known_builds() {
    let ws = recorded_widget();
    ws.kvetch()
        .args(&["record", "-j", "acme/widget"])
        .passes()
        .stderr_has("skipped 2, recorded 0");
}

#[test]
fn log_prints_recorded_console() {
    let ws = recorded_widget();
    ws.kvetch()
        .args(&["db", "log", "-j", "acme/widget", "-b", "42"])
        .passes()
        .stdout_eq(COMPILE_FAILURE);
}

#[test]
fn several_logs_get_headers() {
    let ws = recorded_widget();
    ws.kvetch()
        .args(&["db", "log", "-j", "acme/widget"])
        .passes()
        .stdout_has("==> acme » widget #41 <==\nall good\n==> acme » widget #42 <==\n");
}

#[test]
fn scan_summarizes_recorded_console() {
    let ws = recorded_widget();
    ws.kvetch()
        .args(&["db", "scan", "-j", "acme/widget", "-b", "lastFailedBuild"])
        .passes()
        .stdout_eq(
            "Build\n\
             -----\n\
             [ERROR] widget.c:10:5: error: expected ';'\n\
             [ERROR] make: *** [all] Error 1\n",
        );
}

#[test]
fn list_json_includes_open_escalation() {
    let ws = Workspace::failing_widget();
    ws.kvetch().args(&["escalate", "-j", "acme/widget"]).passes();

    let run = ws.kvetch().args(&["db", "list", "-j", "acme/widget", "-o", "json"]).passes();
    let json = run.json();
    assert_eq!(json["builds"].as_array().unwrap().len(), 2);
    assert_eq!(json["escalations"][0]["job"], "acme/widget");
    assert_eq!(json["escalations"][0]["target"], "bob@x.com");
    assert_eq!(json["escalations"][0]["build"], 42);
}

#[test]
fn empty_store_lists_nothing() {
    let ws = Workspace::failing_widget();
    ws.kvetch().args(&["db", "list", "-j", "acme/widget"]).passes().stdout_eq("");
}

#[test]
fn scan_reports_missing_log_instead_of_scanning_nothing() {
    let ws = recorded_widget();
    std::fs::remove_file(ws.path("state/logs/acme/widget/42.log.zst")).unwrap();
    ws.kvetch()
        .args(&["db", "scan", "-j", "acme/widget", "-b", "42"])
        .fails()
        .code_is(1)
        .stderr_has("No log recorded for acme » widget #42")
        .stdout_lacks("No known failures");
}
