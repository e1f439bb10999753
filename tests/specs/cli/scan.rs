// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch scan` specs

use crate::prelude::*;

const TRANSCRIPT: &str = "\
[2025-01-02T10:00:00.000Z] git clone https://git.example.com/widget.git
Cloning into 'widget'...
ERROR: Skipping widget-legacy because it is permanently disabled
make -f all.mk all
widget.c:10:5: error: expected ';'
make: *** [all] Error 1
";

#[test]
fn summary_of_stdin_grouped_by_phase() {
    cli().args(&["scan"]).stdin(TRANSCRIPT).passes().stdout_eq(
        "Build\n\
         -----\n\
         [ERROR] widget.c:10:5: error: expected ';'\n\
         [ERROR] make: *** [all] Error 1\n",
    );
}

#[test]
fn clean_transcript_reports_no_failures() {
    cli()
        .args(&["scan"])
        .stdin("building\nall good\n")
        .passes()
        .stdout_eq("No known failures were detected\n");
}

#[test]
fn json_output_carries_fault_kind_and_records() {
    let ws = Workspace::new();
    ws.file("console.log", TRANSCRIPT);
    let path = ws.path("console.log");

    let run = cli().args(&["scan", &path.to_string_lossy(), "--output", "json"]).passes();
    let json = run.json();
    assert_eq!(json["fault_kind"], "developer");
    assert_eq!(json["line_count"], 6);
    assert_eq!(json["records"][0]["phase"], "build");
    assert_eq!(json["records"][0]["lines"].as_array().unwrap().len(), 2);
}

#[test]
fn limit_truncates_summary() {
    cli().args(&["scan", "--limit", "2"]).stdin(TRANSCRIPT).passes().stdout_eq("Build\n-----\n");
}

#[test]
fn unknown_scanner_is_rejected() {
    cli()
        .args(&["scan", "--scanner", "nightly"])
        .stdin(TRANSCRIPT)
        .fails()
        .stderr_has("unknown scanner \"nightly\"");
}

#[test]
fn configured_table_is_selectable() {
    let ws = Workspace::new();
    ws.file(
        "kvetch.toml",
        r#"
[scanner.tables.python]
errors = [{ pattern = "^Traceback", prefix = true, kind = "developer" }]
"#,
    );

    ws.kvetch()
        .args(&["scan", "--scanner", "python"])
        .stdin("Traceback (most recent call last):\n")
        .passes()
        .stdout_has("[ERROR] Traceback (most recent call last):");
}

#[test]
fn job_scans_last_completed_console_from_source() {
    let ws = Workspace::failing_widget();
    ws.kvetch().args(&["scan", "-j", "acme/widget"]).passes().stdout_eq(
        "Build\n\
         -----\n\
         [ERROR] widget.c:10:5: error: expected ';'\n\
         [ERROR] make: *** [all] Error 1\n",
    );
}

#[test]
fn several_source_builds_get_headers() {
    let ws = Workspace::failing_widget();
    ws.kvetch()
        .args(&["scan", "-j", "acme/widget", "-b", "41", "-b", "42"])
        .passes()
        .stdout_has("==> acme » widget #41 <==\nNo known failures were detected\n")
        .stdout_has("==> acme » widget #42 <==\nBuild\n-----\n");
}

#[test]
fn source_scan_as_json_names_each_build() {
    let ws = Workspace::failing_widget();
    let run = ws.kvetch().args(&["scan", "-j", "acme/widget", "-b", "42", "-o", "json"]).passes();
    let json = run.json();
    assert_eq!(json[0]["job"], "acme/widget");
    assert_eq!(json[0]["build"], 42);
    assert_eq!(json[0]["fault_kind"], "developer");
}

#[test]
fn missing_source_console_is_a_partial_failure() {
    let ws = Workspace::failing_widget();
    ws.kvetch()
        .args(&["scan", "-j", "acme/widget", "-b", "42", "-b", "99"])
        .fails()
        .code_is(1)
        .stdout_has("==> acme » widget #42 <==");
}

#[test]
fn file_and_job_together_is_a_usage_error() {
    let ws = Workspace::failing_widget();
    ws.file("console.log", TRANSCRIPT);
    let path = ws.path("console.log");
    ws.kvetch().args(&["scan", &path.to_string_lossy(), "-j", "acme/widget"]).fails().code_is(2);
}
