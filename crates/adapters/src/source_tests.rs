// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kv_core::{BuildResult, Claim};
use std::fs;
use tempfile::TempDir;

fn export() -> TempDir {
    let dir = TempDir::new().unwrap();
    let job = dir.path().join("acme/widget");
    fs::create_dir_all(job.join("builds")).unwrap();
    fs::write(
        job.join("job.json"),
        r#"{"last_completed_build": 43, "last_failed_build": 43, "last_successful_build": 41}"#,
    )
    .unwrap();
    fs::write(
        job.join("builds/43.json"),
        r#"{
            "result": "FAILURE",
            "timestamp_ms": 43000,
            "url": "https://ci.example.com/job/acme/job/widget/43/",
            "change_set": [{"author_email": "bob@x.com", "commit_id": "abc"}],
            "claim": {"claimed_by": "alice", "assigned_by": "alice", "claim_date_ms": 44000}
        }"#,
    )
    .unwrap();
    fs::write(job.join("builds/42.json"), r#"{"result": "ABORTED"}"#).unwrap();
    fs::write(job.join("builds/43.log"), "ERROR: broke\n").unwrap();
    fs::write(job.join("builds/notes.txt"), "ignored").unwrap();

    fs::create_dir_all(dir.path().join("views")).unwrap();
    fs::write(dir.path().join("views/nightly.json"), r#"{"jobs": ["acme/widget", "acme/gadget"]}"#)
        .unwrap();
    dir
}

#[tokio::test]
async fn job_fills_name_and_build_list() {
    let dir = export();
    let job = DirSource::new(dir.path()).job("acme/widget").await.unwrap();
    assert_eq!(job.name, "acme/widget");
    assert_eq!(job.builds, vec![43, 42]);
    assert_eq!(job.last_build, Some(43));
    assert_eq!(job.first_failure(), 42);
}

#[tokio::test]
async fn build_fills_job_and_number() {
    let dir = export();
    let source = DirSource::new(dir.path());
    let build = source.build("acme/widget", 43).await.unwrap();
    assert_eq!(build.job, "acme/widget");
    assert_eq!(build.number, 43);
    assert_eq!(build.result, Some(BuildResult::Failure));
    assert_eq!(build.authors(), vec!["bob@x.com"]);
    assert_eq!(build.claim.as_ref().map(|c| c.claimed_by.as_str()), Some("alice"));
    assert_eq!(build.display_name(), "acme » widget #43");

    let aborted = source.build("acme/widget", 42).await.unwrap();
    assert_eq!(aborted.result, Some(BuildResult::Aborted));
}

#[tokio::test]
async fn console_is_read_verbatim() {
    let dir = export();
    let console = DirSource::new(dir.path()).console("acme/widget", 43).await.unwrap();
    assert_eq!(console, "ERROR: broke\n");
}

#[tokio::test]
async fn missing_things_are_not_found() {
    let dir = export();
    let source = DirSource::new(dir.path());
    assert!(matches!(source.job("acme/gadget").await, Err(SourceError::NotFound(_))));
    assert!(matches!(source.build("acme/widget", 7).await, Err(SourceError::NotFound(_))));
    assert!(matches!(source.console("acme/widget", 42).await, Err(SourceError::NotFound(_))));
    assert!(matches!(source.jobs_in_view("weekly").await, Err(SourceError::NotFound(_))));
}

#[tokio::test]
async fn paths_cannot_escape_the_root() {
    let dir = export();
    let source = DirSource::new(dir.path().join("acme"));
    assert!(matches!(source.job("../acme/widget").await, Err(SourceError::NotFound(_))));
    assert!(matches!(source.jobs_in_view("../views/nightly").await, Err(SourceError::NotFound(_))));
}

#[tokio::test]
async fn malformed_json_names_the_file() {
    let dir = export();
    fs::write(dir.path().join("acme/widget/builds/44.json"), "{").unwrap();
    let err = DirSource::new(dir.path()).build("acme/widget", 44).await.unwrap_err();
    match err {
        SourceError::Json { path, .. } => assert!(path.ends_with("builds/44.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn views_list_jobs() {
    let dir = export();
    let jobs = DirSource::new(dir.path()).jobs_in_view("nightly").await.unwrap();
    assert_eq!(jobs, vec!["acme/widget", "acme/gadget"]);
}

#[tokio::test]
async fn fake_source_counts_console_reads() {
    let source = FakeSource::new();
    let build = BuildFacts::builder()
        .number(5)
        .claim(Claim::new("alice", "alice"))
        .build();
    source.add_build(build.clone(), "log");
    assert_eq!(source.build("acme/widget", 5).await.unwrap(), build);
    assert_eq!(source.console("acme/widget", 5).await.unwrap(), "log");
    assert_eq!(source.console_reads(), 1);
}
