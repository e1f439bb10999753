// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for driving the binary against a throwaway build tree.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Path of the `kvetch` binary, built once per test run.
///
/// The binary belongs to the `kvetch` package, so cargo neither builds it
/// for this package's tests nor sets `CARGO_BIN_EXE_kvetch`. It is built
/// into the same target profile directory as the running test.
pub fn kvetch_bin() -> &'static Path {
    static BIN: OnceLock<PathBuf> = OnceLock::new();
    BIN.get_or_init(|| {
        if let Some(path) = option_env!("CARGO_BIN_EXE_kvetch") {
            return PathBuf::from(path);
        }
        // target/<profile>/deps/specs-<hash>
        let exe = std::env::current_exe().unwrap();
        let profile_dir = exe.parent().and_then(Path::parent).unwrap().to_path_buf();
        let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
        let mut build = std::process::Command::new(cargo);
        build.args(["build", "--quiet", "-p", "kvetch", "--bin", "kvetch"]);
        if profile_dir.file_name().is_some_and(|name| name == "release") {
            build.arg("--release");
        }
        let status = build.current_dir(env!("CARGO_MANIFEST_DIR")).status().unwrap();
        assert!(status.success(), "building kvetch failed");
        profile_dir.join(format!("kvetch{}", std::env::consts::EXE_SUFFIX))
    })
}

/// The binary with every `KVETCH_*` variable cleared and color off.
pub fn cli() -> Cli {
    let mut cmd = Command::new(kvetch_bin());
    for var in ["KVETCH_CONFIG", "KVETCH_SOURCE_DIR", "KVETCH_STATE_DIR", "KVETCH_LOG"] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> Run {
        let run = Run::from(self.cmd.output().unwrap());
        assert_eq!(run.code, Some(0), "expected success\nstderr:\n{}", run.stderr);
        run
    }

    pub fn fails(mut self) -> Run {
        let run = Run::from(self.cmd.output().unwrap());
        assert_ne!(run.code, Some(0), "expected failure\nstdout:\n{}", run.stdout);
        run
    }
}

pub struct Run {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl From<std::process::Output> for Run {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        }
    }
}

impl Run {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn code_is(self, code: i32) -> Self {
        assert_eq!(self.code, Some(code), "stderr:\n{}", self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}

/// Temporary workspace: an exported build tree under `ci/`, a store under
/// `state/` and a `kvetch.toml`.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let ws = Self { dir: tempfile::tempdir().unwrap() };
        ws.file("kvetch.toml", "");
        ws
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn job(&self, name: &str, facts: &str) -> &Self {
        self.file(&format!("ci/{name}/job.json"), facts)
    }

    pub fn build(&self, job: &str, number: u64, facts: &str, console: &str) -> &Self {
        self.file(&format!("ci/{job}/builds/{number}.json"), facts);
        self.file(&format!("ci/{job}/builds/{number}.log"), console)
    }

    pub fn has(&self, rel: &str) -> bool {
        Path::exists(&self.path(rel))
    }

    /// The binary pointed at this workspace.
    pub fn kvetch(&self) -> Cli {
        let config = self.path("kvetch.toml");
        let source = self.path("ci");
        let state = self.path("state");
        cli().args(&[
            "--config",
            &config.to_string_lossy(),
            "--source",
            &source.to_string_lossy(),
            "--state-dir",
            &state.to_string_lossy(),
        ])
    }
}

pub const COMPILE_FAILURE: &str = "\
git clone https://git.example.com/widget.git
make -f all.mk all
widget.c:10:5: error: expected ';'
make: *** [all] Error 1
";

impl Workspace {
    /// `acme/widget`: #41 passed, #42 failed after a commit by bob.
    pub fn failing_widget() -> Self {
        let ws = Self::new();
        ws.job(
            "acme/widget",
            r#"{
                "last_build": 42,
                "last_completed_build": 42,
                "last_failed_build": 42,
                "last_successful_build": 41
            }"#,
        );
        ws.build("acme/widget", 41, r#"{"result": "SUCCESS"}"#, "all good\n");
        ws.build(
            "acme/widget",
            42,
            r#"{
                "result": "FAILURE",
                "duration_ms": 125000,
                "url": "https://ci.example.com/job/acme/job/widget/42/",
                "change_set": [
                    {
                        "author_email": "bob@x.com",
                        "commit_id": "abc123",
                        "comment": "Tighten parser"
                    }
                ]
            }"#,
            COMPILE_FAILURE,
        );
        ws
    }
}
