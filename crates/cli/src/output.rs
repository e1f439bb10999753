// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared text and JSON rendering for command output.

use clap::ValueEnum;
use kv_core::{format_duration_ms, BuildFacts, JobFacts};
use kv_engine::RunReport;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Banner separating per-build output when several builds are shown.
pub fn build_header(name: &str) -> String {
    crate::color::header(&format!("==> {} <==", name))
}

/// One line per build: name, result, duration and claim.
pub fn build_line(build: &BuildFacts) -> String {
    let result = if build.in_progress {
        "RUNNING".to_string()
    } else {
        build.result.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
    };
    let mut line = format!(
        "{}  {}  {}",
        build.display_name(),
        crate::color::result(&result),
        format_duration_ms(build.duration_ms)
    );
    if let Some(who) = build.claimant() {
        line.push_str(&format!("  claimed by {}", who));
    }
    line
}

/// Status of a job from its facts and, when not green, its last completed build.
#[derive(Debug, Serialize)]
pub struct JobStatus {
    pub job: String,
    pub build: Option<u64>,
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
}

impl JobStatus {
    pub fn green(job: &JobFacts) -> Self {
        Self {
            job: job.name.clone(),
            build: job.last_completed_build,
            result: Some("SUCCESS".to_string()),
            claimed_by: None,
        }
    }

    pub fn from_build(build: &BuildFacts) -> Self {
        Self {
            job: build.job.clone(),
            build: Some(build.number),
            result: build.result.as_ref().map(ToString::to_string),
            claimed_by: build.claimant().map(str::to_string),
        }
    }

    pub fn never_completed(job: &JobFacts) -> Self {
        Self { job: job.name.clone(), build: None, result: None, claimed_by: None }
    }

    pub fn line(&self) -> String {
        let Some(build) = self.build else {
            return format!("{}  no completed builds", self.job);
        };
        let result = self.result.as_deref().unwrap_or("-");
        let mut line = format!("{}  #{}  {}", self.job, build, crate::color::result(result));
        if let Some(who) = &self.claimed_by {
            line.push_str(&format!("  claimed by {}", who));
        }
        line
    }
}

pub fn report_line(report: &RunReport) -> String {
    format!(
        "evaluated {}, notified {}, suppressed {}, skipped {}, recorded {}, failed {}",
        report.evaluated,
        report.notified,
        report.suppressed,
        report.skipped,
        report.recorded,
        report.failed
    )
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
