// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers

pub mod builds;
pub mod db;
pub mod escalate;
pub mod record;
pub mod scan;
pub mod status;

use crate::context::Context;
use crate::exit_error::{ExitError, PARTIAL_FAILURE};
use anyhow::Result;
use clap::Args;
use kv_engine::{BuildSelector, RunReport};
use std::collections::HashSet;

/// Which jobs to work on.
#[derive(Args, Debug, Clone)]
pub struct JobArgs {
    /// Job name, e.g. `group/job` (repeatable)
    #[arg(short = 'j', long = "job", value_name = "JOB")]
    pub jobs: Vec<String>,

    /// Every job listed in this view
    #[arg(short = 'v', long, value_name = "VIEW")]
    pub view: Option<String>,
}

impl JobArgs {
    /// Resolve to job names; the build source is only consulted for a view.
    pub async fn resolve(&self, ctx: &Context) -> Result<Vec<String>> {
        let jobs = match &self.view {
            Some(view) => {
                let source = ctx.source()?;
                kv_engine::resolve_jobs(&source, &self.jobs, Some(view)).await?
            }
            None => {
                let mut seen = HashSet::new();
                self.jobs.iter().filter(|job| seen.insert(job.as_str())).cloned().collect()
            }
        };
        if jobs.is_empty() {
            return Err(ExitError::usage("no jobs given: pass -j JOB or -v VIEW").into());
        }
        Ok(jobs)
    }
}

/// Which builds of each job to work on.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build number or lastBuild, lastCompletedBuild, lastFailedBuild,
    /// lastSuccessfulBuild (repeatable)
    #[arg(short = 'b', long = "build", value_name = "SEL")]
    pub builds: Vec<BuildSelector>,
}

/// Turn a pass with failures into a non-zero exit.
pub fn check_report(report: &RunReport) -> Result<()> {
    if report.is_clean() {
        return Ok(());
    }
    Err(ExitError::new(PARTIAL_FAILURE, format!("{} build(s) failed, see log", report.failed))
        .into())
}
