// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch status`: one line per job.

use super::JobArgs;
use crate::context::Context;
use crate::exit_error::{ExitError, PARTIAL_FAILURE};
use crate::output::{print_json, JobStatus, OutputFormat};
use anyhow::Result;
use clap::Args;
use kv_adapters::{BuildSource, SourceError};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub jobs: JobArgs,

    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

pub async fn handle(args: StatusArgs, ctx: &Context) -> Result<()> {
    let source = ctx.source()?;
    let jobs = args.jobs.resolve(ctx).await?;

    let mut statuses = Vec::with_capacity(jobs.len());
    let mut unreadable = 0;
    for name in &jobs {
        match status_of(&source, name).await {
            Ok(status) => statuses.push(status),
            Err(e) => {
                unreadable += 1;
                tracing::error!(job = %name, error = %e, "failed to read job");
            }
        }
    }

    match args.output {
        OutputFormat::Text => {
            for status in &statuses {
                println!("{}", status.line());
            }
        }
        OutputFormat::Json => print_json(&statuses)?,
    }

    if unreadable > 0 {
        return Err(
            ExitError::new(PARTIAL_FAILURE, format!("{} job(s) could not be read", unreadable))
                .into(),
        );
    }
    Ok(())
}

/// Green jobs are answered from the job facts alone.
async fn status_of(source: &dyn BuildSource, name: &str) -> Result<JobStatus, SourceError> {
    let job = source.job(name).await?;
    if job.is_green() {
        return Ok(JobStatus::green(&job));
    }
    match job.last_completed_build {
        Some(number) => Ok(JobStatus::from_build(&source.build(name, number).await?)),
        None => Ok(JobStatus::never_completed(&job)),
    }
}
