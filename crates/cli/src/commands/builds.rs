// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch builds`: build facts straight from the build source.

use super::{BuildArgs, JobArgs};
use crate::context::Context;
use crate::exit_error::{ExitError, PARTIAL_FAILURE};
use crate::output::{build_line, print_json, OutputFormat};
use anyhow::Result;
use clap::Args;
use kv_adapters::BuildSource;
use kv_engine::BuildSelector;

#[derive(Args, Debug)]
pub struct BuildsArgs {
    #[command(flatten)]
    pub jobs: JobArgs,

    #[command(flatten)]
    pub builds: BuildArgs,

    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

pub async fn handle(args: BuildsArgs, ctx: &Context) -> Result<()> {
    let source = ctx.source()?;
    let jobs = args.jobs.resolve(ctx).await?;

    let mut builds = Vec::new();
    let mut failed = 0;
    for name in &jobs {
        let job = match source.job(name).await {
            Ok(job) => job,
            Err(e) => {
                failed += 1;
                tracing::error!(job = %name, error = %e, "failed to read job");
                continue;
            }
        };
        for number in BuildSelector::select(&args.builds.builds, &job) {
            match source.build(name, number).await {
                Ok(build) => builds.push(build),
                Err(e) => {
                    failed += 1;
                    tracing::error!(
                        job = %name,
                        build = number,
                        error = %e,
                        "failed to read build"
                    );
                }
            }
        }
    }

    match args.output {
        OutputFormat::Text => {
            for build in &builds {
                println!("{}", build_line(build));
            }
        }
        OutputFormat::Json => print_json(&builds)?,
    }

    if failed > 0 {
        return Err(ExitError::new(PARTIAL_FAILURE, format!("{} read(s) failed", failed)).into());
    }
    Ok(())
}
