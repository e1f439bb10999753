// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch record`: copy completed builds and their logs into the store.

use super::{check_report, BuildArgs, JobArgs};
use crate::context::Context;
use crate::output::report_line;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub jobs: JobArgs,

    #[command(flatten)]
    pub builds: BuildArgs,
}

pub async fn handle(args: RecordArgs, ctx: &Context) -> Result<()> {
    let runner = ctx.runner(false)?;
    let jobs = args.jobs.resolve(ctx).await?;
    let report = runner.record(&jobs, &args.builds.builds).await;
    eprintln!("{}", report_line(&report));
    check_report(&report)
}
