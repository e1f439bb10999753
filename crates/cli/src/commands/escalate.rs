// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch escalate`: decide who to tell about each build, and tell them.

use super::{check_report, BuildArgs, JobArgs};
use crate::context::Context;
use crate::output::report_line;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct EscalateArgs {
    #[command(flatten)]
    pub jobs: JobArgs,

    #[command(flatten)]
    pub builds: BuildArgs,

    /// Print messages instead of sending them and leave the store untouched
    #[arg(long)]
    pub dry_run: bool,

    /// Do not pull new builds into the store first
    #[arg(short = 'n', long)]
    pub no_record: bool,
}

pub async fn handle(args: EscalateArgs, ctx: &Context) -> Result<()> {
    let runner = ctx.runner(args.dry_run)?;
    let jobs = args.jobs.resolve(ctx).await?;

    let mut report = if args.no_record || args.dry_run {
        Default::default()
    } else {
        runner.record(&jobs, &[]).await
    };
    let escalated = runner.escalate(&jobs, &args.builds.builds).await;
    report.evaluated = escalated.evaluated;
    report.notified = escalated.notified;
    report.suppressed = escalated.suppressed;
    report.skipped += escalated.skipped;
    report.failed += escalated.failed;

    eprintln!("{}", report_line(&report));
    check_report(&report)
}
