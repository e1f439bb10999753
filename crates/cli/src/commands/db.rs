// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch db`: read what `record` and `escalate` left in the store.

use super::{BuildArgs, JobArgs};
use crate::context::Context;
use crate::exit_error::{ExitError, PARTIAL_FAILURE};
use crate::output::{build_header, build_line, print_json, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use kv_core::{format_elapsed_ms, BuildFacts, Clock, JobFacts, SystemClock};
use kv_engine::BuildSelector;
use kv_storage::Store;

#[derive(Args, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// List recorded builds and open escalations
    List {
        #[command(flatten)]
        jobs: JobArgs,
        #[command(flatten)]
        builds: BuildArgs,
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Print recorded console logs
    Log {
        #[command(flatten)]
        jobs: JobArgs,
        #[command(flatten)]
        builds: BuildArgs,
    },
    /// Scan recorded console logs and print their summaries
    Scan {
        #[command(flatten)]
        jobs: JobArgs,
        #[command(flatten)]
        builds: BuildArgs,
        /// Scanner to use instead of the configured one
        #[arg(long)]
        scanner: Option<String>,
        /// Summary lines per build (default: all for one build, the configured
        /// limit for several)
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub async fn handle(args: DbArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    match args.command {
        DbCommand::List { jobs, builds, output } => {
            let jobs = jobs.resolve(ctx).await?;
            let selected = select(store.as_ref(), &jobs, &builds.builds)?;
            match output {
                OutputFormat::Text => {
                    for build in &selected {
                        println!("{}", build_line(build));
                    }
                    let now = SystemClock.epoch_ms();
                    for job in &jobs {
                        if let Some(open) = store.get_escalation(job)?.filter(|e| e.is_active()) {
                            println!(
                                "{}  escalated #{} to {} ({} ago)",
                                job,
                                open.build,
                                open.target,
                                format_elapsed_ms(open.age_ms(now))
                            );
                        }
                    }
                }
                OutputFormat::Json => {
                    let escalations: Vec<_> = store
                        .escalations()?
                        .into_iter()
                        .filter(|e| jobs.contains(&e.job))
                        .collect();
                    print_json(&serde_json::json!({
                        "builds": selected,
                        "escalations": escalations,
                    }))?;
                }
            }
            Ok(())
        }
        DbCommand::Log { jobs, builds } => {
            let jobs = jobs.resolve(ctx).await?;
            let selected = select(store.as_ref(), &jobs, &builds.builds)?;
            let mut missing = 0;
            for build in &selected {
                if selected.len() > 1 {
                    println!("{}", build_header(&build.display_name()));
                }
                match store.get_console(&build.job, build.number)? {
                    Some(console) => {
                        print!("{}", console);
                        if !console.is_empty() && !console.ends_with('\n') {
                            println!();
                        }
                    }
                    None => {
                        missing += 1;
                        eprintln!("No log recorded for {}", build.display_name());
                    }
                }
            }
            if missing > 0 {
                return Err(ExitError::new(PARTIAL_FAILURE, format!("{} log(s) missing", missing))
                    .into());
            }
            Ok(())
        }
        DbCommand::Scan { jobs, builds, scanner, limit } => {
            let jobs = jobs.resolve(ctx).await?;
            let scanner = ctx.scanner(scanner.as_deref())?;
            let selected = select(store.as_ref(), &jobs, &builds.builds)?;
            let several = selected.len() > 1;
            let limit =
                limit.unwrap_or(if several { ctx.config.scanner.summary_limit } else { 0 });
            let mut missing = 0;
            for build in &selected {
                if several {
                    println!("{}", build_header(&build.display_name()));
                }
                match store.get_console(&build.job, build.number)? {
                    Some(console) => {
                        println!("{}", scanner.scan_text(&console).summary_head(limit));
                    }
                    None => {
                        missing += 1;
                        eprintln!("No log recorded for {}", build.display_name());
                    }
                }
            }
            if missing > 0 {
                return Err(ExitError::new(PARTIAL_FAILURE, format!("{} log(s) missing", missing))
                    .into());
            }
            Ok(())
        }
    }
}

/// Recorded builds of each job picked by `selectors`, all of them by default.
fn select(
    store: &dyn Store,
    jobs: &[String],
    selectors: &[BuildSelector],
) -> Result<Vec<BuildFacts>> {
    let mut selected = Vec::new();
    for name in jobs {
        let recorded = store.builds(name)?;
        let job = JobFacts::from_builds(name.as_str(), &recorded);
        let numbers = BuildSelector::select(selectors, &job);
        if numbers.is_empty() {
            tracing::warn!(job = %name, "no recorded builds selected");
        }
        selected.extend(recorded.into_iter().filter(|b| numbers.contains(&b.number)));
    }
    Ok(selected)
}
