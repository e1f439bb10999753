// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvetch scan`: classify a transcript from a file, stdin or straight from
//! the build source.

use super::{BuildArgs, JobArgs};
use crate::context::Context;
use crate::exit_error::{ExitError, PARTIAL_FAILURE};
use crate::output::{build_header, print_json, OutputFormat};
use anyhow::{Context as _, Result};
use clap::Args;
use kv_adapters::BuildSource;
use kv_engine::BuildSelector;
use kv_scanner::{scan_reader, LogScanner, ScanResult};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Transcript to scan; stdin when omitted or `-`
    pub file: Option<PathBuf>,

    // With -j/-v, consoles come from the build source instead; builds
    // default to lastCompletedBuild.
    #[command(flatten)]
    pub jobs: JobArgs,

    #[command(flatten)]
    pub builds: BuildArgs,

    /// Scanner to use instead of the configured one
    #[arg(long)]
    pub scanner: Option<String>,

    /// Summary lines per transcript (default: all for one, the configured
    /// limit for several; 0 = all)
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// One scanned console in JSON output.
#[derive(Serialize)]
struct BuildScan {
    job: String,
    build: u64,
    #[serde(flatten)]
    result: ScanResult,
}

pub async fn handle(args: ScanArgs, ctx: &Context) -> Result<()> {
    let scanner = ctx.scanner(args.scanner.as_deref())?;
    let from_source = !args.jobs.jobs.is_empty() || args.jobs.view.is_some();
    if !from_source {
        return scan_file(&args, scanner.as_ref());
    }
    if args.file.is_some() {
        return Err(ExitError::usage("pass either a FILE or -j/-v, not both").into());
    }

    let source = ctx.source()?;
    let jobs = args.jobs.resolve(ctx).await?;
    let selectors = if args.builds.builds.is_empty() {
        vec![BuildSelector::LastCompletedBuild]
    } else {
        args.builds.builds.clone()
    };

    let mut targets = Vec::new();
    let mut failed = 0;
    for name in &jobs {
        match source.job(name).await {
            Ok(job) => {
                let numbers = BuildSelector::select(&selectors, &job);
                targets.extend(numbers.into_iter().map(|n| (name.clone(), n)));
            }
            Err(e) => {
                failed += 1;
                tracing::error!(job = %name, error = %e, "failed to read job");
            }
        }
    }

    let several = targets.len() > 1;
    let default_limit = if several { ctx.config.scanner.summary_limit } else { 0 };
    let limit = args.limit.unwrap_or(default_limit);
    let mut scanned = Vec::new();
    for (job, number) in targets {
        let console = match source.console(&job, number).await {
            Ok(console) => console,
            Err(e) => {
                failed += 1;
                tracing::error!(job = %job, build = number, error = %e, "console read failed");
                continue;
            }
        };
        let result = scanner.scan_text(&console);
        match args.output {
            OutputFormat::Text => {
                if several {
                    println!("{}", build_header(&kv_core::full_display_name(&job, number)));
                }
                println!("{}", result.summary_head(limit));
            }
            OutputFormat::Json => scanned.push(BuildScan { job, build: number, result }),
        }
    }
    if args.output == OutputFormat::Json {
        print_json(&scanned)?;
    }

    if failed > 0 {
        return Err(ExitError::new(PARTIAL_FAILURE, format!("{} read(s) failed", failed)).into());
    }
    Ok(())
}

fn scan_file(args: &ScanArgs, scanner: &dyn LogScanner) -> Result<()> {
    let result = match args.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            scan_reader(scanner, BufReader::new(file))
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        _ => scan_reader(scanner, std::io::stdin().lock()).context("failed to read stdin")?,
    };
    tracing::debug!(
        scanner = scanner.name(),
        lines = result.line_count,
        fault = %result.fault_kind,
        "transcript scanned"
    );

    match args.output {
        OutputFormat::Text => println!("{}", result.summary_head(args.limit.unwrap_or(0))),
        OutputFormat::Json => print_json(&result)?,
    }
    Ok(())
}
