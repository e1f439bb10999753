// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kvetch: classify CI failures and nag the right people about them

mod color;
mod commands;
mod context;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{builds, db, escalate, record, scan, status};
use context::Context;
use exit_error::ExitError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kvetch",
    version,
    about = "Classify CI failures and escalate them to the people who can fix them",
    styles = color::styles()
)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file (default: $KVETCH_CONFIG, then ~/.config/kvetch/kvetch.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the exported build tree (default: $KVETCH_SOURCE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Store directory (default: $KVETCH_STATE_DIR, then ~/.local/state/kvetch)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Log debug output to stderr (overrides $KVETCH_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a console transcript and print its failure summary
    Scan(scan::ScanArgs),
    /// Show the last completed build of each job
    Status(status::StatusArgs),
    /// Show build facts from the build source
    Builds(builds::BuildsArgs),
    /// Copy completed builds and their logs into the store
    Record(record::RecordArgs),
    /// Inspect the store
    Db(db::DbArgs),
    /// Evaluate builds and notify whoever should act
    Escalate(escalate::EscalateArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(env::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(&cli.globals)?;
    match cli.command {
        Commands::Scan(args) => scan::handle(args, &ctx).await,
        Commands::Status(args) => status::handle(args, &ctx).await,
        Commands::Builds(args) => builds::handle(args, &ctx).await,
        Commands::Record(args) => record::handle(args, &ctx).await,
        Commands::Db(args) => db::handle(args, &ctx).await,
        Commands::Escalate(args) => escalate::handle(args, &ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.globals.verbose);

    if let Err(err) = run(cli).await {
        let code = match err.downcast_ref::<ExitError>() {
            Some(exit) => exit.code,
            None => exit_error::PARTIAL_FAILURE,
        };
        eprintln!("kvetch: {:#}", err);
        std::process::exit(code);
    }
}
