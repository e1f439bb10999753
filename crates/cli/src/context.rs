// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Everything a command needs, resolved once from flags, environment and
//! the config file.

use crate::env;
use crate::exit_error::ExitError;
use crate::GlobalArgs;
use anyhow::{Context as _, Result};
use kv_adapters::{CommandNotifier, DirSource, Notifier, OrgChart, PrintNotifier};
use kv_core::SystemClock;
use kv_engine::{Config, EscalationPolicy, Runner};
use kv_scanner::LogScanner;
use kv_storage::FileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub struct Context {
    pub config: Config,
    /// Relative paths in the config resolve against this directory
    config_dir: PathBuf,
    source_dir: Option<PathBuf>,
    state_dir: Option<PathBuf>,
}

impl Context {
    pub fn load(globals: &GlobalArgs) -> Result<Self> {
        let config = match &globals.config {
            Some(path) if !path.exists() => {
                return Err(ExitError::usage(format!("config {} not found", path.display())).into())
            }
            Some(path) => Some(path.clone()),
            None => env::config_path(),
        };
        let loaded = match &config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let config_dir =
            config.as_deref().and_then(Path::parent).map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(config = ?config, "configuration loaded");

        Ok(Self {
            config: loaded,
            config_dir,
            source_dir: globals.source.clone().or_else(env::source_dir),
            state_dir: globals.state_dir.clone().or_else(env::state_dir),
        })
    }

    pub fn source(&self) -> Result<DirSource> {
        match &self.source_dir {
            Some(dir) => Ok(DirSource::new(dir)),
            None => {
                Err(ExitError::usage("no build source: pass --source or set KVETCH_SOURCE_DIR")
                    .into())
            }
        }
    }

    pub fn store(&self) -> Result<Arc<FileStore>> {
        let Some(dir) = &self.state_dir else {
            return Err(ExitError::usage(
                "no state directory: pass --state-dir or set KVETCH_STATE_DIR",
            )
            .into());
        };
        let store = FileStore::open(dir)
            .with_context(|| format!("failed to open store in {}", dir.display()))?;
        Ok(Arc::new(store))
    }

    /// The named scanner, or the configured default.
    pub fn scanner(&self, name: Option<&str>) -> Result<Arc<dyn LogScanner>> {
        Ok(self.config.scanner.scanner(name)?)
    }

    pub fn directory(&self) -> Result<OrgChart> {
        Ok(self.config.directory.open(&self.config_dir)?)
    }

    /// The configured transport; printing when none is configured or when
    /// nothing may leave the machine.
    pub fn notifier(&self, dry_run: bool) -> Box<dyn Notifier> {
        let from = self.config.escalation.from.clone();
        match &self.config.notify.command {
            Some(command) if !dry_run => {
                let timeout = Duration::from_secs(self.config.notify.timeout_secs);
                Box::new(CommandNotifier::new(from, command.clone()).timeout(timeout))
            }
            _ => Box::new(PrintNotifier::new(from)),
        }
    }

    pub fn runner(&self, dry_run: bool) -> Result<Runner<DirSource, Box<dyn Notifier>>> {
        let policy = EscalationPolicy::new(self.config.escalation.clone(), SystemClock);
        let runner = Runner::new(
            self.source()?,
            self.store()?,
            Arc::new(self.directory()?),
            self.notifier(dry_run),
            self.scanner(None)?,
            policy,
        );
        Ok(runner.dry_run(dry_run))
    }
}
