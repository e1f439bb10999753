// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch passes over jobs: recording builds and escalating failures.
//!
//! Jobs are processed one after another and the builds of a job in
//! ascending order, so a recovery is always seen before a later failure of
//! the same job.

use crate::policy::{EscalationPolicy, PolicyError};
use crate::selector::BuildSelector;
use kv_adapters::{BuildSource, Directory, Notifier, NotifyError, SourceError};
use kv_core::{BuildFacts, Clock, JobFacts, SystemClock};
use kv_scanner::LogScanner;
use kv_storage::{Store, StoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Consecutive already-recorded builds after which `record` stops walking
/// back through a job's history.
const MAX_KNOWN_IN_A_ROW: usize = 3;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Tally of one pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub evaluated: usize,
    pub notified: usize,
    pub suppressed: usize,
    pub skipped: usize,
    pub recorded: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Explicit job names followed by the jobs of `view`, without repeats.
pub async fn resolve_jobs(
    source: &dyn BuildSource,
    names: &[String],
    view: Option<&str>,
) -> Result<Vec<String>, SourceError> {
    let mut jobs = names.to_vec();
    if let Some(view) = view {
        jobs.extend(source.jobs_in_view(view).await?);
    }
    let mut seen = std::collections::HashSet::new();
    jobs.retain(|job| seen.insert(job.clone()));
    Ok(jobs)
}

pub struct Runner<S: BuildSource, N: Notifier, C: Clock = SystemClock> {
    source: S,
    store: Arc<dyn Store>,
    directory: Arc<dyn Directory>,
    notifier: N,
    scanner: Arc<dyn LogScanner>,
    policy: EscalationPolicy<C>,
    dry_run: bool,
}

impl<S: BuildSource, N: Notifier, C: Clock> Runner<S, N, C> {
    pub fn new(
        source: S,
        store: Arc<dyn Store>,
        directory: Arc<dyn Directory>,
        notifier: N,
        scanner: Arc<dyn LogScanner>,
        policy: EscalationPolicy<C>,
    ) -> Self {
        Self { source, store, directory, notifier, scanner, policy, dry_run: false }
    }

    /// Send messages but never write escalation records.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn resolve_jobs(
        &self,
        names: &[String],
        view: Option<&str>,
    ) -> Result<Vec<String>, RunError> {
        Ok(resolve_jobs(&self.source, names, view).await?)
    }

    /// Copy new, completed builds and their consoles into the store.
    ///
    /// Builds are walked newest first; a job is abandoned once more than
    /// [`MAX_KNOWN_IN_A_ROW`] consecutive builds turn out to be recorded.
    pub async fn record(&self, jobs: &[String], selectors: &[BuildSelector]) -> RunReport {
        let mut report = RunReport::default();
        for name in jobs {
            let Some(job) = self.job(name, &mut report).await else {
                continue;
            };
            let mut known = 0;
            for number in BuildSelector::select(selectors, &job).into_iter().rev() {
                match self.store.has_build(&job.name, number) {
                    Ok(true) => {
                        report.skipped += 1;
                        known += 1;
                        if known > MAX_KNOWN_IN_A_ROW {
                            tracing::debug!(
                                job = %job.name,
                                build = number,
                                "caught up with store"
                            );
                            break;
                        }
                        continue;
                    }
                    Ok(false) => known = 0,
                    Err(e) => {
                        report.failed += 1;
                        tracing::error!(
                            job = %job.name,
                            build = number,
                            error = %e,
                            "store lookup failed"
                        );
                        continue;
                    }
                }
                match self.record_build(&job.name, number).await {
                    Ok(true) => report.recorded += 1,
                    Ok(false) => report.skipped += 1,
                    Err(e) => {
                        report.failed += 1;
                        tracing::error!(
                            job = %job.name,
                            build = number,
                            error = %e,
                            "failed to record build"
                        );
                    }
                }
            }
        }
        report
    }

    /// Evaluate the selected builds of each job and notify as decided.
    ///
    /// No selectors means the last completed build.
    pub async fn escalate(&self, jobs: &[String], selectors: &[BuildSelector]) -> RunReport {
        let selectors = if selectors.is_empty() {
            &[BuildSelector::LastCompletedBuild][..]
        } else {
            selectors
        };
        let mut report = RunReport::default();
        for name in jobs {
            let Some(job) = self.job(name, &mut report).await else {
                continue;
            };
            for number in BuildSelector::select(selectors, &job) {
                if let Err(e) = self.escalate_build(&job, number, &mut report).await {
                    report.failed += 1;
                    tracing::error!(
                        job = %job.name,
                        build = number,
                        error = %e,
                        "escalation failed"
                    );
                }
            }
        }
        report
    }

    async fn job(&self, name: &str, report: &mut RunReport) -> Option<JobFacts> {
        match self.source.job(name).await {
            Ok(job) => Some(job),
            Err(e) => {
                report.failed += 1;
                tracing::error!(job = name, error = %e, "failed to load job");
                None
            }
        }
    }

    /// Returns false for builds still running.
    async fn record_build(&self, job: &str, number: u64) -> Result<bool, RunError> {
        let build = self.source.build(job, number).await?;
        if build.in_progress {
            tracing::debug!(job, build = number, "still running, not recorded");
            return Ok(false);
        }
        let console = self.source.console(job, number).await?;
        self.store.put_console(job, number, &console)?;
        self.store.put_build(build)?;
        tracing::info!(job, build = number, "recorded build");
        Ok(true)
    }

    async fn escalate_build(
        &self,
        job: &JobFacts,
        number: u64,
        report: &mut RunReport,
    ) -> Result<(), RunError> {
        let build = self.load_build(&job.name, number).await?;
        if build.in_progress {
            report.skipped += 1;
            tracing::debug!(job = %job.name, build = number, "still running, skipped");
            return Ok(());
        }
        let console = self.load_console(&job.name, number).await?;
        let scan = self.scanner.scan_text(&console);
        let prior = self.store.get_escalation(&job.name)?;
        report.evaluated += 1;

        let store = self.store.as_ref();
        let decided =
            self.policy.decide(job, &build, &scan, prior.as_ref(), store, self.directory.as_ref());
        let decision = match decided {
            Ok(decision) => decision,
            Err(PolicyError::Lookup(e)) => {
                tracing::warn!(
                    job = %job.name,
                    build = number,
                    error = %e,
                    "directory lookup failed, falling back to build monitor"
                );
                self.policy.monitor_fallback(job, &build, &scan, prior.as_ref(), store, &e)?
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(action) = &decision.suppressed {
            report.suppressed += 1;
            tracing::debug!(
                job = %job.name,
                build = number,
                %action,
                "repeat notification suppressed"
            );
            return Ok(());
        }
        let Some(message) = &decision.message else {
            tracing::info!(job = %job.name, build = number, fault = %scan.fault_kind, "no action");
            return Ok(());
        };

        tracing::info!(
            job = %job.name,
            build = number,
            action = %decision.action,
            fault = %scan.fault_kind,
            target = ?message.to,
            "notifying"
        );
        self.notifier.send(message).await?;
        report.notified += 1;

        if self.dry_run {
            return Ok(());
        }
        if let Some(escalation) = decision.escalation {
            self.store.put_escalation(escalation)?;
        }
        Ok(())
    }

    /// Live facts from the source; the recorded copy when the source has
    /// dropped the build.
    async fn load_build(&self, job: &str, number: u64) -> Result<BuildFacts, RunError> {
        match self.source.build(job, number).await {
            Ok(build) => Ok(build),
            Err(SourceError::NotFound(what)) => match self.store.get_build(job, number)? {
                Some(build) => Ok(build),
                None => Err(SourceError::NotFound(what).into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn load_console(&self, job: &str, number: u64) -> Result<String, RunError> {
        if let Some(console) = self.store.get_console(job, number)? {
            return Ok(console);
        }
        match self.source.console(job, number).await {
            Ok(console) => Ok(console),
            Err(SourceError::NotFound(_)) => {
                tracing::warn!(job, build = number, "no console log, scanning nothing");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
