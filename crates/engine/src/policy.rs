// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Escalation policy: who to tell about a build, and whether to tell them
//! again.
//!
//! For a successful build the only possible action is a recovery notice,
//! sent when the build directly follows the last failure and an escalation
//! is open. For a failed build the target is chosen from the fault kind,
//! the claim, the age of the failure streak and the change-set, in that
//! order. A notification identical in build and target to the open
//! escalation is suppressed while it is younger than the throttle window.

use crate::config::EscalationConfig;
use crate::message::MessageBuilder;
use kv_adapters::{Directory, DirectoryError};
use kv_core::{
    BuildFacts, BuildResult, Clock, EscalationState, FactsError, JobFacts, Notification,
    SystemClock,
};
use kv_scanner::ScanResult;
use kv_storage::{Store, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("{0} is still in progress")]
    InProgress(String),
    #[error("{0} completed without a result")]
    MissingResult(String),
    #[error("directory lookup failed: {0}")]
    Lookup(#[from] DirectoryError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<FactsError> for PolicyError {
    fn from(err: FactsError) -> Self {
        match err {
            FactsError::InProgress(name) => Self::InProgress(name),
            FactsError::MissingResult(name) => Self::MissingResult(name),
        }
    }
}

/// Why the build monitor is being asked to step in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorReason {
    /// Infrastructure failure nobody has claimed yet
    SystemFault,
    /// Infrastructure failure claimed by a person instead of the system claimant
    SystemFaultClaimedBy(String),
    /// Claimed by the system claimant, but the log points at code
    SystemClaimMismatch,
    /// Still failing after the first build and nobody claimed it
    ClaimMissing,
    /// First failure with nobody in the change-set to blame
    NoAuthors,
    /// The claimant or their manager could not be resolved
    DirectoryLookupFailed(String),
}

kv_core::simple_display! {
    MonitorReason {
        SystemFault => "system_fault",
        SystemFaultClaimedBy(..) => "system_fault_claimed",
        SystemClaimMismatch => "system_claim_mismatch",
        ClaimMissing => "claim_missing",
        NoAuthors => "no_authors",
        DirectoryLookupFailed(..) => "directory_lookup_failed",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    NotifyRecovery { target: String },
    NotifyBuildMonitor { reason: MonitorReason },
    NotifyClaimant { target: String },
    NotifyClaimantWithManagerCc { target: String, cc: String },
    NotifyDevelopers { targets: Vec<String> },
}

kv_core::simple_display! {
    Action {
        None => "none",
        NotifyRecovery { .. } => "notify_recovery",
        NotifyBuildMonitor { .. } => "notify_build_monitor",
        NotifyClaimant { .. } => "notify_claimant",
        NotifyClaimantWithManagerCc { .. } => "notify_claimant_with_manager_cc",
        NotifyDevelopers { .. } => "notify_developers",
    }
}

impl Action {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Identity recorded in the escalation state for this action.
    pub fn target(&self, build_monitor: &str) -> Option<String> {
        match self {
            Self::None => None,
            Self::NotifyRecovery { target }
            | Self::NotifyClaimant { target }
            | Self::NotifyClaimantWithManagerCc { target, .. } => Some(target.clone()),
            Self::NotifyBuildMonitor { .. } => Some(build_monitor.to_string()),
            Self::NotifyDevelopers { targets } => Some(targets.join(",")),
        }
    }

    /// `(to, cc)` addresses.
    pub fn recipients(&self, build_monitor: &str) -> (Vec<String>, Vec<String>) {
        let split = |target: &str| -> Vec<String> {
            target.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect()
        };
        match self {
            Self::None => (Vec::new(), Vec::new()),
            Self::NotifyRecovery { target } => {
                let to = split(target);
                if to.is_empty() {
                    (vec![build_monitor.to_string()], Vec::new())
                } else {
                    (to, Vec::new())
                }
            }
            Self::NotifyBuildMonitor { .. } => (vec![build_monitor.to_string()], Vec::new()),
            Self::NotifyClaimant { target } => (vec![target.clone()], Vec::new()),
            Self::NotifyClaimantWithManagerCc { target, cc } => {
                (vec![target.clone()], vec![cc.clone()])
            }
            Self::NotifyDevelopers { targets } => (targets.clone(), Vec::new()),
        }
    }
}

/// Start of the current failure streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailingSince {
    pub first_failure: u64,
    pub elapsed_ms: u64,
}

/// Outcome of evaluating one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// Record to persist once the message has gone out
    pub escalation: Option<EscalationState>,
    pub message: Option<Notification>,
    /// The action that would have been taken, when throttled
    pub suppressed: Option<Action>,
}

impl Decision {
    pub fn none() -> Self {
        Self { action: Action::None, escalation: None, message: None, suppressed: None }
    }

    fn suppressed(action: Action) -> Self {
        Self { suppressed: Some(action), ..Self::none() }
    }
}

pub struct EscalationPolicy<C: Clock = SystemClock> {
    config: EscalationConfig,
    clock: C,
}

impl<C: Clock> EscalationPolicy<C> {
    pub fn new(config: EscalationConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    /// Decide what to do about `build`.
    ///
    /// `store` is only read, to find when the failure streak started.
    /// Directory failures come back as [`PolicyError::Lookup`] rather than
    /// silently dropping the claimant or the manager copy.
    pub fn decide(
        &self,
        job: &JobFacts,
        build: &BuildFacts,
        scan: &ScanResult,
        prior: Option<&EscalationState>,
        store: &dyn Store,
        directory: &dyn Directory,
    ) -> Result<Decision, PolicyError> {
        let now = self.clock.epoch_ms();
        match build.validate()? {
            BuildResult::Success => Ok(self.recovery(job, build, scan, prior, now)),
            BuildResult::Failure => {
                let since = self.failing_since(job, build, store, now)?;
                let action = self.attribute(build, scan, since, directory)?;
                Ok(self.notify(build, scan, prior, action, since, now))
            }
            other => {
                tracing::debug!(
                    job = %build.job,
                    build = build.number,
                    result = %other,
                    "no policy for result"
                );
                Ok(Decision::none())
            }
        }
    }

    /// Hand a failure to the build monitor after a directory lookup failed.
    pub fn monitor_fallback(
        &self,
        job: &JobFacts,
        build: &BuildFacts,
        scan: &ScanResult,
        prior: Option<&EscalationState>,
        store: &dyn Store,
        error: &DirectoryError,
    ) -> Result<Decision, PolicyError> {
        let now = self.clock.epoch_ms();
        let since = self.failing_since(job, build, store, now)?;
        let reason = MonitorReason::DirectoryLookupFailed(error.to_string());
        Ok(self.notify(build, scan, prior, Action::NotifyBuildMonitor { reason }, since, now))
    }

    fn recovery(
        &self,
        job: &JobFacts,
        build: &BuildFacts,
        scan: &ScanResult,
        prior: Option<&EscalationState>,
        now: u64,
    ) -> Decision {
        if !job.is_recovery(build.number) {
            return Decision::none();
        }
        let Some(prior) = prior.filter(|p| p.is_active()) else {
            return Decision::none();
        };
        let action = Action::NotifyRecovery { target: prior.target.clone() };
        let message = self.render(build, scan, &action, None);
        Decision {
            action,
            escalation: Some(EscalationState::cleared(build.job.clone(), now)),
            message: Some(message),
            suppressed: None,
        }
    }

    /// When the streak containing `build` began, falling back to the build's
    /// own start when the first failure is not recorded.
    fn failing_since(
        &self,
        job: &JobFacts,
        build: &BuildFacts,
        store: &dyn Store,
        now: u64,
    ) -> Result<FailingSince, PolicyError> {
        let first_failure = job.first_failure();
        let started_ms = if first_failure >= build.number {
            build.timestamp_ms
        } else {
            match store.get_build(&build.job, first_failure)? {
                Some(first) => first.timestamp_ms,
                None => {
                    tracing::debug!(
                        job = %build.job,
                        first_failure,
                        "first failing build not recorded, timing from current build"
                    );
                    build.timestamp_ms
                }
            }
        };
        Ok(FailingSince { first_failure, elapsed_ms: now.saturating_sub(started_ms) })
    }

    fn attribute(
        &self,
        build: &BuildFacts,
        scan: &ScanResult,
        since: FailingSince,
        directory: &dyn Directory,
    ) -> Result<Action, PolicyError> {
        let system = self.config.system_claimant.as_str();
        let monitor = |reason| Action::NotifyBuildMonitor { reason };

        if scan.fault_kind.is_system() {
            return Ok(match &build.claim {
                Some(claim) if !claim.is_by(system) => {
                    monitor(MonitorReason::SystemFaultClaimedBy(claim.claimed_by.clone()))
                }
                _ => monitor(MonitorReason::SystemFault),
            });
        }

        match &build.claim {
            Some(claim) if claim.is_by(system) => Ok(monitor(MonitorReason::SystemClaimMismatch)),
            Some(claim) => {
                let who = claim.claimed_by.as_str();
                let target = directory.contact_of(who)?;
                let cc_after_ms = self.config.manager_cc_after().as_millis();
                if u128::from(since.elapsed_ms) > cc_after_ms {
                    let manager = directory.manager_of(who)?;
                    let cc = directory.contact_of(&manager)?;
                    Ok(Action::NotifyClaimantWithManagerCc { target, cc })
                } else {
                    Ok(Action::NotifyClaimant { target })
                }
            }
            None if since.first_failure < build.number => Ok(monitor(MonitorReason::ClaimMissing)),
            None => {
                let targets = build.authors();
                if targets.is_empty() {
                    Ok(monitor(MonitorReason::NoAuthors))
                } else {
                    Ok(Action::NotifyDevelopers { targets })
                }
            }
        }
    }

    fn notify(
        &self,
        build: &BuildFacts,
        scan: &ScanResult,
        prior: Option<&EscalationState>,
        action: Action,
        since: FailingSince,
        now: u64,
    ) -> Decision {
        let Some(target) = action.target(&self.config.build_monitor) else {
            return Decision::none();
        };

        let throttle_ms = self.config.throttle().as_millis();
        let repeat = prior.is_some_and(|p| {
            p.is_active()
                && p.refers_to(build.number)
                && p.target == target
                && u128::from(p.age_ms(now)) < throttle_ms
        });
        if repeat {
            return Decision::suppressed(action);
        }

        let message = self.render(build, scan, &action, Some(since));
        Decision {
            escalation: Some(EscalationState::notified(
                build.job.clone(),
                build.number,
                target,
                now,
            )),
            message: Some(message),
            action,
            suppressed: None,
        }
    }

    fn render(
        &self,
        build: &BuildFacts,
        scan: &ScanResult,
        action: &Action,
        since: Option<FailingSince>,
    ) -> Notification {
        let (to, cc) = action.recipients(&self.config.build_monitor);
        let mut builder = MessageBuilder::new(build, scan, action);
        if let Some(since) = since {
            builder = builder.failing_since(since);
        }
        builder.build(to, cc)
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
