// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering escalation decisions into notifications.

use crate::policy::{Action, FailingSince, MonitorReason};
use kv_core::{format_duration_ms, BuildFacts, Notification};
use kv_scanner::ScanResult;

/// Builds the subject and body for one decision.
pub struct MessageBuilder<'a> {
    build: &'a BuildFacts,
    scan: &'a ScanResult,
    action: &'a Action,
    since: Option<FailingSince>,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(build: &'a BuildFacts, scan: &'a ScanResult, action: &'a Action) -> Self {
        Self { build, scan, action, since: None }
    }

    pub fn failing_since(mut self, since: FailingSince) -> Self {
        self.since = Some(since);
        self
    }

    pub fn build(self, to: Vec<String>, cc: Vec<String>) -> Notification {
        let mut message = Notification::new(to, self.subject(), self.body());
        message.cc = cc;
        message
    }

    pub fn subject(&self) -> String {
        format!("[kvetch] {}: {}", self.build.display_name(), self.headline())
    }

    fn headline(&self) -> String {
        match self.action {
            Action::None => "no action".to_string(),
            Action::NotifyRecovery { .. } => "fixed".to_string(),
            Action::NotifyBuildMonitor { reason } => match reason {
                MonitorReason::SystemFault => "infrastructure failure".to_string(),
                MonitorReason::SystemFaultClaimedBy(_) => {
                    "infrastructure failure, check claim".to_string()
                }
                MonitorReason::SystemClaimMismatch => "system claim looks wrong".to_string(),
                MonitorReason::ClaimMissing => "still failing, unclaimed".to_string(),
                MonitorReason::NoAuthors => "failed with no changes".to_string(),
                MonitorReason::DirectoryLookupFailed(_) => "claimant unreachable".to_string(),
            },
            Action::NotifyClaimant { .. } => "still failing".to_string(),
            Action::NotifyClaimantWithManagerCc { .. } => match self.since {
                Some(since) => {
                    format!("still failing after {}", format_duration_ms(since.elapsed_ms))
                }
                None => "still failing".to_string(),
            },
            Action::NotifyDevelopers { .. } => "failed".to_string(),
        }
    }

    fn opening(&self) -> String {
        let name = self.build.display_name();
        match self.action {
            Action::None => String::new(),
            Action::NotifyRecovery { .. } => format!("{name} is passing again."),
            Action::NotifyBuildMonitor { reason } => match reason {
                MonitorReason::SystemFault => format!(
                    "{name} failed because of an infrastructure problem and needs a claim."
                ),
                MonitorReason::SystemFaultClaimedBy(who) => format!(
                    "{name} failed because of an infrastructure problem but is claimed by \
                     {who}. Please verify the claim or re-route it."
                ),
                MonitorReason::SystemClaimMismatch => format!(
                    "{name} is claimed as an infrastructure failure, but its log points at \
                     the code. Please verify the claim."
                ),
                MonitorReason::ClaimMissing => match self.since {
                    Some(since) => format!(
                        "{name} has been failing since #{} and nobody has claimed it.",
                        since.first_failure
                    ),
                    None => format!("{name} is still failing and nobody has claimed it."),
                },
                MonitorReason::NoAuthors => {
                    format!("{name} failed and has no change-set to attribute it to.")
                }
                MonitorReason::DirectoryLookupFailed(error) => format!(
                    "{name} is claimed, but the claimant could not be reached ({error}). \
                     Please follow up."
                ),
            },
            Action::NotifyClaimant { .. } => format!("{name} is still failing and you claimed it."),
            Action::NotifyClaimantWithManagerCc { .. } => format!(
                "{name} is still failing and you claimed it. Your manager is copied because \
                 the failure is more than a day old."
            ),
            Action::NotifyDevelopers { .. } => format!(
                "{name} failed after your changes. Please take a look and claim it."
            ),
        }
    }

    fn body(&self) -> String {
        let build = self.build;
        let mut parts = vec![self.opening(), String::new()];

        if !build.url.is_empty() {
            parts.push(format!("Build:    {}", build.url));
        }
        if let Some(result) = &build.result {
            parts.push(format!("Result:   {result}"));
        }
        parts.push(format!("Duration: {}", format_duration_ms(build.duration_ms)));
        match &build.claim {
            Some(claim) => match &claim.reason {
                Some(reason) if !reason.is_empty() => {
                    parts.push(format!("Claimed:  {} ({})", claim.claimed_by, reason))
                }
                _ => parts.push(format!("Claimed:  {}", claim.claimed_by)),
            },
            None => parts.push("Claimed:  no".to_string()),
        }
        if let Some(since) = self.since {
            parts.push(format!(
                "Failing:  since #{} ({})",
                since.first_failure,
                format_duration_ms(since.elapsed_ms)
            ));
            parts.push(format!("Fault:    {}", self.scan.fault_kind));
        }

        if !build.change_set.is_empty() {
            parts.push(String::new());
            parts.push("Changes:".to_string());
            for change in &build.change_set {
                let comment = change.comment.lines().next().unwrap_or_default();
                let line = format!("  {} {} {}", change.commit_id, change.author_email, comment);
                parts.push(line.trim_end().to_string());
            }
        }

        if !matches!(self.action, Action::NotifyRecovery { .. }) {
            parts.push(String::new());
            parts.push(self.scan.summary.clone());
        }

        parts.join("\n")
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
