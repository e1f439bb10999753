// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-pass scan state and the summary it renders.

use crate::rule::{RuleAction, RuleTable};
use kv_core::{BuildPhase, FaultKind};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Summary text used when no phase recorded anything.
pub const NO_FAILURES: &str = "No known failures were detected";

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z\]")
        .expect("constant regex pattern is valid")
});

/// Failure lines collected while one phase was active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub phase: BuildPhase,
    /// Lines in transcript order
    pub lines: Vec<String>,
}

/// Outcome of scanning one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub summary: String,
    pub fault_kind: FaultKind,
    pub line_count: usize,
    /// Non-empty records in phase order
    pub records: Vec<FailureRecord>,
}

impl ScanResult {
    pub fn has_failures(&self) -> bool {
        !self.records.is_empty()
    }

    /// First `limit` lines of the summary; the whole summary when `limit` is 0.
    pub fn summary_head(&self, limit: usize) -> String {
        if limit == 0 {
            return self.summary.clone();
        }
        self.summary.lines().take(limit).collect::<Vec<_>>().join("\n")
    }

    /// Failure lines recorded for `phase`.
    pub fn lines_in(&self, phase: BuildPhase) -> &[String] {
        self.records.iter().find(|r| r.phase == phase).map_or(&[], |r| r.lines.as_slice())
    }
}

/// Scan state for one transcript.
///
/// Built fresh for every transcript and consumed by [`Scan::finish`], so
/// nothing carries over between scans.
pub struct Scan<'t> {
    table: &'t RuleTable,
    phase: BuildPhase,
    records: BTreeMap<BuildPhase, Vec<String>>,
    fault: FaultKind,
    line_count: usize,
}

impl<'t> Scan<'t> {
    pub fn new(table: &'t RuleTable) -> Self {
        Self {
            table,
            phase: BuildPhase::Prologue,
            records: BTreeMap::new(),
            fault: FaultKind::Unknown,
            line_count: 0,
        }
    }

    /// Process the next transcript line.
    pub fn feed(&mut self, line: &str) {
        self.line_count += 1;
        let message = strip_timestamp(line);

        match self.table.classify(message) {
            Some(RuleAction::Enter(next)) => {
                let advanced = self.phase.advance(next);
                if advanced != self.phase {
                    tracing::trace!(
                        from = %self.phase,
                        to = %advanced,
                        line = self.line_count,
                        "phase transition"
                    );
                }
                self.phase = advanced;
            }
            Some(RuleAction::Capture { prefix, fault }) => {
                self.fault = self.fault.escalate(fault);
                if self.table.is_system_signal(message) {
                    self.fault = FaultKind::System;
                }
                let text =
                    if prefix { format!("[ERROR] {}", message) } else { message.to_string() };
                self.records.entry(self.phase).or_default().push(text);
            }
            Some(RuleAction::Ignore) | None => {}
        }
    }

    /// Render the summary and fault verdict.
    pub fn finish(self) -> ScanResult {
        let records: Vec<FailureRecord> = self
            .records
            .into_iter()
            .filter(|(phase, lines)| phase.is_reported() && !lines.is_empty())
            .map(|(phase, lines)| FailureRecord { phase, lines })
            .collect();

        ScanResult {
            summary: render_summary(&records),
            fault_kind: self.fault,
            line_count: self.line_count,
            records,
        }
    }
}

/// Drop a leading `[YYYY-MM-DDTHH:MM:SS.mmmZ]` stamp and the whitespace after it.
///
/// Anything that is not exactly such a stamp is left in the message.
fn strip_timestamp(line: &str) -> &str {
    let rest = match TIMESTAMP.find(line) {
        Some(stamp) => &line[stamp.end()..],
        None => line,
    };
    rest.trim_start()
}

fn render_summary(records: &[FailureRecord]) -> String {
    if records.is_empty() {
        return NO_FAILURES.to_string();
    }
    records
        .iter()
        .map(|record| {
            let header = record.phase.to_string();
            let mut block = vec![header.clone(), "-".repeat(header.len())];
            block.extend(record.lines.iter().cloned());
            block.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
