// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kv-scanner: Turns raw build console transcripts into failure summaries
//!
//! A scan walks the transcript once, tracking which [`BuildPhase`] the build
//! is in and collecting lines that look like failures. The result is a
//! phase-grouped summary plus a single [`FaultKind`] verdict.
//!
//! [`BuildPhase`]: kv_core::BuildPhase
//! [`FaultKind`]: kv_core::FaultKind

mod error;
mod registry;
mod rule;
mod scan;
mod scanner;

pub use error::ScanError;
pub use registry::ScannerRegistry;
pub use rule::{ErrorRule, RuleAction, RuleTable, RuleTableConfig, TransitionRule};
pub use scan::{FailureRecord, Scan, ScanResult, NO_FAILURES};
pub use scanner::{scan_reader, LogScanner, ScanSession, TableScanner};
