// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kv-core: Shared build, failure and escalation types for kvetch

pub mod macros;

pub mod build;
pub mod clock;
pub mod escalation;
pub mod fault;
pub mod job;
pub mod notification;
pub mod phase;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(any(test, feature = "test-support"))]
pub use build::BuildFactsBuilder;
pub use build::{full_display_name, BuildFacts, BuildResult, ChangeSetEntry, Claim, FactsError};
pub use clock::{Clock, FakeClock, SystemClock};
pub use escalation::EscalationState;
pub use fault::FaultKind;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobFactsBuilder;
pub use job::JobFacts;
pub use notification::Notification;
pub use phase::BuildPhase;
pub use time_fmt::{format_duration_ms, format_elapsed_ms};
