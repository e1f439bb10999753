// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kv-engine: Escalation policy, message rendering and batch runner

pub mod config;
mod message;
pub mod policy;
mod runner;
mod selector;

pub use config::{
    Config, ConfigError, DirectoryConfig, EscalationConfig, NotifyConfig, ScannerConfig,
};
pub use message::MessageBuilder;
pub use policy::{Action, Decision, EscalationPolicy, FailingSince, MonitorReason, PolicyError};
pub use runner::{resolve_jobs, RunError, RunReport, Runner};
pub use selector::{BuildSelector, SelectorError};
