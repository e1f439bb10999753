// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kv-adapters: Build source, org directory and notification transports

pub mod directory;
pub mod notify;
pub mod source;

pub use directory::{Directory, DirectoryError, OrgChart, Team};
pub use notify::{render_message, CommandNotifier, Notifier, NotifyError, PrintNotifier};
pub use source::{BuildSource, DirSource, SourceError};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use source::FakeSource;
