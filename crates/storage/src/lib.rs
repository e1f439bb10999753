// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kv-storage: Recorded builds, console logs and escalation records

mod error;
mod file;
#[cfg(any(test, feature = "test-support"))]
mod memory;
mod migration;
mod snapshot;
mod state;
mod store;

pub use error::StoreError;
pub use file::FileStore;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{Snapshot, CURRENT_SNAPSHOT_VERSION};
pub use state::StoreState;
pub use store::Store;
