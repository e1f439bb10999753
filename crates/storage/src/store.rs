// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::StoreError;
use kv_core::{BuildFacts, EscalationState};

/// Persistent memory of recorded builds and sent escalations.
///
/// Implementations serialize all writes, so one escalation record per job
/// is only ever written by one caller at a time.
pub trait Store: Send + Sync {
    fn get_escalation(&self, job: &str) -> Result<Option<EscalationState>, StoreError>;

    /// Insert or replace the record for `state.job`.
    fn put_escalation(&self, state: EscalationState) -> Result<(), StoreError>;

    /// All escalation records, ordered by job name.
    fn escalations(&self) -> Result<Vec<EscalationState>, StoreError>;

    fn get_build(&self, job: &str, number: u64) -> Result<Option<BuildFacts>, StoreError>;

    fn put_build(&self, build: BuildFacts) -> Result<(), StoreError>;

    fn has_build(&self, job: &str, number: u64) -> Result<bool, StoreError> {
        Ok(self.get_build(job, number)?.is_some())
    }

    /// Recorded builds of one job, oldest first.
    fn builds(&self, job: &str) -> Result<Vec<BuildFacts>, StoreError>;

    fn put_console(&self, job: &str, number: u64, text: &str) -> Result<(), StoreError>;

    fn get_console(&self, job: &str, number: u64) -> Result<Option<String>, StoreError>;
}
