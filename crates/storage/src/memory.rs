// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store for tests

use crate::state::StoreState;
use crate::{Store, StoreError};
use kv_core::{BuildFacts, EscalationState};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    state: StoreState,
    consoles: BTreeMap<(String, u64), String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    /// Copy of everything stored so far.
    pub fn state(&self) -> StoreState {
        self.inner.lock().state.clone()
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> Result<T, StoreError> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(std::io::Error::other("store is read-only").into());
        }
        Ok(f(&mut inner))
    }
}

impl Store for MemoryStore {
    fn get_escalation(&self, job: &str) -> Result<Option<EscalationState>, StoreError> {
        Ok(self.inner.lock().state.escalations.get(job).cloned())
    }

    fn put_escalation(&self, state: EscalationState) -> Result<(), StoreError> {
        self.write(|m| m.state.upsert_escalation(state))
    }

    fn escalations(&self) -> Result<Vec<EscalationState>, StoreError> {
        Ok(self.inner.lock().state.escalations.values().cloned().collect())
    }

    fn get_build(&self, job: &str, number: u64) -> Result<Option<BuildFacts>, StoreError> {
        Ok(self.inner.lock().state.build(job, number).cloned())
    }

    fn put_build(&self, build: BuildFacts) -> Result<(), StoreError> {
        self.write(|m| m.state.insert_build(build))
    }

    fn builds(&self, job: &str) -> Result<Vec<BuildFacts>, StoreError> {
        Ok(self.inner.lock().state.builds_of(job).cloned().collect())
    }

    fn put_console(&self, job: &str, number: u64, text: &str) -> Result<(), StoreError> {
        self.write(|m| m.consoles.insert((job.to_string(), number), text.to_string()))?;
        Ok(())
    }

    fn get_console(&self, job: &str, number: u64) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().consoles.get(&(job.to_string(), number)).cloned())
    }
}
