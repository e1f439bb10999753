// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory form of everything the store persists

use kv_core::{BuildFacts, EscalationState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    /// job name → build number → facts
    #[serde(default)]
    pub builds: BTreeMap<String, BTreeMap<u64, BuildFacts>>,
    /// job name → last escalation
    #[serde(default)]
    pub escalations: BTreeMap<String, EscalationState>,
}

impl StoreState {
    pub fn build(&self, job: &str, number: u64) -> Option<&BuildFacts> {
        self.builds.get(job).and_then(|builds| builds.get(&number))
    }

    pub fn builds_of(&self, job: &str) -> impl Iterator<Item = &BuildFacts> {
        self.builds.get(job).into_iter().flat_map(|builds| builds.values())
    }

    pub fn insert_build(&mut self, build: BuildFacts) {
        self.builds.entry(build.job.clone()).or_default().insert(build.number, build);
    }

    pub fn upsert_escalation(&mut self, state: EscalationState) {
        self.escalations.insert(state.job.clone(), state);
    }

    pub fn build_count(&self) -> usize {
        self.builds.values().map(BTreeMap::len).sum()
    }
}
