// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store backed by a state directory.
//!
//! Layout:
//!
//! ```text
//! <root>/state.json                snapshot of builds and escalations
//! <root>/state.bak[.N]             previous snapshots
//! <root>/logs/<job>/<n>.log.zst    compressed console transcripts
//! ```

use crate::migration::MigrationRegistry;
use crate::snapshot::Snapshot;
use crate::state::StoreState;
use crate::{Store, StoreError};
use kv_core::{BuildFacts, EscalationState};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

const ZSTD_LEVEL: i32 = 3;

pub struct FileStore {
    root: PathBuf,
    inner: Mutex<Inner>,
}

struct Inner {
    seq: u64,
    state: StoreState,
}

impl FileStore {
    pub const SNAPSHOT: &'static str = "state.json";

    /// Open (or create) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with(root, &MigrationRegistry::new())
    }

    pub fn open_with(
        root: impl Into<PathBuf>,
        migrations: &MigrationRegistry,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let (seq, state) = match Snapshot::load(&root.join(Self::SNAPSHOT), migrations)? {
            Some(snapshot) => (snapshot.seq, snapshot.state),
            None => (0, StoreState::default()),
        };
        tracing::debug!(
            root = %root.display(),
            seq,
            builds = state.build_count(),
            escalations = state.escalations.len(),
            "opened store"
        );
        Ok(Self { root, inner: Mutex::new(Inner { seq, state }) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Apply `change` to a copy of the state and persist it; memory is only
    /// updated once the snapshot is on disk.
    fn mutate(&self, change: impl FnOnce(&mut StoreState)) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let mut next = inner.state.clone();
        change(&mut next);
        let snapshot = Snapshot::new(inner.seq + 1, next);
        snapshot.save(&self.root.join(Self::SNAPSHOT))?;
        inner.seq = snapshot.seq;
        inner.state = snapshot.state;
        Ok(())
    }

    fn console_path(&self, job: &str, number: u64) -> PathBuf {
        let mut path = self.root.join("logs");
        for part in Path::new(job).components() {
            match part {
                Component::Normal(name) => path.push(name),
                _ => path.push("_"),
            }
        }
        path.join(format!("{number}.log.zst"))
    }
}

impl Store for FileStore {
    fn get_escalation(&self, job: &str) -> Result<Option<EscalationState>, StoreError> {
        Ok(self.inner.lock().state.escalations.get(job).cloned())
    }

    fn put_escalation(&self, state: EscalationState) -> Result<(), StoreError> {
        tracing::debug!(
            job = %state.job,
            build = state.build,
            target = %state.target,
            "saving escalation"
        );
        self.mutate(|s| s.upsert_escalation(state))
    }

    fn escalations(&self) -> Result<Vec<EscalationState>, StoreError> {
        Ok(self.inner.lock().state.escalations.values().cloned().collect())
    }

    fn get_build(&self, job: &str, number: u64) -> Result<Option<BuildFacts>, StoreError> {
        Ok(self.inner.lock().state.build(job, number).cloned())
    }

    fn put_build(&self, build: BuildFacts) -> Result<(), StoreError> {
        self.mutate(|s| s.insert_build(build))
    }

    fn builds(&self, job: &str) -> Result<Vec<BuildFacts>, StoreError> {
        Ok(self.inner.lock().state.builds_of(job).cloned().collect())
    }

    fn put_console(&self, job: &str, number: u64, text: &str) -> Result<(), StoreError> {
        let path = self.console_path(job, number);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("tmp");
        let mut encoder = zstd::stream::Encoder::new(File::create(&tmp)?, ZSTD_LEVEL)?;
        encoder.write_all(text.as_bytes())?;
        encoder.finish()?.sync_all()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get_console(&self, job: &str, number: u64) -> Result<Option<String>, StoreError> {
        let file = match File::open(self.console_path(job, number)) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let bytes = zstd::stream::decode_all(file)?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
