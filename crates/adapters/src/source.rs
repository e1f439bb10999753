// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where build facts and console transcripts come from.

use async_trait::async_trait;
use kv_core::{BuildFacts, JobFacts};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view of the build system.
#[async_trait]
pub trait BuildSource: Send + Sync {
    async fn job(&self, name: &str) -> Result<JobFacts, SourceError>;

    /// Job names listed in a view.
    async fn jobs_in_view(&self, view: &str) -> Result<Vec<String>, SourceError>;

    async fn build(&self, job: &str, number: u64) -> Result<BuildFacts, SourceError>;

    async fn console(&self, job: &str, number: u64) -> Result<String, SourceError>;
}

/// Build source reading an exported directory tree:
///
/// ```text
/// <root>/<job>/job.json
/// <root>/<job>/builds/<n>.json
/// <root>/<job>/builds/<n>.log
/// <root>/views/<view>.json      {"jobs": [...]}
/// ```
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

#[derive(Deserialize)]
struct View {
    #[serde(default)]
    jobs: Vec<String>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn job_dir(&self, job: &str) -> Result<PathBuf, SourceError> {
        let mut dir = self.root.clone();
        for part in Path::new(job).components() {
            match part {
                Component::Normal(name) => dir.push(name),
                _ => return Err(SourceError::NotFound(format!("job {job}"))),
            }
        }
        Ok(dir)
    }

    async fn read(
        &self,
        path: &Path,
        what: impl FnOnce() -> String,
    ) -> Result<String, SourceError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(what()))
            }
            Err(source) => Err(SourceError::Io { path: path.to_path_buf(), source }),
        }
    }

    /// Parse JSON, filling `defaults` for fields the export left out.
    async fn read_json<T: DeserializeOwned>(
        &self,
        path: &Path,
        what: impl FnOnce() -> String,
        defaults: &[(&str, Value)],
    ) -> Result<T, SourceError> {
        let text = self.read(path, what).await?;
        let json_err = |source| SourceError::Json { path: path.to_path_buf(), source };
        let mut value: Value = serde_json::from_str(&text).map_err(json_err)?;
        if let Some(obj) = value.as_object_mut() {
            for (key, default) in defaults {
                obj.entry(*key).or_insert_with(|| default.clone());
            }
        }
        serde_json::from_value(value).map_err(json_err)
    }

    /// Build numbers present under `builds/`, newest first.
    async fn listed_builds(&self, dir: &Path) -> Result<Vec<u64>, SourceError> {
        let builds = dir.join("builds");
        let mut entries = match tokio::fs::read_dir(&builds).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(SourceError::Io { path: builds, source }),
        };
        let mut numbers: Vec<u64> = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        if let Some(n) =
                            path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse().ok())
                        {
                            numbers.push(n);
                        }
                    }
                }
                Ok(None) => break,
                Err(source) => return Err(SourceError::Io { path: builds, source }),
            }
        }
        numbers.sort_unstable_by(|a, b| b.cmp(a));
        Ok(numbers)
    }
}

#[async_trait]
impl BuildSource for DirSource {
    async fn job(&self, name: &str) -> Result<JobFacts, SourceError> {
        let dir = self.job_dir(name)?;
        let mut facts: JobFacts = self
            .read_json(&dir.join("job.json"), || format!("job {name}"), &[("name", name.into())])
            .await?;
        if facts.builds.is_empty() {
            facts.builds = self.listed_builds(&dir).await?;
        }
        if facts.last_build.is_none() {
            facts.last_build = facts.builds.iter().copied().max();
        }
        Ok(facts)
    }

    async fn jobs_in_view(&self, view: &str) -> Result<Vec<String>, SourceError> {
        let mut parts = Path::new(view).components();
        if !matches!((parts.next(), parts.next()), (Some(Component::Normal(_)), None)) {
            return Err(SourceError::NotFound(format!("view {view}")));
        }
        let path = self.root.join("views").join(format!("{view}.json"));
        let parsed: View = self.read_json(&path, || format!("view {view}"), &[]).await?;
        Ok(parsed.jobs)
    }

    async fn build(&self, job: &str, number: u64) -> Result<BuildFacts, SourceError> {
        let path = self.job_dir(job)?.join("builds").join(format!("{number}.json"));
        self.read_json(
            &path,
            || kv_core::full_display_name(job, number),
            &[("job", job.into()), ("number", number.into())],
        )
        .await
    }

    async fn console(&self, job: &str, number: u64) -> Result<String, SourceError> {
        let path = self.job_dir(job)?.join("builds").join(format!("{number}.log"));
        self.read(&path, || format!("console of {}", kv_core::full_display_name(job, number)))
            .await
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BuildSource, SourceError};
    use async_trait::async_trait;
    use kv_core::{BuildFacts, JobFacts};
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeSourceState {
        jobs: BTreeMap<String, JobFacts>,
        views: BTreeMap<String, Vec<String>>,
        builds: BTreeMap<(String, u64), BuildFacts>,
        consoles: BTreeMap<(String, u64), String>,
        console_reads: usize,
    }

    /// In-memory build source for testing
    #[derive(Clone, Default)]
    pub struct FakeSource {
        inner: Arc<Mutex<FakeSourceState>>,
    }

    impl FakeSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_job(&self, job: JobFacts) {
            self.inner.lock().jobs.insert(job.name.clone(), job);
        }

        pub fn add_view(&self, view: &str, jobs: &[&str]) {
            let jobs = jobs.iter().map(|j| j.to_string()).collect();
            self.inner.lock().views.insert(view.to_string(), jobs);
        }

        pub fn add_build(&self, build: BuildFacts, console: &str) {
            let key = (build.job.clone(), build.number);
            let mut inner = self.inner.lock();
            inner.consoles.insert(key.clone(), console.to_string());
            inner.builds.insert(key, build);
        }

        /// Number of console fetches served so far
        pub fn console_reads(&self) -> usize {
            self.inner.lock().console_reads
        }
    }

    #[async_trait]
    impl BuildSource for FakeSource {
        async fn job(&self, name: &str) -> Result<JobFacts, SourceError> {
            let inner = self.inner.lock();
            inner
                .jobs
                .get(name)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(format!("job {name}")))
        }

        async fn jobs_in_view(&self, view: &str) -> Result<Vec<String>, SourceError> {
            let inner = self.inner.lock();
            inner
                .views
                .get(view)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(format!("view {view}")))
        }

        async fn build(&self, job: &str, number: u64) -> Result<BuildFacts, SourceError> {
            let inner = self.inner.lock();
            inner
                .builds
                .get(&(job.to_string(), number))
                .cloned()
                .ok_or_else(|| SourceError::NotFound(kv_core::full_display_name(job, number)))
        }

        async fn console(&self, job: &str, number: u64) -> Result<String, SourceError> {
            let mut inner = self.inner.lock();
            inner.console_reads += 1;
            inner
                .consoles
                .get(&(job.to_string(), number))
                .cloned()
                .ok_or_else(|| SourceError::NotFound(kv_core::full_display_name(job, number)))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSource;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
