// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use kv_core::Notification;
use parking_lot::Mutex;
use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Transport for outgoing notifications.
///
/// Failures are reported to the caller, never retried here.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Notification) -> Result<(), NotifyError>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Box<N> {
    async fn send(&self, message: &Notification) -> Result<(), NotifyError> {
        (**self).send(message).await
    }
}

/// Render a notification as an RFC 822 style message.
pub fn render_message(from: &str, message: &Notification) -> String {
    let mut out = String::new();
    if !from.is_empty() {
        out.push_str(&format!("From: {from}\n"));
    }
    out.push_str(&format!("To: {}\n", message.to.join(", ")));
    if !message.cc.is_empty() {
        out.push_str(&format!("Cc: {}\n", message.cc.join(", ")));
    }
    out.push_str(&format!("Subject: {}\n\n", message.subject));
    out.push_str(&message.body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Dry-run transport: writes the rendered message instead of sending it.
#[derive(Clone)]
pub struct PrintNotifier {
    from: String,
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl PrintNotifier {
    /// Print to stdout.
    pub fn new(from: impl Into<String>) -> Self {
        Self::with_writer(from, Box::new(std::io::stdout()))
    }

    pub fn with_writer(from: impl Into<String>, out: Box<dyn Write + Send>) -> Self {
        Self { from: from.into(), out: Arc::new(Mutex::new(out)) }
    }
}

#[async_trait]
impl Notifier for PrintNotifier {
    async fn send(&self, message: &Notification) -> Result<(), NotifyError> {
        let text = render_message(&self.from, message);
        let mut out = self.out.lock();
        writeln!(out, "{text}")
            .and_then(|()| out.flush())
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }
}

/// Pipes the rendered message into an external command such as `sendmail -t`.
#[derive(Clone, Debug)]
pub struct CommandNotifier {
    from: String,
    command: Vec<String>,
    timeout: Duration,
}

impl CommandNotifier {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(from: impl Into<String>, command: Vec<String>) -> Self {
        Self { from: from.into(), command, timeout: Self::DEFAULT_TIMEOUT }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, program: &str, args: &[String], text: &str) -> Result<(), NotifyError> {
        let spawn_err = |source| NotifyError::Spawn { program: program.to_string(), source };
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(spawn_err)?;
        }

        let output = child.wait_with_output().await.map_err(spawn_err)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::SendFailed(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn send(&self, message: &Notification) -> Result<(), NotifyError> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(NotifyError::SendFailed("no notify command configured".into()));
        };
        let text = render_message(&self.from, message);
        tracing::info!(%program, subject = %message.subject, "sending notification");
        match tokio::time::timeout(self.timeout, self.run(program, args, &text)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::SendFailed(format!(
                "{program} timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Notifier, NotifyError};
    use async_trait::async_trait;
    use kv_core::Notification;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeNotifyState {
        sent: Vec<Notification>,
        failing: bool,
    }

    /// Fake notifier for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifier {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// All notifications accepted so far
        pub fn sent(&self) -> Vec<Notification> {
            self.inner.lock().sent.clone()
        }

        /// Reject every send until switched off again
        pub fn set_failing(&self, failing: bool) {
            self.inner.lock().failing = failing;
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(&self, message: &Notification) -> Result<(), NotifyError> {
            let mut inner = self.inner.lock();
            if inner.failing {
                return Err(NotifyError::SendFailed("fake transport is down".into()));
            }
            inner.sent.push(message.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifier;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
