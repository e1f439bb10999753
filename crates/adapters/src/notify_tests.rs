// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn message() -> Notification {
    Notification::new(
        vec!["bob@x.com".to_string()],
        "[kvetch] acme » widget #42: build failed",
        "Build failed.",
    )
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn render_message_headers() {
    let text = render_message("kvetch@example.com", &message().cc("carol@x.com"));
    assert_eq!(
        text,
        "From: kvetch@example.com\n\
         To: bob@x.com\n\
         Cc: carol@x.com\n\
         Subject: [kvetch] acme » widget #42: build failed\n\
         \n\
         Build failed.\n"
    );
}

#[test]
fn render_message_without_sender_or_cc() {
    let text = render_message("", &message());
    assert!(text.starts_with("To: bob@x.com\nSubject: "));
    assert!(!text.contains("Cc:"));
}

#[tokio::test]
async fn print_notifier_writes_the_message() {
    let buf = SharedBuf::default();
    let notifier = PrintNotifier::with_writer("kvetch@example.com", Box::new(buf.clone()));
    notifier.send(&message()).await.unwrap();
    notifier.send(&message()).await.unwrap();

    let printed = String::from_utf8(buf.0.lock().clone()).unwrap();
    assert_eq!(printed.matches("To: bob@x.com").count(), 2);
    assert!(printed.contains("Build failed.\n\nFrom:"));
}

#[tokio::test]
async fn command_notifier_pipes_message_to_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mail.txt");
    let notifier = CommandNotifier::new(
        "kvetch@example.com",
        vec!["sh".into(), "-c".into(), format!("cat > {}", out.display())],
    );
    notifier.send(&message()).await.unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, render_message("kvetch@example.com", &message()));
}

#[tokio::test]
async fn command_notifier_reports_non_zero_exit() {
    let notifier = CommandNotifier::new(
        "",
        vec!["sh".into(), "-c".into(), "cat >/dev/null; echo relay denied >&2; exit 3".into()],
    );
    let err = notifier.send(&message()).await.unwrap_err();
    match err {
        NotifyError::SendFailed(msg) => assert!(msg.contains("relay denied"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn command_notifier_reports_missing_program() {
    let notifier = CommandNotifier::new("", vec!["/nonexistent/kvetch-sendmail".into()]);
    let err = notifier.send(&message()).await.unwrap_err();
    assert!(matches!(err, NotifyError::Spawn { .. }));
}

#[tokio::test]
async fn command_notifier_requires_a_command() {
    let err = CommandNotifier::new("", Vec::new()).send(&message()).await.unwrap_err();
    assert!(matches!(err, NotifyError::SendFailed(_)));
}

#[tokio::test]
async fn command_notifier_times_out() {
    let notifier = CommandNotifier::new("", vec!["sleep".into(), "5".into()])
        .timeout(Duration::from_millis(50));
    let err = notifier.send(&message()).await.unwrap_err();
    assert!(err.to_string().contains("timed out"), "{err}");
}

#[tokio::test]
async fn fake_notifier_records_and_fails_on_demand() {
    let fake = FakeNotifier::new();
    fake.send(&message()).await.unwrap();
    fake.set_failing(true);
    assert!(fake.send(&message()).await.is_err());
    fake.set_failing(false);

    let boxed: Box<dyn Notifier> = Box::new(fake.clone());
    boxed.send(&message()).await.unwrap();
    assert_eq!(fake.sent().len(), 2);
}
