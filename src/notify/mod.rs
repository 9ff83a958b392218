// ABOUTME: Best-effort progress and result notifications.
// ABOUTME: Text log through Output plus an optional chat sink chosen once at construction.

mod slack;

pub use slack::SlackWebhook;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;

/// How a chat message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Good,
    Danger,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("chat request failed: {0}")]
    Request(String),

    #[error("chat endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Destination for short chat messages.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send(&self, severity: Severity, message: &str) -> Result<(), NotifyError>;
}

/// Reports progress. Never fails and never influences the caller's outcome.
pub struct Notifier {
    output: Output,
    sink: Option<Box<dyn ChatSink>>,
    diagnostics: Mutex<Diagnostics>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("output", &self.output)
            .field("chat", &self.sink.is_some())
            .finish()
    }
}

impl Notifier {
    pub fn new(output: Output, sink: Option<Box<dyn ChatSink>>) -> Self {
        Self {
            output,
            sink,
            diagnostics: Mutex::new(Diagnostics::default()),
        }
    }

    /// Text log only; chat calls do nothing.
    pub fn without_chat(output: Output) -> Self {
        Self::new(output, None)
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn chat_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Write a progress line to the text log.
    pub fn log(&self, message: &str) {
        self.output.progress(message.trim_end());
    }

    /// Send a chat message if a sink is configured. Failures become warnings.
    pub async fn chat(&self, severity: Severity, message: &str) {
        let Some(sink) = &self.sink else {
            return;
        };

        if let Err(e) = sink.send(severity, message.trim_end()).await {
            tracing::warn!(error = %e, "chat notification failed");
            self.diagnostics
                .lock()
                .warn(Warning::chat_delivery(format!("chat notification failed: {}", e)));
        }
    }

    /// Log and chat the same message.
    pub async fn notify(&self, severity: Severity, message: &str) {
        self.log(message);
        self.chat(severity, message).await;
    }

    /// Record a warning unrelated to delivery, e.g. from settings resolution.
    pub fn warn(&self, warning: Warning) {
        self.diagnostics.lock().warn(warning);
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> Vec<Warning> {
        self.diagnostics.lock().warnings().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use crate::output::OutputMode;
    use std::sync::Arc;

    struct Recording(Arc<Mutex<Vec<(Severity, String)>>>);

    #[async_trait]
    impl ChatSink for Recording {
        async fn send(&self, severity: Severity, message: &str) -> Result<(), NotifyError> {
            self.0.lock().push((severity, message.to_string()));
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl ChatSink for Broken {
        async fn send(&self, _: Severity, _: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Status {
                status: 500,
                body: "oops".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn chat_without_sink_is_noop() {
        let notifier = Notifier::without_chat(Output::new(OutputMode::Quiet));
        notifier.notify(Severity::Good, "done").await;
        assert!(!notifier.chat_enabled());
        assert!(notifier.warnings().is_empty());
    }

    #[tokio::test]
    async fn chat_trims_trailing_newline() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = Notifier::new(
            Output::new(OutputMode::Quiet),
            Some(Box::new(Recording(sent.clone()))),
        );

        notifier.chat(Severity::Normal, "rollback: revision 7 -> 5\n").await;

        assert_eq!(
            *sent.lock(),
            vec![(Severity::Normal, "rollback: revision 7 -> 5".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_delivery_becomes_warning() {
        let notifier = Notifier::new(Output::new(OutputMode::Quiet), Some(Box::new(Broken)));

        notifier.chat(Severity::Danger, "failed").await;

        let warnings = notifier.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ChatDelivery);
        assert!(warnings[0].message.contains("500"));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_delivery_is_logged() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let notifier = Notifier::new(Output::new(OutputMode::Quiet), Some(Box::new(Broken)));
        notifier.chat(Severity::Danger, "failed").await;

        let logged = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("chat notification failed"), "{logged}");
        assert!(logged.contains("500"), "{logged}");
    }
}
