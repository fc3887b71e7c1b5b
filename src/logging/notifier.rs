//! Alert notifications for ERROR and CRITICAL calls
//!
//! Notification is best effort. The logger discards every error a notifier
//! returns, so implementations are free to fail.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Content of one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice<'a> {
    pub title: String,
    pub message: &'a str,
    pub app_name: &'a str,
}

/// Sink for alert notifications
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    fn notify(&self, notice: &Notice<'_>) -> Result<()>;
}

/// Notifier that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: &Notice<'_>) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self, _notice: &Notice<'_>) -> Result<()> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Puts the notice into the terminal title (OSC 0) on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleNotifier;

impl Notifier for TitleNotifier {
    fn notify(&self, notice: &Notice<'_>) -> Result<()> {
        let mut stderr = std::io::stderr().lock();
        write!(
            stderr,
            "\x1b]0;{}: {} - {}\x07",
            notice.app_name,
            notice.title,
            sanitize_title(notice.message)
        )?;
        stderr.flush()?;
        Ok(())
    }
}

/// Strip control characters that would terminate or corrupt an OSC sequence
fn sanitize_title(message: &str) -> String {
    message
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// How alerts are surfaced, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    #[default]
    Bell,
    Title,
    None,
}

impl NotificationMethod {
    /// Build the notifier for this method
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        match self {
            NotificationMethod::Bell => Arc::new(BellNotifier),
            NotificationMethod::Title => Arc::new(TitleNotifier),
            NotificationMethod::None => Arc::new(NoopNotifier),
        }
    }
}
