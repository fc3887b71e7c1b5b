//! Logging system for VersaLog
//!
//! Renders log calls in one of four layouts, prints them to standard output
//! and persists selected severities to date-named files on a background
//! thread, pruning old files once a day.

pub mod caller;
mod file_writer;
pub mod format;
mod logger;
pub mod notifier;
mod panic_hook;
pub mod retention;
mod severity;

pub use file_writer::{append_line, log_file_path, LogRecord};
pub use format::{render, LineParts, Mode, Rendered};
pub use logger::{Logger, Tagged};
pub use notifier::{
    BellNotifier, NoopNotifier, Notice, NotificationMethod, Notifier, TitleNotifier,
};
pub use retention::{cleanup_old_logs, cleanup_old_logs_with_retention, CleanupReport};
pub use severity::{Severity, SeveritySet, UnknownSeverity, RESET};
