//! Logging of unhandled panics
//!
//! The hook writes synchronously, straight to the console and the date file.
//! It must not rely on the writer thread, which may already be gone.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, Location};
use std::sync::Arc;

use chrono::Local;

use super::file_writer::append_line;
use super::logger::{announce, print_console, render_call};
use super::notifier::Notifier;
use super::severity::Severity;
use crate::config::Settings;

/// Chain a CRITICAL-logging hook in front of the current panic hook
pub(crate) fn install(settings: Arc<Settings>, notifier: Arc<dyn Notifier>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let place = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("<unnamed>");

        let message = format!(
            "Unhandled panic:\nthread '{}' panicked at {}: {}\n{}",
            name,
            place,
            payload_text(info.payload()),
            Backtrace::force_capture()
        );

        write_critical(&settings, &*notifier, &message, info.location());
        previous(info);
    }));
}

/// Log `message` at CRITICAL without going through the queue
pub(crate) fn write_critical(
    settings: &Settings,
    notifier: &dyn Notifier,
    message: &str,
    location: Option<&Location<'_>>,
) {
    let created_at = Local::now();

    announce(notifier, settings, Severity::Critical, message);

    let rendered = render_call(
        settings,
        Severity::Critical,
        message,
        None,
        location,
        &created_at,
    );

    if !settings.silent {
        print_console(&rendered.console);
    }

    if settings.should_persist(Severity::Critical) {
        if let Err(e) = append_line(&settings.log_dir, created_at.date_naive(), &rendered.plain) {
            tracing::warn!("Failed to write panic report: {}", e);
        }
    }
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logging::file_writer::log_file_path;
    use crate::logging::NoopNotifier;
    use tempfile::TempDir;

    fn settings(dir: &std::path::Path) -> Settings {
        Config::new("file")
            .with_log_dir(dir.to_string_lossy().into_owned())
            .with_persist(true)
            .with_silent(true)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_payload_text() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(payload_text(boxed.as_ref()), "boom");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(payload_text(boxed.as_ref()), "bang");

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(payload_text(boxed.as_ref()), "Box<dyn Any>");
    }

    #[test]
    fn test_write_critical_appends_directly() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(temp_dir.path());

        write_critical(&settings, &NoopNotifier, "fatal", Some(Location::caller()));

        let path = log_file_path(temp_dir.path(), Local::now().date_naive());
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("[panic_hook.rs:"));
        assert!(content.ends_with("[CRITICAL] fatal\n"));
    }

    #[test]
    fn test_write_critical_respects_persisted_levels() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = settings(temp_dir.path());
        settings.persisted = [Severity::Error].into_iter().collect();

        write_critical(&settings, &NoopNotifier, "fatal", None);

        assert!(!log_file_path(temp_dir.path(), Local::now().date_naive()).exists());
    }

    #[test]
    fn test_installed_hook_logs_panics_from_any_thread() {
        let temp_dir = TempDir::new().unwrap();
        install(Arc::new(settings(temp_dir.path())), Arc::new(NoopNotifier));

        let result = std::thread::Builder::new()
            .name("doomed".to_string())
            .spawn(|| panic!("worker exploded"))
            .unwrap()
            .join();
        assert!(result.is_err());

        let path = log_file_path(temp_dir.path(), Local::now().date_naive());
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("[CRITICAL] Unhandled panic:"));
        assert!(content.contains("thread 'doomed' panicked at"));
        assert!(content.contains("worker exploded"));

        // Put the default hook back so later panics in this binary skip the temp dir
        drop(panic::take_hook());
    }
}
