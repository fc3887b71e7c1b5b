//! The logger facade
//!
//! Each call is rendered and printed on the calling thread, then handed to the
//! writer thread as a [`LogRecord`]. Nothing here blocks on the filesystem.

use std::io::Write;
use std::panic::Location;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;

use chrono::{DateTime, Local};

use super::caller;
use super::file_writer::{spawn_worker, CleanupReporter, Job, LogRecord, PersistenceWorker};
use super::format::{render, timestamp, LineParts, Rendered};
use super::notifier::{Notice, Notifier};
use super::panic_hook;
use super::severity::Severity;
use crate::config::{Config, Settings};
use crate::error::{Error, Result};

/// Render one call under the given settings
pub(crate) fn render_call(
    settings: &Settings,
    severity: Severity,
    message: &str,
    tag: Option<&str>,
    location: Option<&Location<'_>>,
    at: &DateTime<Local>,
) -> Rendered {
    let caller = if settings.wants_caller() {
        location.and_then(caller::describe)
    } else {
        None
    };
    let time = timestamp(at);

    render(&LineParts {
        mode: settings.mode,
        severity,
        message,
        tag: settings.effective_tag(tag),
        show_caller: settings.show_caller,
        caller: caller.as_deref(),
        time: &time,
    })
}

/// Fire a notification for alert severities, discarding any failure
pub(crate) fn announce(
    notifier: &dyn Notifier,
    settings: &Settings,
    severity: Severity,
    message: &str,
) {
    if !settings.notify || !severity.is_alert() {
        return;
    }

    let notice = Notice {
        title: format!("{} Log notice", severity.as_str()),
        message,
        app_name: &settings.app_name,
    };
    let _ = notifier.notify(&notice);
}

/// Write a line to standard output, ignoring a closed or broken stream
pub(crate) fn print_console(line: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", line);
}

/// State shared by the facade and the writer thread's cleanup reports
pub(crate) struct Dispatcher {
    settings: Arc<Settings>,
    notifier: Arc<dyn Notifier>,
    sender: Sender<Job>,
}

impl Dispatcher {
    pub(crate) fn dispatch(
        &self,
        severity: Severity,
        message: &str,
        tag: Option<&str>,
        location: &Location<'_>,
    ) {
        let settings = &*self.settings;
        let created_at = Local::now();

        announce(&*self.notifier, settings, severity, message);

        let rendered = render_call(settings, severity, message, tag, Some(location), &created_at);

        if !settings.silent {
            print_console(&rendered.console);
        }

        // Fails only once the writer has stopped
        let _ = self.sender.send(Job::Record(LogRecord {
            line: rendered.plain,
            severity,
            created_at,
        }));
    }
}

/// Routes the writer's cleanup messages back through the facade
struct FacadeReporter(Weak<Dispatcher>);

impl CleanupReporter for FacadeReporter {
    fn report(&self, severity: Severity, message: &str) {
        if let Some(dispatcher) = self.0.upgrade() {
            dispatcher.dispatch(severity, message, None, Location::caller());
        }
    }
}

/// Console and file logger
///
/// Construct once and share behind an `Arc` if several threads log. Dropping
/// the logger drains the queue and stops the writer thread.
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    worker: Option<JoinHandle<()>>,
}

impl Logger {
    /// Validate `config` and start the writer thread
    ///
    /// The notifier is chosen from `config.notification_method`.
    pub fn new(config: Config) -> Result<Self> {
        let settings = config.validate()?;
        let notifier = settings.notification_method.notifier();
        Self::start(settings, notifier)
    }

    /// Like [`Logger::new`], with a caller-supplied notifier
    pub fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let settings = config.validate()?;
        Self::start(settings, notifier)
    }

    fn start(settings: Settings, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let settings = Arc::new(settings);
        let (sender, receiver) = mpsc::channel();

        let dispatcher = Arc::new(Dispatcher {
            settings: Arc::clone(&settings),
            notifier: Arc::clone(&notifier),
            sender,
        });

        let worker = PersistenceWorker::new(
            Arc::clone(&settings),
            FacadeReporter(Arc::downgrade(&dispatcher)),
        );
        let handle = spawn_worker(worker, receiver).map_err(Error::WorkerSpawn)?;

        if settings.capture_panics {
            panic_hook::install(Arc::clone(&settings), notifier);
        }

        Ok(Self {
            dispatcher,
            worker: Some(handle),
        })
    }

    /// The validated settings this logger runs with
    pub fn settings(&self) -> &Settings {
        &self.dispatcher.settings
    }

    /// Log `message` at `severity`, with an optional tag override
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl AsRef<str>, tag: Option<&str>) {
        self.dispatcher
            .dispatch(severity, message.as_ref(), tag, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Severity::Info, message, None);
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Severity::Error, message, None);
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Severity::Warning, message, None);
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Severity::Debug, message, None);
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(Severity::Critical, message, None);
    }

    /// View of this logger whose calls carry `tag`
    pub fn tagged<'a>(&'a self, tag: &'a str) -> Tagged<'a> {
        Tagged { logger: self, tag }
    }

    /// Block until every record logged before this call has been handled
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.dispatcher.sender.send(Job::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    /// Drain the queue and stop the writer thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        let _ = self.dispatcher.sender.send(Job::Stop);
        if handle.join().is_err() {
            tracing::warn!("Log writer thread panicked");
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Logger calls with a fixed per-call tag
#[derive(Clone, Copy)]
pub struct Tagged<'a> {
    logger: &'a Logger,
    tag: &'a str,
}

impl Tagged<'_> {
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.logger.log(Severity::Info, message, Some(self.tag));
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.logger.log(Severity::Error, message, Some(self.tag));
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.logger.log(Severity::Warning, message, Some(self.tag));
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.logger.log(Severity::Debug, message, Some(self.tag));
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.logger.log(Severity::Critical, message, Some(self.tag));
    }
}
