//! Background persistence of log records
//!
//! Logging calls never touch the filesystem. They push records onto an
//! unbounded FIFO channel drained by one dedicated thread, which appends each
//! line to `<log_dir>/<YYYY-MM-DD>.log` and runs the retention sweep at most
//! once per calendar day.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local, NaiveDate};

use super::retention::cleanup_old_logs_with_retention;
use super::severity::Severity;
use crate::config::Settings;

/// One rendered line waiting to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Plain-text line, no trailing newline
    pub line: String,
    pub severity: Severity,
    /// When the logging call was made
    pub created_at: DateTime<Local>,
}

/// Work items for the writer thread
#[derive(Debug)]
pub(crate) enum Job {
    Record(LogRecord),
    /// Acknowledged once every job queued before it has been handled
    Flush(Sender<()>),
    Stop,
}

/// Receives the worker's own cleanup messages
pub(crate) trait CleanupReporter: Send {
    fn report(&self, severity: Severity, message: &str);
}

/// Path of the log file for a calendar date
pub fn log_file_path(logs_dir: &Path, date: NaiveDate) -> PathBuf {
    logs_dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Append one line to the date file, creating the directory if needed
///
/// The file is opened and closed per call; nothing is buffered between lines.
pub fn append_line(logs_dir: &Path, date: NaiveDate, line: &str) -> io::Result<()> {
    fs::create_dir_all(logs_dir)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(logs_dir, date))?;

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())?;
    file.flush()
}

/// Tracks the last day a cleanup pass ran
#[derive(Debug, Default)]
pub(crate) struct CleanupSchedule {
    last_run: Option<NaiveDate>,
}

impl CleanupSchedule {
    pub(crate) fn is_due(&self, today: NaiveDate) -> bool {
        self.last_run != Some(today)
    }

    pub(crate) fn mark(&mut self, today: NaiveDate) {
        self.last_run = Some(today);
    }
}

/// State owned by the writer thread
pub(crate) struct PersistenceWorker<R> {
    settings: Arc<Settings>,
    schedule: CleanupSchedule,
    reporter: R,
    sweeps: usize,
}

impl<R: CleanupReporter> PersistenceWorker<R> {
    pub(crate) fn new(settings: Arc<Settings>, reporter: R) -> Self {
        Self {
            settings,
            schedule: CleanupSchedule::default(),
            reporter,
            sweeps: 0,
        }
    }

    /// Number of cleanup passes run so far
    #[cfg(test)]
    pub(crate) fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Write one record and run the daily cleanup if it is due
    pub(crate) fn persist(&mut self, record: &LogRecord) -> io::Result<()> {
        if !self.settings.should_persist(record.severity) {
            return Ok(());
        }

        let today = record.created_at.date_naive();
        append_line(&self.settings.log_dir, today, &record.line)?;

        if self.schedule.is_due(today) {
            self.sweep(record.created_at);
            self.schedule.mark(today);
        }

        Ok(())
    }

    fn sweep(&mut self, now: DateTime<Local>) {
        self.sweeps += 1;
        let logs_dir = &self.settings.log_dir;
        tracing::debug!(
            "Running log cleanup #{} in {}",
            self.sweeps,
            logs_dir.display()
        );

        let report =
            match cleanup_old_logs_with_retention(logs_dir, self.settings.retention_days, now) {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!("Log cleanup failed: {:#}", e);
                    return;
                }
            };

        if self.settings.silent {
            return;
        }

        for path in &report.removed {
            self.reporter.report(
                Severity::Info,
                &format!("[LOG CLEANUP] removed: {}", path.display()),
            );
        }
        for (path, e) in &report.failed {
            self.reporter.report(
                Severity::Warning,
                &format!(
                    "[LOG CLEANUP WARNING] {} cannot be removed: {}",
                    path.display(),
                    e
                ),
            );
        }
    }

    /// Drain the queue until a stop job arrives or every sender is gone
    pub(crate) fn run(mut self, rx: Receiver<Job>) {
        tracing::debug!("Log writer started");

        while let Ok(job) = rx.recv() {
            match job {
                Job::Record(record) => {
                    if let Err(e) = self.persist(&record) {
                        tracing::warn!(
                            "Failed to write log file in {}: {}",
                            self.settings.log_dir.display(),
                            e
                        );
                    }
                }
                Job::Flush(ack) => {
                    // The flusher may have given up waiting
                    let _ = ack.send(());
                }
                Job::Stop => break,
            }
        }

        tracing::debug!("Log writer stopped");
    }
}

/// Start the writer thread
pub(crate) fn spawn_worker<R>(
    worker: PersistenceWorker<R>,
    rx: Receiver<Job>,
) -> io::Result<JoinHandle<()>>
where
    R: CleanupReporter + 'static,
{
    thread::Builder::new()
        .name("versalog-writer".to_string())
        .spawn(move || worker.run(rx))
}
