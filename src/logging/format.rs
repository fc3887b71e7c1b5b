//! Line rendering
//!
//! Turns a log call into the colored console line and the plain line that is
//! written to disk. Rendering is pure: the timestamp and caller are resolved by
//! the caller and passed in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use super::severity::{Severity, RESET};

/// Display layout of rendered lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `<symbol> <msg>`
    Plain,
    /// `[<time>] <symbol> <msg>`
    Timestamped,
    /// `[<caller>][<SEVERITY>] <msg>`, caller always shown
    File,
    /// `[<time>][<SEVERITY>][<tag>][<caller>] : <msg>`
    Detailed,
}

impl Mode {
    /// Get the config name for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Plain => "plain",
            Mode::Timestamped => "timestamped",
            Mode::File => "file",
            Mode::Detailed => "detailed",
        }
    }

    /// Whether the layout always carries the caller location
    pub fn forces_caller(&self) -> bool {
        matches!(self, Mode::File)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "simple" => Ok(Mode::Plain),
            "timestamped" | "simple2" => Ok(Mode::Timestamped),
            "file" => Ok(Mode::File),
            "detailed" => Ok(Mode::Detailed),
            other => Err(other.to_string()),
        }
    }
}

/// Format a moment as `YYYY-MM-DD HH:MM:SS`
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Everything that goes into one rendered line
#[derive(Debug, Clone, Copy)]
pub struct LineParts<'a> {
    pub mode: Mode,
    pub severity: Severity,
    pub message: &'a str,
    /// Effective tag after per-call and default resolution
    pub tag: Option<&'a str>,
    pub show_caller: bool,
    /// `file:line` of the call site, if it was resolved
    pub caller: Option<&'a str>,
    /// Pre-formatted timestamp, ignored by modes that do not show one
    pub time: &'a str,
}

/// A rendered log line in both forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Line for standard output, severity region wrapped in ANSI color
    pub console: String,
    /// Line for the log file, no escape sequences
    pub plain: String,
}

/// Render a log call
pub fn render(parts: &LineParts<'_>) -> Rendered {
    let severity = parts.severity;
    let color = severity.color();
    let caller = parts.caller.unwrap_or("");
    let tag = parts.tag.unwrap_or("");
    let msg = parts.message;

    match parts.mode {
        Mode::Plain => {
            let symbol = severity.symbol();
            if parts.show_caller {
                Rendered {
                    console: format!("[{caller}][{tag}]{color}{symbol}{RESET} {msg}"),
                    plain: format!("[{caller}][{tag}]{symbol} {msg}"),
                }
            } else {
                Rendered {
                    console: format!("{color}{symbol}{RESET} {msg}"),
                    plain: format!("{symbol} {msg}"),
                }
            }
        }
        Mode::Timestamped => {
            let symbol = severity.symbol();
            let time = parts.time;
            if parts.show_caller {
                Rendered {
                    console: format!(
                        "[{time}] [{caller}][{tag}] {color}{symbol}{RESET} {msg}"
                    ),
                    plain: format!("[{time}] [{caller}][{tag}] {symbol} {msg}"),
                }
            } else {
                Rendered {
                    console: format!("[{time}] {color}{symbol}{RESET} {msg}"),
                    plain: format!("[{time}] {symbol} {msg}"),
                }
            }
        }
        Mode::File => {
            let name = severity.as_str();
            Rendered {
                console: format!("[{caller}]{color}[{name}]{RESET} {msg}"),
                plain: format!("[{caller}][{name}] {msg}"),
            }
        }
        Mode::Detailed => {
            let name = severity.as_str();
            let time = parts.time;
            let mut console = format!("[{time}]{color}[{name}]{RESET}");
            let mut plain = format!("[{time}][{name}]");

            let mut suffix = String::new();
            if let Some(tag) = parts.tag {
                suffix.push_str(&format!("[{tag}]"));
            }
            if parts.show_caller {
                suffix.push_str(&format!("[{caller}]"));
            }
            suffix.push_str(&format!(" : {msg}"));

            console.push_str(&suffix);
            plain.push_str(&suffix);
            Rendered { console, plain }
        }
    }
}
