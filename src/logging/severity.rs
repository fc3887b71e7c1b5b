//! Log severities
//!
//! The closed set of severities a logger call can carry, with their display
//! symbol and console color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ANSI sequence that ends a colored region
pub const RESET: &str = "\x1b[0m";

/// Severity of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Error,
    Warning,
    Debug,
    Critical,
}

impl Severity {
    /// Every severity, in declaration order
    pub const ALL: [Severity; 5] = [
        Severity::Info,
        Severity::Error,
        Severity::Warning,
        Severity::Debug,
        Severity::Critical,
    ];

    /// Get the upper-case name for this severity
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Debug => "DEBUG",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Short bracketed symbol used by the plain and timestamped modes
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "[+]",
            Severity::Error => "[-]",
            Severity::Warning => "[!]",
            Severity::Debug => "[D]",
            Severity::Critical => "[C]",
        }
    }

    /// ANSI color sequence for console output
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Info => "\x1b[32m",
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Debug => "\x1b[36m",
            Severity::Critical => "\x1b[35m",
        }
    }

    /// Check if this severity triggers a notification
    pub fn is_alert(&self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }

    /// Position in [`Severity::ALL`]
    pub(crate) fn index(&self) -> usize {
        match self {
            Severity::Info => 0,
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Debug => 3,
            Severity::Critical => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name matches none of the five severities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// A subset of the five severities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeveritySet {
    members: [bool; 5],
}

impl SeveritySet {
    /// Set containing every severity
    pub fn all() -> Self {
        Self { members: [true; 5] }
    }

    /// Set containing nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a severity to the set
    pub fn insert(&mut self, severity: Severity) {
        self.members[severity.index()] = true;
    }

    /// Check membership
    pub fn contains(&self, severity: Severity) -> bool {
        self.members[severity.index()]
    }

    /// Check if the set has no members
    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|m| *m)
    }

    /// Iterate the members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Severity> + '_ {
        Severity::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

impl FromIterator<Severity> for SeveritySet {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        let mut set = Self::empty();
        for severity in iter {
            set.insert(severity);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(Severity::Info.symbol(), "[+]");
        assert_eq!(Severity::Error.symbol(), "[-]");
        assert_eq!(Severity::Warning.symbol(), "[!]");
        assert_eq!(Severity::Debug.symbol(), "[D]");
        assert_eq!(Severity::Critical.symbol(), "[C]");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" Critical ".parse::<Severity>(), Ok(Severity::Critical));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "NOPE".parse::<Severity>(),
            Err(UnknownSeverity("NOPE".to_string()))
        );
        assert!("WARN".parse::<Severity>().is_err());
    }

    #[test]
    fn test_unknown_severity_message() {
        let err = "NOPE".parse::<Severity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown severity `NOPE`");
    }

    #[test]
    fn test_is_alert() {
        assert!(!Severity::Info.is_alert());
        assert!(!Severity::Warning.is_alert());
        assert!(!Severity::Debug.is_alert());
        assert!(Severity::Error.is_alert());
        assert!(Severity::Critical.is_alert());
    }

    #[test]
    fn test_severity_set() {
        let set: SeveritySet = [Severity::Error, Severity::Critical].into_iter().collect();
        assert!(set.contains(Severity::Error));
        assert!(set.contains(Severity::Critical));
        assert!(!set.contains(Severity::Info));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Severity::Error, Severity::Critical]
        );

        assert!(SeveritySet::empty().is_empty());
        assert_eq!(SeveritySet::all().iter().count(), 5);
    }
}
