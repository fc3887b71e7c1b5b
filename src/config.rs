//! Configuration management for VersaLog
//!
//! `Config` is the raw, user-facing option set (deserializable from TOML).
//! `Settings` is what a logger runs with: the `enable_all` preset expanded and
//! every field validated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::logging::retention::DEFAULT_RETENTION_DAYS;
use crate::logging::{Mode, NotificationMethod, Severity, SeveritySet};

/// Logger options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Display mode: "plain", "timestamped", "file" or "detailed" (default)
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Default tag, shown when `show_tag` is set and the call has no tag of its own
    #[serde(default)]
    pub tag: Option<String>,

    /// Show the `file:line` of the logging call
    #[serde(default)]
    pub show_caller: bool,

    /// Fall back to the default tag when a call has none
    #[serde(default)]
    pub show_tag: bool,

    /// Shorthand for show_caller, show_tag, notify and persist
    #[serde(default)]
    pub enable_all: bool,

    /// Notify on ERROR and CRITICAL
    #[serde(default)]
    pub notify: bool,

    /// Write records to date-named files in `log_dir`
    #[serde(default)]
    pub persist: bool,

    /// Levels to persist (default: all five when persisting)
    #[serde(default)]
    pub persisted_levels: Option<Vec<String>>,

    /// Do not print to standard output
    #[serde(default)]
    pub silent: bool,

    /// Log unhandled panics at CRITICAL before the process dies
    #[serde(default)]
    pub capture_panics: bool,

    /// Directory for log files, `~` is expanded (default: ./log)
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Log files at least this many days old are deleted (default: 7)
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// Notification method: "bell" (terminal bell), "title" (terminal title), "none"
    #[serde(default)]
    pub notification_method: NotificationMethod,

    /// Application name passed to notifications
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_mode() -> String {
    Mode::Detailed.as_str().to_string()
}

fn default_log_dir() -> String {
    "log".to_string()
}

fn default_retention_days() -> u64 {
    DEFAULT_RETENTION_DAYS
}

fn default_app_name() -> String {
    "VersaLog".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            tag: None,
            show_caller: false,
            show_tag: false,
            enable_all: false,
            notify: false,
            persist: false,
            persisted_levels: None,
            silent: false,
            capture_panics: false,
            log_dir: default_log_dir(),
            retention_days: default_retention_days(),
            notification_method: NotificationMethod::default(),
            app_name: default_app_name(),
        }
    }
}

impl Config {
    /// Default options with the given display mode
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_show_caller(mut self, show: bool) -> Self {
        self.show_caller = show;
        self
    }

    pub fn with_show_tag(mut self, show: bool) -> Self {
        self.show_tag = show;
        self
    }

    pub fn with_enable_all(mut self, enable: bool) -> Self {
        self.enable_all = enable;
        self
    }

    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Restrict persistence to the named levels
    pub fn with_persisted_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.persisted_levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_capture_panics(mut self, capture: bool) -> Self {
        self.capture_panics = capture;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<String>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_retention_days(mut self, days: u64) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_notification_method(mut self, method: NotificationMethod) -> Self {
        self.notification_method = method;
        self
    }

    /// Apply the `enable_all` preset
    ///
    /// Returns the options with show_caller, show_tag, notify and persist
    /// forced on when `enable_all` is set, otherwise unchanged.
    pub fn expanded(&self) -> Self {
        let mut config = self.clone();
        if config.enable_all {
            config.show_caller = true;
            config.show_tag = true;
            config.notify = true;
            config.persist = true;
        }
        config
    }

    /// Expand presets and check every option
    pub fn validate(&self) -> Result<Settings, Error> {
        let config = self.expanded();

        let mode = config
            .mode
            .parse::<Mode>()
            .map_err(|mode| Error::InvalidMode { mode })?;

        let persisted = match &config.persisted_levels {
            None => SeveritySet::all(),
            Some(levels) if levels.is_empty() => return Err(Error::EmptyPersistedLevels),
            Some(levels) => levels
                .iter()
                .map(|level| {
                    level.parse::<Severity>().map_err(|_| Error::UnknownLevel {
                        level: level.clone(),
                    })
                })
                .collect::<Result<SeveritySet, Error>>()?,
        };

        if config.retention_days == 0 {
            return Err(Error::InvalidRetention);
        }

        Ok(Settings {
            mode,
            tag: config.tag,
            show_caller: config.show_caller,
            show_tag: config.show_tag,
            notify: config.notify,
            persist: config.persist,
            persisted,
            silent: config.silent,
            capture_panics: config.capture_panics,
            log_dir: expand_dir(&config.log_dir),
            retention_days: config.retention_days,
            notification_method: config.notification_method,
            app_name: config.app_name,
        })
    }
}

fn expand_dir(dir: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(dir).into_owned())
}

/// Validated, immutable logger settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    pub tag: Option<String>,
    pub show_caller: bool,
    pub show_tag: bool,
    pub notify: bool,
    pub persist: bool,
    pub persisted: SeveritySet,
    pub silent: bool,
    pub capture_panics: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub notification_method: NotificationMethod,
    pub app_name: String,
}

impl Settings {
    /// Whether records of this severity go to the log file
    pub fn should_persist(&self, severity: Severity) -> bool {
        self.persist && self.persisted.contains(severity)
    }

    /// Whether calls need their location resolved
    pub fn wants_caller(&self) -> bool {
        self.show_caller || self.mode.forces_caller()
    }

    /// Resolve the tag for one call
    ///
    /// An explicit tag wins; the default tag is used only when `show_tag` is set.
    pub fn effective_tag<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or_else(|| {
            if self.show_tag {
                self.tag.as_deref()
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let settings = Config::default().validate().unwrap();
        assert_eq!(settings.mode, Mode::Detailed);
        assert!(!settings.persist);
        assert_eq!(settings.log_dir, PathBuf::from("log"));
        assert_eq!(settings.retention_days, 7);
        assert_eq!(settings.persisted, SeveritySet::all());
    }

    #[test]
    fn test_invalid_mode() {
        let err = Config::new("bogus").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidMode { ref mode } if mode == "bogus"));
    }

    #[test]
    fn test_with_mode() {
        let err = Config::default().with_mode("bogus").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidMode { ref mode } if mode == "bogus"));

        let settings = Config::default().with_mode("file").validate().unwrap();
        assert_eq!(settings.mode, Mode::File);
    }

    #[test]
    fn test_mode_is_case_insensitive() {
        let settings = Config::new("Plain").validate().unwrap();
        assert_eq!(settings.mode, Mode::Plain);
    }

    #[test]
    fn test_empty_persisted_levels() {
        let err = Config::new("plain")
            .with_persist(true)
            .with_persisted_levels(Vec::<String>::new())
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPersistedLevels));
    }

    #[test]
    fn test_unknown_persisted_level() {
        let err = Config::new("plain")
            .with_persist(true)
            .with_persisted_levels(["ERROR", "NOPE"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLevel { ref level } if level == "NOPE"));
    }

    #[test]
    fn test_persisted_levels_checked_even_when_not_persisting() {
        let result = Config::new("plain")
            .with_persisted_levels(["NOPE"])
            .validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_retention() {
        let err = Config::default()
            .with_retention_days(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRetention));
    }

    #[test]
    fn test_enable_all_expansion() {
        let config = Config::new("plain").with_enable_all(true);
        let expanded = config.expanded();
        assert!(expanded.show_caller);
        assert!(expanded.show_tag);
        assert!(expanded.notify);
        assert!(expanded.persist);
        assert!(!expanded.silent);

        // Expansion leaves the original untouched
        assert!(!config.show_caller);
    }

    #[test]
    fn test_should_persist() {
        let settings = Config::new("plain")
            .with_persist(true)
            .with_persisted_levels(["ERROR"])
            .validate()
            .unwrap();
        assert!(settings.should_persist(Severity::Error));
        assert!(!settings.should_persist(Severity::Info));
        assert!(!settings.should_persist(Severity::Critical));

        let off = Config::new("plain").validate().unwrap();
        assert!(!off.should_persist(Severity::Error));
    }

    #[test]
    fn test_effective_tag() {
        let settings = Config::new("plain")
            .with_tag("Request")
            .with_show_tag(true)
            .validate()
            .unwrap();
        assert_eq!(settings.effective_tag(None), Some("Request"));
        assert_eq!(settings.effective_tag(Some("db")), Some("db"));

        let hidden = Config::new("plain").with_tag("Request").validate().unwrap();
        assert_eq!(hidden.effective_tag(None), None);
        assert_eq!(hidden.effective_tag(Some("db")), Some("db"));
    }

    #[test]
    fn test_wants_caller() {
        assert!(Config::new("file").validate().unwrap().wants_caller());
        assert!(!Config::new("plain").validate().unwrap().wants_caller());
        assert!(Config::new("plain")
            .with_show_caller(true)
            .validate()
            .unwrap()
            .wants_caller());
    }

    #[test]
    fn test_log_dir_tilde_expansion() {
        let settings = Config::default()
            .with_log_dir("~/versalog-logs")
            .validate()
            .unwrap();
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                settings.log_dir,
                PathBuf::from(home).join("versalog-logs")
            );
        }
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml_str(
            r#"
            mode = "timestamped"
            tag = "Request"
            show_tag = true
            persist = true
            persisted_levels = ["ERROR", "CRITICAL"]
            notification_method = "none"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, "timestamped");
        assert_eq!(config.tag.as_deref(), Some("Request"));
        assert_eq!(config.log_dir, "log");
        assert_eq!(config.notification_method, NotificationMethod::None);

        let settings = config.validate().unwrap();
        assert!(settings.should_persist(Severity::Critical));
        assert!(!settings.should_persist(Severity::Warning));
    }

    #[test]
    fn test_persisted_levels_must_be_array() {
        assert!(Config::from_toml_str("persisted_levels = \"ERROR\"").is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::new("file").with_persist(true);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(Config::load(&temp_dir.path().join("missing.toml")).is_err());
    }
}
