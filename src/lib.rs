//! VersaLog - multi-format console logger with date-stamped file persistence
//!
//! ```no_run
//! use versalog::{Config, Logger};
//!
//! let logger = Logger::new(Config::new("detailed").with_persist(true))?;
//! logger.info("ok");
//! logger.tagged("Request").error("failed");
//! # Ok::<(), versalog::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use logging::{Logger, Mode, Severity};
