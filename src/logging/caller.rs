//! Call site resolution
//!
//! Logging methods are `#[track_caller]`, so the location of the application
//! call is available without walking the stack.

use std::panic::Location;
use std::path::Path;

/// Render a call site as `<file name>:<line>`
///
/// Returns `None` when the recorded path has no file name component.
pub fn describe(location: &Location<'_>) -> Option<String> {
    let name = Path::new(location.file()).file_name()?.to_str()?;
    Some(format!("{}:{}", name, location.line()))
}
