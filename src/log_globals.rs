//! Global log stream instance.
//!
//! Any context may log; the log drain consumes.

use crate::logging::LogStream;

/// Diagnostic log stream shared by the console and the firmware entry.
pub static LOG_STREAM: LogStream = LogStream::new();
