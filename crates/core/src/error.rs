// Central Error Type for invoking the merge executable

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised when the merge executable cannot be configured, run or waited on.
///
/// A merge the executable itself judged unsuccessful is NOT an error: it is
/// reported through [`crate::InvocationResult::success`].
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Executable missing, not a file, not executable, or invalid timeout
    #[error("Configuration error: {reason}: {}", .path.display())]
    Configuration { path: PathBuf, reason: String },

    /// Process could not be started or its output could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Process did not terminate in time and was killed
    #[error("Process timeout after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl InvokeError {
    pub fn configuration(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        InvokeError::Configuration {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Nothing is retried internally, and none of the variants is worth retrying
    /// blindly: configuration must be fixed, I/O failures surface verbatim and a
    /// timeout already burned the whole budget.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Result type alias using InvokeError
pub type Result<T> = std::result::Result<T, InvokeError>;
