//! Error types for process execution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while launching a subprocess.
///
/// A subprocess that starts and exits non-zero is not an error at this
/// level: its exit code is reported through [`crate::CommandOutput`] and the
/// caller decides what it means.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be found on `PATH`
    #[error("program not found: {program}")]
    NotFound {
        /// Program that was looked up
        program: String,
    },

    /// The program exists but could not be started
    #[error("failed to execute {program} in {}: {source}", .cwd.display())]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Working directory the program was started in
        cwd: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for process execution.
pub type Result<T> = std::result::Result<T, Error>;
