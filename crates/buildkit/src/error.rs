//! Error types for build and artifact resolution.
//!
//! Build failures and resolution failures are kept apart: the first means
//! the build tool itself reported an error, the second means it succeeded
//! but a target did not map to exactly one output file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or resolving targets.
#[derive(Debug, Error)]
pub enum Error {
    /// `bazel build` exited non-zero
    #[error("build failed ({})", execkit::describe_exit(.code))]
    BuildFailed {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
        /// Standard error output from the build
        stderr: String,
    },

    /// `bazel cquery` exited non-zero
    #[error("output query failed ({})", execkit::describe_exit(.code))]
    QueryFailed {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
        /// Standard error output from the query
        stderr: String,
    },

    /// A target produced zero or several output files
    #[error("expected exactly one output path for `{target}`, found {}: {paths:?}", .paths.len())]
    Ambiguous {
        /// Normalized target label
        target: String,
        /// Output paths reported for the target
        paths: Vec<PathBuf>,
    },

    /// A requested target was absent from the query output
    #[error("no output reported for `{target}`")]
    Missing {
        /// Normalized target label
        target: String,
    },

    /// The build tool could not be started
    #[error(transparent)]
    Exec(#[from] execkit::Error),
}

impl Error {
    /// Captured diagnostic text, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::BuildFailed { stderr, .. } | Self::QueryFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, Error>;
