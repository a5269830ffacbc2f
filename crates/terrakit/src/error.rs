//! Error types for Terraform operations.

use thiserror::Error;

/// Errors that can occur while driving Terraform.
///
/// A plan that exits outside the detailed-exit-code success family is not
/// an error here; it is reported as [`crate::PlanStatus::Failed`] so the
/// caller keeps the captured output.
#[derive(Debug, Error)]
pub enum Error {
    /// `terraform init` exited non-zero
    #[error("terraform init failed ({})", execkit::describe_exit(.code))]
    InitFailed {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// `terraform show` exited non-zero
    #[error("terraform show failed ({})", execkit::describe_exit(.code))]
    ShowFailed {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// `terraform apply` exited non-zero
    #[error("terraform apply failed ({})", execkit::describe_exit(.code))]
    ApplyFailed {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
    },

    /// Terraform could not be started
    #[error(transparent)]
    Exec(#[from] execkit::Error),
}

impl Error {
    /// Captured diagnostic text, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::InitFailed { stderr, .. } | Self::ShowFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type for Terraform operations.
pub type Result<T> = std::result::Result<T, Error>;
