//! Plan classification types.

use std::fmt;

/// Outcome of `terraform plan -detailed-exitcode`.
///
/// The exit-code convention is Terraform's public contract:
/// `0` means the plan succeeded with no changes, `2` means it succeeded and
/// changes are pending, anything else is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// Exit 0: infrastructure matches configuration
    NoChange,
    /// Exit 2: the saved plan contains changes
    ChangesPending,
    /// Any other exit, or termination by signal
    Failed {
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
    },
}

impl PlanStatus {
    /// Classify a detailed exit code.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::NoChange,
            Some(2) => Self::ChangesPending,
            code => Self::Failed { code },
        }
    }

    /// Whether the saved plan has changes to apply.
    pub fn has_changes(&self) -> bool {
        matches!(self, Self::ChangesPending)
    }

    /// Whether the plan step failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChange => write!(f, "no changes"),
            Self::ChangesPending => write!(f, "changes detected"),
            Self::Failed { code } => write!(f, "failed ({})", execkit::describe_exit(code)),
        }
    }
}

/// Classified plan result with the captured streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    /// Classification of the exit code
    pub status: PlanStatus,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}
