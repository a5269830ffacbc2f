//! Run-level error taxonomy.
//!
//! Every variant is fatal for the whole run. Nothing is retried; the only
//! recovery is dropping the run's temporary resources on the way out.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Manifest missing, malformed, or semantically invalid
    #[error("invalid manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    /// The build tool failed to build or query the referenced targets
    #[error("artifact build failed: {message}")]
    Build { message: String, stderr: String },

    /// A target did not resolve to exactly one output file
    #[error("artifact resolution failed for `{target}`: {message}")]
    Resolution { target: String, message: String },

    /// `init` failed for a root
    #[error("{root}: {message}")]
    PlanInit {
        root: String,
        message: String,
        stderr: String,
    },

    /// `plan` exited outside the detailed-exit-code success family
    #[error("{root}: terraform plan {message}")]
    PlanFailure {
        root: String,
        message: String,
        stderr: String,
    },

    /// `apply` exited non-zero for a root
    #[error("{root}: {message}")]
    ApplyFailure { root: String, message: String },

    /// SIGINT or SIGTERM was received
    #[error("interrupted")]
    Interrupted,

    /// Local filesystem failure
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Build an init failure for `root` from a Terraform error.
    pub fn plan_init(root: &str, err: terrakit::Error) -> Self {
        let stderr = err.stderr().unwrap_or_default().to_string();
        Self::PlanInit {
            root: root.to_string(),
            message: terraform_message("init", &err),
            stderr,
        }
    }

    /// Build an apply failure for `root` from a Terraform error.
    pub fn apply_failure(root: &str, err: &terrakit::Error) -> Self {
        Self::ApplyFailure {
            root: root.to_string(),
            message: terraform_message("apply", err),
        }
    }

    /// Captured output of the failing tool, printed after the error line.
    pub fn diagnostic(&self) -> Option<&str> {
        let text = match self {
            Self::Build { stderr, .. }
            | Self::PlanInit { stderr, .. }
            | Self::PlanFailure { stderr, .. } => stderr.as_str(),
            _ => return None,
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Kit errors already name the failing command, except when it never ran.
fn terraform_message(command: &str, err: &terrakit::Error) -> String {
    match err {
        terrakit::Error::Exec(e) => format!("terraform {command} could not run: {e}"),
        other => other.to_string(),
    }
}

impl From<buildkit::Error> for Error {
    fn from(err: buildkit::Error) -> Self {
        match err {
            buildkit::Error::Ambiguous { ref target, .. } | buildkit::Error::Missing { ref target } => {
                Self::Resolution {
                    target: target.clone(),
                    message: err.to_string(),
                }
            }
            other => {
                let stderr = other.stderr().unwrap_or_default().to_string();
                Self::Build {
                    message: other.to_string(),
                    stderr,
                }
            }
        }
    }
}
