//! # terrakit
//!
//! Drive the Terraform CLI against a configuration root.
//!
//! This crate provides:
//! - A [`Backend`](backend::Backend) trait over the `terraform` CLI, with a
//!   real implementation
//! - Classification of `plan -detailed-exitcode` into [`PlanStatus`]
//! - A [`Client`] that turns non-zero `init`, `show` and `apply` exits into
//!   typed errors carrying the captured output
//!
//! Terraform is treated as an opaque tool: state, dependency graph and diff
//! computation all stay inside it.
//!
//! ## Example
//!
//! ```no_run
//! use terrakit::{Client, PlanStatus};
//! use std::path::Path;
//!
//! let client = Client::new("terraform");
//! let dir = Path::new("/src/monorepo/network/infra");
//! let plan = Path::new("/tmp/network.tfplan");
//!
//! client.init(dir)?;
//! let report = client.plan(dir, plan, Path::new("/tmp/network.tfvars.json"))?;
//! if report.status == PlanStatus::ChangesPending {
//!     println!("{}", client.show(dir, plan)?);
//!     client.apply(dir, plan)?;
//! }
//! # Ok::<(), terrakit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{PlanReport, PlanStatus};

use backend::{Backend, terraform::TerraformBackend};
use std::path::Path;

/// High-level client for Terraform operations.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client that runs the given terraform executable.
    pub fn new(terraform_bin: impl Into<String>) -> Self {
        Self {
            backend: Box::new(TerraformBackend::new(terraform_bin)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Initialize the working directory.
    pub fn init(&self, dir: &Path) -> Result<()> {
        let output = self.backend.init(dir)?;
        if !output.success() {
            return Err(Error::InitFailed {
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        Ok(())
    }

    /// Plan into `plan_file` and classify the detailed exit code.
    pub fn plan(&self, dir: &Path, plan_file: &Path, var_file: &Path) -> Result<PlanReport> {
        let output = self.backend.plan(dir, plan_file, var_file)?;
        Ok(PlanReport {
            status: PlanStatus::from_exit_code(output.code),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Render a saved plan as text.
    pub fn show(&self, dir: &Path, plan_file: &Path) -> Result<String> {
        let output = self.backend.show(dir, plan_file)?;
        if !output.success() {
            return Err(Error::ShowFailed {
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    /// Apply a saved plan, streaming Terraform's output.
    pub fn apply(&self, dir: &Path, plan_file: &Path) -> Result<()> {
        match self.backend.apply(dir, plan_file)? {
            Some(0) => Ok(()),
            code => Err(Error::ApplyFailed { code }),
        }
    }
}
