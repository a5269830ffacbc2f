//! Backend abstraction for Terraform operations.
//!
//! Every method runs with the configuration root as working directory and
//! reports the raw exit code; interpretation happens in [`crate::Client`].

pub mod terraform;

use crate::error::Result;
use execkit::CommandOutput;
use std::path::Path;

/// Backend trait for Terraform operations.
pub trait Backend: Send + Sync {
    /// `init` in `dir`, output captured.
    fn init(&self, dir: &Path) -> Result<CommandOutput>;

    /// `plan` in `dir`, saving the plan to `plan_file`, output captured.
    fn plan(&self, dir: &Path, plan_file: &Path, var_file: &Path) -> Result<CommandOutput>;

    /// `show` of a saved plan, output captured.
    fn show(&self, dir: &Path, plan_file: &Path) -> Result<CommandOutput>;

    /// `apply` of a saved plan with output streamed to the terminal.
    ///
    /// Returns the exit code, `None` if killed by a signal.
    fn apply(&self, dir: &Path, plan_file: &Path) -> Result<Option<i32>>;
}
