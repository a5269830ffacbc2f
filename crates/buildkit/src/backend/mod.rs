//! Backend abstraction for build-tool operations.
//!
//! The [`Backend`] trait is the only place the build tool is invoked, so the
//! resolution logic in [`crate::Client`] can be exercised against a scripted
//! backend in tests.

pub mod bazel;

use crate::error::Result;
use std::path::Path;

/// Backend trait for build-tool operations.
pub trait Backend: Send + Sync {
    /// Build `targets` in `workspace`. Fails if the build exits non-zero.
    fn build(&self, workspace: &Path, targets: &[String]) -> Result<()>;

    /// Query which output files each of `targets` produced.
    ///
    /// Returns the raw query stdout, one `<label>\t<paths>` record per line.
    fn query_outputs(&self, workspace: &Path, targets: &[String]) -> Result<String>;
}
