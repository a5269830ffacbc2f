//! Real build backend using the `bazel` CLI.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::query;
use execkit::Invocation;
use std::path::Path;

/// Backend that executes real `bazel` commands.
pub struct BazelBackend {
    /// Path or name of the bazel executable
    bazel_bin: String,
}

impl BazelBackend {
    /// Create a backend that runs `bazel_bin`.
    pub fn new(bazel_bin: impl Into<String>) -> Self {
        Self {
            bazel_bin: bazel_bin.into(),
        }
    }

    /// `bazel build <targets...>`
    pub fn build_invocation(&self, workspace: &Path, targets: &[String]) -> Invocation {
        Invocation::new(&self.bazel_bin, workspace)
            .arg("build")
            .args(targets.iter().cloned())
    }

    /// `bazel cquery --output=starlark --starlark:expr=<expr> set(<targets...>)`
    pub fn cquery_invocation(&self, workspace: &Path, targets: &[String]) -> Invocation {
        Invocation::new(&self.bazel_bin, workspace).args([
            "cquery".to_string(),
            "--output=starlark".to_string(),
            format!("--starlark:expr={}", query::STARLARK_EXPR),
            query::set_expression(targets),
        ])
    }
}

impl Default for BazelBackend {
    fn default() -> Self {
        Self::new("bazel")
    }
}

impl Backend for BazelBackend {
    fn build(&self, workspace: &Path, targets: &[String]) -> Result<()> {
        let output = self.build_invocation(workspace, targets).output()?;
        if !output.success() {
            return Err(Error::BuildFailed {
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(())
    }

    fn query_outputs(&self, workspace: &Path, targets: &[String]) -> Result<String> {
        let output = self.cquery_invocation(workspace, targets).output()?;
        if !output.success() {
            return Err(Error::QueryFailed {
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }
}
