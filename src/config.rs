//! Run configuration resolved from the command line and environment.

use crate::cli::Cli;
use crate::error::Error;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Upper bound on the default plan pool size.
const MAX_DEFAULT_JOBS: usize = 32;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory all root paths are relative to
    pub workspace_root: PathBuf,
    /// Manifest listing the Terraform roots
    pub manifest_path: PathBuf,
    /// Size of the plan worker pool
    pub jobs: usize,
    /// Where saved plans live between plan and apply
    pub plan_dir: PathBuf,
    pub bazel_bin: String,
    pub terraform_bin: String,
    /// Stop after showing diffs
    pub plan_only: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    pub quiet: bool,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, Error> {
        // Under `bazel run` the workspace file is a runfiles symlink; the real
        // workspace is wherever it points.
        let workspace_file = fs::canonicalize(&cli.workspace_file).map_err(|e| {
            Error::io(
                format!(
                    "could not resolve workspace file {}",
                    cli.workspace_file.display()
                ),
                e,
            )
        })?;
        let workspace_root = workspace_file
            .parent()
            .map(PathBuf::from)
            .unwrap_or(workspace_file.clone());

        Ok(Self {
            workspace_root,
            manifest_path: cli.manifest.clone(),
            jobs: cli.jobs.map_or_else(default_jobs, NonZeroUsize::get),
            plan_dir: cli.plan_dir.clone().unwrap_or_else(std::env::temp_dir),
            bazel_bin: cli.bazel.clone(),
            terraform_bin: cli.terraform.clone(),
            plan_only: cli.plan_only,
            assume_yes: cli.yes,
            quiet: cli.quiet,
        })
    }
}

/// Plans mostly wait on the network, so the pool is a little wider than
/// the CPU count.
pub fn default_jobs() -> usize {
    let cpus = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    (cpus + 4).min(MAX_DEFAULT_JOBS)
}
