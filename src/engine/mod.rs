//! Run coordinator
//!
//! A run is strictly staged:
//! 1. Resolving - build every referenced target, map each to its output file
//! 2. Writing - one variable file per root in a run-scoped temp directory
//! 3. Planning - init and plan all roots in parallel
//! 4. Reporting - show the saved plan of every root with changes
//! 5. Applying - after confirmation, apply one root at a time in name order
//!
//! Any stage failure ends the run. The variable-file directory is owned by
//! this function's stack frame and removed on every way out of it.

pub mod differ;
pub mod executor;
pub mod planner;
pub mod resolver;
pub mod writer;

#[cfg(test)]
mod testing;

use crate::config::RunConfig;
use crate::confirm::{APPLY_PROMPT, ConfirmCallback};
use crate::error::Error;
use crate::manifest;
use crate::signal;
use crate::ui;

use executor::ApplyOutcome;
use planner::{PendingPlan, PlanFileGuard, PlanOptions};

/// External tools a run drives.
pub struct Tools {
    pub build: buildkit::Client,
    pub terraform: terrakit::Client,
}

impl Tools {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            build: buildkit::Client::new(config.bazel_bin.clone()),
            terraform: terrakit::Client::new(config.terraform_bin.clone()),
        }
    }
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every root planned clean
    NoChanges,
    /// Diffs were shown; applying was not requested
    PlanOnly { pending: Vec<String> },
    /// The operator declined
    Aborted,
    /// These roots were applied, in order
    Applied { roots: Vec<String> },
}

/// Execute one full run.
pub fn run(
    config: &RunConfig,
    tools: &Tools,
    confirm: &mut dyn ConfirmCallback,
) -> Result<RunStatus, Error> {
    let roots = manifest::load(&config.manifest_path, &config.workspace_root)?;
    ui::info(&format!(
        "Loaded {} Terraform roots from manifest {}",
        roots.len(),
        config.manifest_path.display()
    ));
    signal::check()?;

    let artifacts = resolver::resolve(&tools.build, &config.workspace_root, &roots)?;
    signal::check()?;

    let var_files = writer::write(&roots, &artifacts)?;
    ui::success("Wrote artifact tfvars files.");
    log::debug!(
        "{} variable files in {}",
        var_files.len(),
        var_files.dir().display()
    );
    signal::check()?;

    let outcomes = planner::plan_all(
        &roots,
        &var_files,
        &tools.terraform,
        &PlanOptions {
            plan_dir: &config.plan_dir,
            jobs: config.jobs,
            quiet: config.quiet,
        },
    )?;

    let pending: Vec<PendingPlan> = outcomes
        .into_iter()
        .filter_map(planner::PlanOutcome::into_pending)
        .collect();
    // Every saved plan not applied by the end of the run is removed here,
    // including on error and interrupt.
    let _plan_files = PlanFileGuard::new(&pending);
    signal::check()?;

    if pending.is_empty() {
        ui::success("No changes to apply.");
        return Ok(RunStatus::NoChanges);
    }

    differ::show_plans(&pending, &tools.terraform);

    if config.plan_only {
        return Ok(RunStatus::PlanOnly {
            pending: names(&pending),
        });
    }

    let confirmed = confirm.confirm(APPLY_PROMPT)?;
    signal::check()?;

    match executor::apply_all(&pending, &tools.terraform, confirmed)? {
        ApplyOutcome::Aborted => Ok(RunStatus::Aborted),
        ApplyOutcome::Applied(roots) => {
            println!();
            ui::success(&format!("Applied {} roots", roots.len()));
            Ok(RunStatus::Applied { roots })
        }
    }
}

fn names(pending: &[PendingPlan]) -> Vec<String> {
    pending.iter().map(|p| p.root.name.clone()).collect()
}
