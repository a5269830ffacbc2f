//! Planner - init and plan every root concurrently on a bounded pool.
//!
//! Results are reported in completion order as they arrive; the returned
//! outcomes are sorted by root name so nothing downstream depends on which
//! plan happened to finish first.

use crate::error::Error;
use crate::manifest::ConfigurationRoot;
use crate::progress;
use crate::ui;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use terrakit::PlanStatus;

use super::writer::VarFiles;

#[derive(Debug, Clone)]
pub struct PlanOptions<'a> {
    /// Stable storage for plan files between plan and apply
    pub plan_dir: &'a Path,
    /// Worker pool size
    pub jobs: usize,
    pub quiet: bool,
}

/// Result of planning one root. Produced once, never mutated.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub root: ConfigurationRoot,
    pub status: PlanStatus,
    pub stdout: String,
    pub stderr: String,
    /// Saved plan, present only when changes are pending
    pub plan_file: Option<PathBuf>,
}

impl PlanOutcome {
    /// The pending half of this outcome, if it has changes.
    pub fn into_pending(self) -> Option<PendingPlan> {
        match (self.status, self.plan_file) {
            (PlanStatus::ChangesPending, Some(plan_file)) => Some(PendingPlan {
                root: self.root,
                plan_file,
            }),
            _ => None,
        }
    }
}

/// A root with a saved plan waiting for show and apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlan {
    pub root: ConfigurationRoot,
    pub plan_file: PathBuf,
}

/// `<plan_dir>/<name>.tfplan`
pub fn plan_file_path(plan_dir: &Path, name: &str) -> PathBuf {
    plan_dir.join(format!("{name}.tfplan"))
}

/// Remove a plan file; already being gone is fine.
pub fn remove_plan_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Remove plan files nothing will apply, warning on failure.
pub fn discard<'a>(plan_files: impl IntoIterator<Item = &'a Path>) {
    for path in plan_files {
        if let Err(e) = remove_plan_file(path) {
            log::warn!("could not remove {}: {e}", path.display());
        }
    }
}

/// Owns the saved plans of a run's pending roots and removes whatever is
/// left of them when dropped, however the run ends.
#[derive(Debug)]
pub struct PlanFileGuard<'a> {
    pending: &'a [PendingPlan],
}

impl<'a> PlanFileGuard<'a> {
    pub fn new(pending: &'a [PendingPlan]) -> Self {
        Self { pending }
    }
}

impl Drop for PlanFileGuard<'_> {
    fn drop(&mut self) {
        discard(self.pending.iter().map(|p| p.plan_file.as_path()));
    }
}

/// Completion-order status line for a root, `None` in quiet mode.
fn status_line(outcome: &PlanOutcome, quiet: bool) -> Option<String> {
    (!quiet).then(|| {
        ui::root_status(
            &outcome.root.name,
            &outcome.status.to_string(),
            outcome.status.has_changes(),
        )
    })
}

enum TaskResult {
    Planned(Result<PlanOutcome, Error>),
    Skipped,
}

/// Init and plan every root, returning outcomes sorted by root name.
///
/// The first init failure or failed plan aborts the stage: roots that have
/// not started yet are skipped, plans already running finish on their own,
/// and no saved plan from this stage is left behind.
pub fn plan_all(
    roots: &[ConfigurationRoot],
    var_files: &VarFiles,
    terraform: &terrakit::Client,
    opts: &PlanOptions<'_>,
) -> Result<Vec<PlanOutcome>, Error> {
    if roots.is_empty() {
        return Ok(Vec::new());
    }

    ui::info("Planning all directories...");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs.max(1))
        .thread_name(|i| format!("plan-{i}"))
        .build()
        .map_err(|e| Error::io("failed to create plan worker pool", io::Error::other(e)))?;

    let pb = progress::plan_bar(roots.len() as u64, opts.quiet);
    let abort = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel();

    let collected = pool.in_place_scope(|scope| {
        for root in roots {
            let tx = tx.clone();
            let abort = &abort;
            scope.spawn(move |_| {
                let result = if abort.load(Ordering::SeqCst) {
                    TaskResult::Skipped
                } else {
                    TaskResult::Planned(plan_root(root, var_files, terraform, opts.plan_dir))
                };
                let _ = tx.send(result);
            });
        }
        drop(tx);

        let mut outcomes: Vec<PlanOutcome> = Vec::with_capacity(roots.len());
        let mut failure = None;
        // Drain every result; plans finishing after a failure lose their files.
        for result in rx {
            pb.inc(1);
            let outcome = match result {
                TaskResult::Planned(Ok(outcome)) => outcome,
                TaskResult::Planned(Err(err)) => {
                    abort.store(true, Ordering::SeqCst);
                    failure.get_or_insert(err);
                    continue;
                }
                TaskResult::Skipped => continue,
            };

            if outcome.status.is_failed() {
                abort.store(true, Ordering::SeqCst);
                failure.get_or_insert(Error::PlanFailure {
                    root: outcome.root.name.clone(),
                    message: outcome.status.to_string(),
                    stderr: outcome.stderr.clone(),
                });
            }
            if failure.is_some() {
                discard(outcome.plan_file.as_deref());
                continue;
            }

            log::debug!("{} plan output:\n{}", outcome.root.name, outcome.stdout.trim_end());
            if let Some(line) = status_line(&outcome, opts.quiet) {
                progress::println(&pb, &line);
            }
            outcomes.push(outcome);
        }

        match failure {
            Some(err) => {
                discard(outcomes.iter().filter_map(|o| o.plan_file.as_deref()));
                Err(err)
            }
            None => Ok(outcomes),
        }
    });
    pb.finish_and_clear();

    let mut outcomes = collected?;
    outcomes.sort_by(|a, b| a.root.name.cmp(&b.root.name));
    Ok(outcomes)
}

fn plan_root(
    root: &ConfigurationRoot,
    var_files: &VarFiles,
    terraform: &terrakit::Client,
    plan_dir: &Path,
) -> Result<PlanOutcome, Error> {
    terraform
        .init(&root.dir)
        .map_err(|err| Error::plan_init(&root.name, err))?;

    let var_file = var_files.get(&root.dir).ok_or_else(|| {
        Error::io(
            format!("no variable file for {}", root.dir.display()),
            io::ErrorKind::NotFound.into(),
        )
    })?;

    let plan_file = plan_file_path(plan_dir, &root.name);
    let report = terraform
        .plan(&root.dir, &plan_file, var_file)
        .map_err(|err| Error::PlanFailure {
            root: root.name.clone(),
            message: format!("could not run: {err}"),
            stderr: String::new(),
        })?;
    log::debug!("{}: plan {}", root.name, report.status);

    let plan_file = if report.status.has_changes() {
        Some(plan_file)
    } else {
        discard([plan_file.as_path()]);
        None
    };

    Ok(PlanOutcome {
        root: root.clone(),
        status: report.status,
        stdout: report.stdout,
        stderr: report.stderr,
        plan_file,
    })
}
