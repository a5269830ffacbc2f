//! Apply executor - one root at a time, in name order.

use crate::error::Error;
use crate::signal;
use crate::ui;
use colored::Colorize;

use super::planner::{PendingPlan, remove_plan_file};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The operator declined; nothing was touched
    Aborted,
    /// Names of the applied roots, in apply order
    Applied(Vec<String>),
}

/// Apply every pending plan if `confirmed`.
///
/// Applies never overlap. The first failure stops the stage; plans already
/// applied have had their plan files removed.
pub fn apply_all(
    pending: &[PendingPlan],
    terraform: &terrakit::Client,
    confirmed: bool,
) -> Result<ApplyOutcome, Error> {
    if !confirmed {
        println!();
        println!("  {} Aborted.", "✗".red());
        return Ok(ApplyOutcome::Aborted);
    }

    let mut applied = Vec::with_capacity(pending.len());
    for plan in pending {
        signal::check()?;

        let name = &plan.root.name;
        println!();
        println!("{} {}", "Applying:".cyan().bold(), name);

        terraform
            .apply(&plan.root.dir, &plan.plan_file)
            .map_err(|err| Error::apply_failure(name, &err))?;

        if let Err(e) = remove_plan_file(&plan.plan_file) {
            ui::warn(&format!(
                "{name}: applied, but could not remove {}: {e}",
                plan.plan_file.display()
            ));
        }
        applied.push(name.clone());
    }

    Ok(ApplyOutcome::Applied(applied))
}
