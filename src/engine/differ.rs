//! Diff report - render each pending plan for the operator.

use crate::ui;
use colored::Colorize;

use super::planner::PendingPlan;

/// Header line for one root's section of the report.
pub fn root_header(name: &str) -> String {
    format!("--- {name} ---")
}

/// Print the saved plan of every pending root, in the given order.
///
/// A root whose plan cannot be rendered is reported as a warning; its saved
/// plan is still valid and still offered for apply.
pub fn show_plans(pending: &[PendingPlan], terraform: &terrakit::Client) {
    ui::banner("Planned changes:");

    for plan in pending {
        println!();
        println!("{}", root_header(&plan.root.name).cyan().bold());
        match terraform.show(&plan.root.dir, &plan.plan_file) {
            Ok(text) => println!("{}", text.trim_end()),
            Err(err) => {
                ui::warn(&format!("{}: could not render plan: {err}", plan.root.name));
                if let Some(stderr) = err.stderr().filter(|s| !s.trim().is_empty()) {
                    ui::dim(stderr.trim_end());
                }
            }
        }
    }

    println!();
    println!("{}", ui::banner_rule());
}
