//! Progress indicators for the plan stage.

use indicatif::{ProgressBar, ProgressStyle};

/// Bar counting finished plans. Hidden in quiet mode.
pub fn plan_bar(len: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} Planning [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}

/// Print a line above the bar without tearing it. Works when hidden too.
pub fn println(pb: &ProgressBar, line: &str) {
    pb.suspend(|| println!("{line}"));
}
