use colored::Colorize;

/// Width of the `=` banners around the diff report.
pub const BANNER_WIDTH: usize = 60;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// A full-width `=` rule.
pub fn banner_rule() -> String {
    "=".repeat(BANNER_WIDTH)
}

/// Print `title` between two `=` rules.
pub fn banner(title: &str) {
    println!();
    println!("{}", banner_rule());
    println!("{}", title.bold());
    println!("{}", banner_rule());
}

/// Status line for one root, e.g. `  network: changes detected`.
pub fn root_status(name: &str, status: &str, changed: bool) -> String {
    let symbol = if changed { "~".yellow() } else { "○".dimmed() };
    format!("  {symbol} {name}: {status}")
}
