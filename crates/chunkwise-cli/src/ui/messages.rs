//! Status lines.

use owo_colors::OwoColorize;

/// `✓ message` in green.
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// `ℹ message` in blue.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// `⚠ message` in yellow.
///
/// ```no_run
/// use chunkwise_cli::ui::warning;
///
/// warning("certificate checks are off for /api");
/// ```
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// `✗ message` in red.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}
