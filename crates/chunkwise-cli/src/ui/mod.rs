//! Terminal output: status lines, sizes and the plan summary.
//!
//! Everything here writes to stderr so stdout stays free for machine-readable
//! output (`--json`, plans).
//!
//! ```no_run
//! use chunkwise_cli::ui;
//!
//! ui::init_colors(ui::should_use_color(false));
//! ui::info("Loading configuration...");
//! ui::success("Configuration is valid");
//! ```

mod format;
mod messages;

pub use format::{format_duration, format_size, print_plan_summary};
pub use messages::{error, info, success, warning};

/// Whether stderr output, status lines and logs alike, should be colored.
///
/// `--no-color` and `NO_COLOR` disable colors, `FORCE_COLOR` forces them,
/// otherwise the terminal decides.
pub fn should_use_color(no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

/// Apply the color decision to `console` styling on stderr.
pub fn init_colors(enabled: bool) {
    console::set_colors_enabled_stderr(enabled);
}
