//! Sizes, durations and the plan summary table.

use std::time::Duration;

use chunkwise_core::{OutputKind, OutputPlan};
use console::Term;
use owo_colors::OwoColorize;

/// Human-readable size, binary units.
///
/// ```
/// use chunkwise_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// Human-readable duration.
///
/// ```
/// use std::time::Duration;
/// use chunkwise_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(42)), "42ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print bundles, unassigned modules and planned files to stderr.
///
/// `sizes` holds the content length of each file in `plan.files`, in order.
/// Chunks above `warn_bytes` are flagged.
pub fn print_plan_summary(plan: &OutputPlan, sizes: &[u64], warn_bytes: u64) {
    let width = (Term::stderr().size().1 as usize).min(80);

    eprintln!("\n{}", "Bundles".bold().underline());
    for (bundle, modules) in &plan.bundles {
        eprintln!(
            "  {} {} {}",
            "▸".blue(),
            bundle.as_str().bright_white().bold(),
            format!("({} modules)", modules.len()).dimmed()
        );
    }
    if !plan.unassigned.is_empty() {
        eprintln!(
            "  {} {} {}",
            "▸".dimmed(),
            "default grouping".dimmed(),
            format!("({} modules)", plan.unassigned.len()).dimmed()
        );
    }

    if plan.files.is_empty() {
        return;
    }

    eprintln!("\n{}", "Output files".bold().underline());
    eprintln!("{}", "─".repeat(width));
    for (file, size) in plan.files.iter().zip(sizes) {
        let oversized = file.kind != OutputKind::Asset && *size > warn_bytes;
        let size = format_size(*size);
        eprintln!(
            "  {} {} {}{}",
            "▸".blue(),
            file.path.bright_white(),
            size.dimmed(),
            if oversized {
                format!(" {}", "over chunk size limit".yellow())
            } else {
                String::new()
            }
        );
    }
    eprintln!("{}", "─".repeat(width));

    let total: u64 = sizes.iter().sum();
    eprintln!(
        "  {} {} in {} files",
        "Total:".bold(),
        format_size(total).green(),
        plan.files.len()
    );
}
