//! CLI output formatting

use crate::verify::NfVerdict;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner for an open-ended wait
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("{}{}", SPINNER, message));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// One console line per network function verdict
pub fn format_nf_verdict(verdict: &NfVerdict) -> String {
    let icon = if verdict.passed { CHECK } else { CROSS };
    let detail = if verdict.log_found {
        let found: Vec<String> = verdict
            .check_run
            .markers
            .iter()
            .map(|(name, count)| format!("{}={}", name, count))
            .collect();
        style(found.join(" ")).dim().to_string()
    } else {
        style("check-run log not found").red().to_string()
    };

    format!("{} {} {}", icon, style(verdict.nf).bold(), detail)
}

/// Format a status line for a deployment action
pub fn format_action(action: &str, ok: bool) -> String {
    if ok {
        format!("{} {} {}", CHECK, style(action).cyan(), style("done").green())
    } else {
        format!("{} {} {}", CROSS, style(action).cyan(), style("failed").red())
    }
}
