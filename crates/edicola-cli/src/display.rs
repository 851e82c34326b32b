//! Display utilities for the CLI

use colored::*;
use edicola_types::{EdicolaError, MagazineRecord, Wei};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Report a failed action, naming the action and the error category.
///
/// User cancellation prints nothing: declining in the signing UI is an
/// expected outcome, not an error.
pub fn action_failed(action: &str, err: &EdicolaError) {
    if err.is_silent() {
        return;
    }
    println!(
        "  {} {} failed ({}): {}",
        "✗".bright_red(),
        action,
        err.category().bright_red(),
        err
    );
}

/// Busy indicator for write operations and explicit refreshes
pub fn busy(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("  {spinner} {msg}").expect("static template parses"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Epoch milliseconds rendered as `dd-mm-yyyy`
pub fn format_date(epoch_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|dt| dt.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// One catalog line for a magazine record
pub fn magazine_line(record: &MagazineRecord) {
    let when = if record.is_released() {
        format_date(record.release_date)
    } else {
        "unreleased".to_string()
    };
    println!(
        "  {}  {}  {}",
        record.address.short().bright_black(),
        when.bright_cyan(),
        record.title
    );
}

/// Native amount with unit suffix
pub fn amount(value: Wei) -> String {
    format!("{} ETH", value.format_native())
}
