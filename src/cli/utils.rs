//! Shared utilities for CLI commands

use chrono::NaiveDate;
use tabled::{Table, settings::Style};

use crate::profile::display::DueLabel;

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Due date with its relative label, `-` when unset
pub fn format_due(due: Option<&str>, today: NaiveDate) -> String {
    match (due, DueLabel::for_date(due, today)) {
        (Some(date), Some(label)) => format!("{} ({})", date, label),
        (Some(date), None) => date.to_string(),
        (None, _) => "-".to_string(),
    }
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}
