use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate};

use crate::task::{Section, SectionCounts, Task, TaskId};

/// Position of `previous` in the visible list, falling back to the first row.
pub fn select_by_id(visible: &[&Task], previous: Option<TaskId>) -> Option<usize> {
    if visible.is_empty() {
        return None;
    }
    if let Some(id) = previous {
        if let Some(pos) = visible.iter().position(|task| task.id == id) {
            return Some(pos);
        }
    }
    Some(0)
}

/// Selection to keep after the row at `removed_pos` disappears: the row that
/// slid into its place, or the new last row.
pub fn select_after_removal(visible: &[&Task], removed_pos: usize) -> Option<TaskId> {
    if visible.is_empty() {
        return None;
    }
    let pos = removed_pos.min(visible.len() - 1);
    Some(visible[pos].id)
}

/// First and one-past-last row to draw so that `selected` stays on screen.
pub fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|value| value.date_naive())
}

/// Human-readable due date; unparseable values, and formats that cannot
/// render a date, fall back to the value as typed.
pub fn format_due(value: &str, format: &str) -> String {
    let Some(date) = parse_due_date(value) else {
        return value.trim().to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => value.trim().to_string(),
    }
}

pub fn count_summary(counts: SectionCounts, visible: usize, section: Section) -> String {
    format!(
        "showing {visible} of {}  completed: {}  pending: {}",
        counts.for_section(section),
        counts.completed,
        counts.pending
    )
}
