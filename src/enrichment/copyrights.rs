//! Copyright statement aggregation.

use crate::model::{CopyrightEntry, NOASSERTION};

/// Join the first line of each active statement, dropping exact duplicates.
///
/// Yields NOASSERTION when no active statement remains.
#[must_use]
pub fn aggregate_copyrights(entries: &[CopyrightEntry]) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for entry in entries.iter().filter(|e| e.active) {
        let first = entry.updated_copyright.lines().next().unwrap_or("").trim();
        if !first.is_empty() && !lines.contains(&first) {
            lines.push(first);
        }
    }
    if lines.is_empty() {
        NOASSERTION.to_string()
    } else {
        lines.join("\n")
    }
}
