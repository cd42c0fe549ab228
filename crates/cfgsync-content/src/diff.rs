//! Line changes and unified diffs

use serde::Serialize;
use similar::TextDiff;

/// One rewritten artifact line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineChange {
    /// 1-based line number.
    pub line: usize,
    /// Symbol whose assignment was rewritten.
    pub symbol: String,
    pub before: String,
    pub after: String,
}

impl std::fmt::Display for LineChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>5}: {}\n   -> {}",
            self.line, self.before, self.after
        )
    }
}

/// Unified diff between two versions of a file, empty when they are equal.
pub fn unified_diff(old: &str, new: &str, path: &str) -> String {
    if old == new {
        return String::new();
    }
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}
