//! Line-level diff: line-by-line comparison of text contents.
//!
//! Lines are aligned with the same LCS walk used for JSON arrays; a pair of
//! unmatched lines at the same gap position becomes a single update.

use serde::Serialize;

use crate::entry::DiffEntry;
use crate::lcs::{align, Step};

/// The result of diffing two texts, one entry per line in alignment order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineDiff {
    /// The individual line entries.
    pub entries: Vec<DiffEntry<String>>,
}

impl LineDiff {
    /// Returns `true` if every line is common to both texts.
    pub fn is_unchanged(&self) -> bool {
        self.entries.iter().all(DiffEntry::is_common)
    }

    /// Returns `true` if at least one line was added, removed or updated.
    pub fn is_modified(&self) -> bool {
        !self.is_unchanged()
    }

    /// Number of lines present only on the new side, updates included.
    pub fn additions(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Added { .. } | DiffEntry::Updated { .. }))
            .count()
    }

    /// Number of lines present only on the old side, updates included.
    pub fn deletions(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Removed { .. } | DiffEntry::Updated { .. }))
            .count()
    }

    /// Rebuild the new (actual) text.
    pub fn actual(&self) -> String {
        join_lines(self.entries.iter().filter_map(DiffEntry::actual))
    }

    /// Rebuild the old (base) text.
    pub fn base(&self) -> String {
        join_lines(self.entries.iter().filter_map(DiffEntry::base))
    }
}

/// Split text on `\n` or `\r\n`. An empty text is a single empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Join lines with `\n`.
pub fn join_lines<'a>(lines: impl IntoIterator<Item = &'a String>) -> String {
    lines
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compute a line-by-line diff between `actual` (new) and `base` (old).
pub fn compare_lines(actual: &str, base: &str) -> LineDiff {
    let actual = split_lines(actual);
    let base = split_lines(base);

    let entries = align(&actual, &base, |a, b| a == b)
        .into_iter()
        .map(|step| match step {
            Step::Common { actual: i, .. } => DiffEntry::common(actual[i].to_string()),
            Step::Paired { actual: i, base: j } if actual[i] == base[j] => {
                DiffEntry::common(actual[i].to_string())
            }
            Step::Paired { actual: i, base: j } => {
                DiffEntry::updated(actual[i].to_string(), base[j].to_string())
            }
            Step::Added(i) => DiffEntry::added(actual[i].to_string()),
            Step::Removed(j) => DiffEntry::removed(base[j].to_string()),
        })
        .collect();

    LineDiff { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_no_diff() {
        let diff = compare_lines("hello\nworld", "hello\nworld");
        assert!(diff.is_unchanged());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn modified_line_is_a_single_update() {
        let diff = compare_lines("a\nB\nc", "a\nb\nc");
        assert_eq!(
            diff.entries,
            vec![
                DiffEntry::common("a".to_string()),
                DiffEntry::updated("B".to_string(), "b".to_string()),
                DiffEntry::common("c".to_string()),
            ]
        );
        assert!(diff.is_modified());
    }

    #[test]
    fn single_line_addition() {
        let diff = compare_lines("line1\nline2\nline3", "line1\nline2");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.entries.last(), Some(&DiffEntry::added("line3".to_string())));
    }

    #[test]
    fn single_line_deletion() {
        let diff = compare_lines("line1\nline3", "line1\nline2\nline3");
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 1);
        assert_eq!(diff.entries[1], DiffEntry::removed("line2".to_string()));
    }

    #[test]
    fn crlf_and_lf_are_equivalent() {
        assert!(compare_lines("a\r\nb", "a\nb").is_unchanged());
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(split_lines(""), vec![""]);
        let diff = compare_lines("x", "");
        assert_eq!(diff.entries, vec![DiffEntry::updated("x".to_string(), String::new())]);
    }

    #[test]
    fn trailing_newline_is_an_extra_empty_line() {
        let diff = compare_lines("a\n", "a");
        assert_eq!(
            diff.entries,
            vec![DiffEntry::common("a".to_string()), DiffEntry::added(String::new())]
        );
    }

    #[test]
    fn reconstructs_both_texts() {
        let base = ".*\nnode_modules\ndist";
        let actual = ".*\ntarget\ndist\n*.log";
        let diff = compare_lines(actual, base);
        assert_eq!(diff.actual(), actual);
        assert_eq!(diff.base(), base);
    }

    #[test]
    fn serializes_as_entry_list() {
        let diff = compare_lines("a\nb", "a");
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "common", "value": "a"},
                {"type": "added", "value": "b"},
            ])
        );
    }
}
