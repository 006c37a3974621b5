//! Apply a line diff onto an independently changed text.

use nest_diff::{split_lines, LineDiff};
use tracing::debug;

use crate::sequence::SequenceMerge;
use crate::Merged;

/// Apply `diff` onto the lines of `target` and rejoin them with `\n`.
///
/// Follows the same cursor rules as JSON arrays, including keeping both lines
/// when the target changed a line to a third value. Text merges cannot fail.
pub fn apply_lines(diff: &LineDiff, target: &str) -> Merged<String> {
    let lines: Vec<String> = split_lines(target).into_iter().map(str::to_string).collect();
    let mut merge = SequenceMerge::new(&lines);

    for entry in &diff.entries {
        merge.entry(entry, |a, b| a == b);
    }

    let (out, conflict) = merge.finish();
    if conflict {
        debug!(lines = out.len(), "line merge kept both sides of a conflicting line");
    }

    Merged {
        value: out.join("\n"),
        conflict,
    }
}
