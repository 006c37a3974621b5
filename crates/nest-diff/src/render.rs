//! Turn diffs into display lines for review before a merge is confirmed.
//!
//! Rendering is pure: callers decide how to color and print each line. Object
//! fields are walked in diff order and array entries in alignment order, so
//! what the user reviews matches what the merge walks. An update always
//! renders as a removed line immediately followed by an added line.

use serde_json::Value;

use crate::entry::DiffEntry;
use crate::line_diff::LineDiff;
use crate::tree_diff::Diff;

/// Indentation per nesting level.
pub const INDENT: &str = "  ";

/// What a display line stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// The header naming the rendered file.
    Title,
    Added,
    Removed,
    /// A container whose contents changed.
    Modified,
    Unchanged,
}

impl LineKind {
    /// The one-character marker printed after the indentation.
    pub fn marker(self) -> char {
        match self {
            LineKind::Added => '+',
            LineKind::Removed => '-',
            LineKind::Modified => '~',
            LineKind::Title | LineKind::Unchanged => ' ',
        }
    }
}

/// A single rendered line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayLine {
    pub kind: LineKind,
    /// Nesting level; each level is indented by [`INDENT`].
    pub depth: usize,
    pub text: String,
}

impl DisplayLine {
    pub fn new(kind: LineKind, depth: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            depth,
            text: text.into(),
        }
    }

    /// The header line for a rendered file.
    pub fn title(title: &str) -> Self {
        Self::new(LineKind::Title, 0, format!("[{title}] Deleted / Added / Modified"))
    }

    /// The uncolored text form: indentation, marker, space, text.
    pub fn plain(&self) -> String {
        match self.kind {
            LineKind::Title => self.text.clone(),
            kind => format!("{}{} {}", INDENT.repeat(self.depth), kind.marker(), self.text),
        }
    }
}

/// Render a tree diff, one line per leaf plus container delimiters.
pub fn render(diff: &Diff) -> Vec<DisplayLine> {
    let mut out = Vec::new();
    render_node(diff, None, 0, &mut out);
    out
}

/// Render a tree diff under a title line.
pub fn render_titled(title: &str, diff: &Diff) -> Vec<DisplayLine> {
    let mut out = vec![DisplayLine::title(title)];
    render_node(diff, None, 0, &mut out);
    out
}

/// Render a line diff under a title line.
pub fn render_lines(title: &str, diff: &LineDiff) -> Vec<DisplayLine> {
    let mut out = vec![DisplayLine::title(title)];
    for entry in &diff.entries {
        push_entry(entry, 0, &mut out, |line| line.clone());
    }
    out
}

/// Render one node and report whether anything under it changed.
///
/// Container headers are pushed first and retagged once their children have
/// been rendered, so each node is visited once.
fn render_node(diff: &Diff, key: Option<&str>, depth: usize, out: &mut Vec<DisplayLine>) -> bool {
    match diff {
        Diff::Entry(entry) => {
            push_entry(entry, depth, out, |value| labelled(key, &encode(value)));
            !entry.is_common()
        }
        Diff::Array(items) => render_container(
            key,
            ("[", "]"),
            items.iter().map(|item| (None, item)),
            depth,
            out,
        ),
        Diff::Object(fields) => render_container(
            key,
            ("{", "}"),
            fields.iter().map(|(field, item)| (Some(field.as_str()), item)),
            depth,
            out,
        ),
    }
}

fn render_container<'a>(
    key: Option<&str>,
    (open, close): (&str, &str),
    children: impl Iterator<Item = (Option<&'a str>, &'a Diff)>,
    depth: usize,
    out: &mut Vec<DisplayLine>,
) -> bool {
    let header = out.len();
    out.push(DisplayLine::new(LineKind::Unchanged, depth, labelled(key, open)));

    let mut changed = false;
    for (child_key, child) in children {
        changed |= render_node(child, child_key, depth + 1, out);
    }
    if changed {
        out[header].kind = LineKind::Modified;
    }
    out.push(DisplayLine::new(LineKind::Unchanged, depth, close));
    changed
}

fn push_entry<T>(
    entry: &DiffEntry<T>,
    depth: usize,
    out: &mut Vec<DisplayLine>,
    text: impl Fn(&T) -> String,
) {
    match entry {
        DiffEntry::Common { value } => {
            out.push(DisplayLine::new(LineKind::Unchanged, depth, text(value)));
        }
        DiffEntry::Added { value } => out.push(DisplayLine::new(LineKind::Added, depth, text(value))),
        DiffEntry::Removed { value } => {
            out.push(DisplayLine::new(LineKind::Removed, depth, text(value)));
        }
        DiffEntry::Updated { value, old } => {
            out.push(DisplayLine::new(LineKind::Removed, depth, text(old)));
            out.push(DisplayLine::new(LineKind::Added, depth, text(value)));
        }
    }
}

fn labelled(key: Option<&str>, text: &str) -> String {
    match key {
        Some(key) => format!("{key}: {text}"),
        None => text.to_string(),
    }
}

fn encode(value: &Value) -> String {
    value.to_string()
}
