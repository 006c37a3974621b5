//! Cursor-based application of leaf entries onto an ordered target.
//!
//! Shared by JSON arrays and text lines. Each entry consumes at most one
//! target element; the caller appends whatever the diff did not consume.

use nest_diff::DiffEntry;

/// Applies leaf entries onto `target`, tracking the target cursor.
pub(crate) struct SequenceMerge<'t, T> {
    target: &'t [T],
    cursor: usize,
    out: Vec<T>,
    conflict: bool,
}

impl<'t, T: Clone> SequenceMerge<'t, T> {
    pub(crate) fn new(target: &'t [T]) -> Self {
        Self {
            target,
            cursor: 0,
            out: Vec::with_capacity(target.len()),
            conflict: false,
        }
    }

    /// The target element under the cursor, if any remain.
    pub(crate) fn current(&self) -> Option<&'t T> {
        self.target.get(self.cursor)
    }

    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
    }

    pub(crate) fn push(&mut self, value: T) {
        self.out.push(value);
    }

    /// Apply one leaf entry.
    ///
    /// - `Common` keeps the target element, if present.
    /// - `Updated` takes the local value when the target still holds the old
    ///   one, keeps the target when it already matches, and otherwise keeps
    ///   both (target first) and flags a conflict.
    /// - `Added` inserts without consuming; `Removed` consumes without
    ///   inserting.
    pub(crate) fn entry(&mut self, entry: &DiffEntry<T>, eq: impl Fn(&T, &T) -> bool) {
        match entry {
            DiffEntry::Common { .. } => {
                if let Some(current) = self.current() {
                    self.out.push(current.clone());
                }
                self.advance();
            }
            DiffEntry::Updated { value, old } => {
                match self.current() {
                    Some(current) if eq(current, old) => self.out.push(value.clone()),
                    Some(current) if eq(current, value) => self.out.push(current.clone()),
                    Some(current) => {
                        self.out.push(current.clone());
                        self.out.push(value.clone());
                        self.conflict = true;
                    }
                    None => {
                        self.out.push(value.clone());
                        self.conflict = true;
                    }
                }
                self.advance();
            }
            DiffEntry::Added { value } => self.out.push(value.clone()),
            DiffEntry::Removed { .. } => self.advance(),
        }
    }

    /// Append the unconsumed tail of the target and return the result.
    pub(crate) fn finish(mut self) -> (Vec<T>, bool) {
        if let Some(rest) = self.target.get(self.cursor..) {
            self.out.extend_from_slice(rest);
        }
        (self.out, self.conflict)
    }
}
