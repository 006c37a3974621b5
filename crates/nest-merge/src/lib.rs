//! Merge engine for nest configuration.
//!
//! Re-applies a diff computed between a local edit and the last-synced
//! snapshot onto a freshly fetched remote value. Positions where the remote
//! moved to a third value are kept twice instead of being guessed, and the
//! result carries a conflict flag so the caller can warn before writing.
//!
//! Object fields holding scalars are not checked for conflicts: the local
//! edit always wins there. Only array elements and text lines detect them.

pub mod error;
pub mod line_merge;
mod sequence;
pub mod tree_merge;

pub use error::{MergeError, MergeResult};
pub use line_merge::apply_lines;
pub use tree_merge::apply;

/// The outcome of applying a diff to a third value.
#[derive(Clone, Debug, PartialEq)]
pub struct Merged<T> {
    /// The merged value.
    pub value: T,
    /// `true` if at least one position kept both sides.
    pub conflict: bool,
}
