//! Error types for the merge crate.

/// Errors that can occur while applying a diff.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MergeError {
    /// The target does not have the container shape the diff was computed
    /// against, so the diff cannot be applied structurally.
    #[error("patch target mismatch: expected {expected}, found {found}")]
    PatchTargetMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
