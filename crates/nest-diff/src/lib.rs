//! Structural diff engine for nest configuration.
//!
//! Computes edit descriptions between two versions of a JSON-like value or a
//! text, decides whether a description is a no-op, and renders it for review.
//! Everything here is pure and deterministic.
//!
//! # Key Types
//!
//! - [`Diff`] / [`DiffEntry`] -- Tree diff mirroring the compared values
//! - [`LineDiff`] -- Line-level text diff
//! - [`Step`] -- One position of an LCS alignment walk
//! - [`DisplayLine`] / [`LineKind`] -- Rendered review output

pub mod entry;
pub mod lcs;
pub mod line_diff;
pub mod render;
pub mod tree_diff;

pub use entry::DiffEntry;
pub use lcs::{align, lcs, Step};
pub use line_diff::{compare_lines, join_lines, split_lines, LineDiff};
pub use render::{render, render_lines, render_titled, DisplayLine, LineKind};
pub use tree_diff::{diff_values, values_equal, Diff};
