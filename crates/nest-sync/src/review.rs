use async_trait::async_trait;
use nest_diff::{Diff, LineDiff};

use crate::error::SyncResult;

/// A merge result presented for confirmation before it is written.
///
/// Both diffs compare the merged value (actual) to the local file (base).
#[derive(Clone, Debug, PartialEq)]
pub struct Review {
    pub meta: Diff,
    pub ignore: LineDiff,
    pub conflict: bool,
}

impl Review {
    /// `true` if writing the merge would change a local file.
    pub fn is_modified(&self) -> bool {
        self.meta.is_modified() || self.ignore.is_modified()
    }
}

/// Decides whether a merge result is persisted.
#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn confirm(&self, review: &Review) -> SyncResult<bool>;
}

/// Accepts every review without prompting.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

#[async_trait]
impl Reviewer for AssumeYes {
    async fn confirm(&self, _review: &Review) -> SyncResult<bool> {
        Ok(true)
    }
}
