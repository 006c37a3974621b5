//! The leaf comparison result shared by tree and line diffs.

use serde::{Deserialize, Serialize};

/// The outcome of comparing a single position on both sides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffEntry<T> {
    /// Identical on both sides.
    Common { value: T },
    /// Only present on the new (actual) side.
    Added { value: T },
    /// Only present on the old (base) side.
    Removed { value: T },
    /// Present on both sides with different values that could not be broken
    /// down any further.
    Updated { value: T, old: T },
}

impl<T> DiffEntry<T> {
    pub fn common(value: T) -> Self {
        Self::Common { value }
    }

    pub fn added(value: T) -> Self {
        Self::Added { value }
    }

    pub fn removed(value: T) -> Self {
        Self::Removed { value }
    }

    pub fn updated(value: T, old: T) -> Self {
        Self::Updated { value, old }
    }

    /// Returns `true` for [`DiffEntry::Common`].
    pub fn is_common(&self) -> bool {
        matches!(self, Self::Common { .. })
    }

    /// The value on the new side, if the position exists there.
    pub fn actual(&self) -> Option<&T> {
        match self {
            Self::Common { value } | Self::Added { value } | Self::Updated { value, .. } => {
                Some(value)
            }
            Self::Removed { .. } => None,
        }
    }

    /// The value on the old side, if the position exists there.
    pub fn base(&self) -> Option<&T> {
        match self {
            Self::Common { value } | Self::Removed { value } => Some(value),
            Self::Updated { old, .. } => Some(old),
            Self::Added { .. } => None,
        }
    }
}
