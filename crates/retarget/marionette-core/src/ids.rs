//! Identifiers for skeleton-owned entities.

use serde::{Deserialize, Serialize};

/// Dense index of a bone inside its owning skeleton.
/// Only meaningful together with the skeleton that produced it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        BoneId(index as u32)
    }
}
