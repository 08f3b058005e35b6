// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The original-to-clone dependency index.
//!
//! A clone layer aliases its original's native images instead of owning its
//! own. Teardown and texture replacement of the original must therefore
//! visit every dependent clone first, and this index makes that lookup
//! explicit instead of scanning the registry.
//!
//! The index tracks ids only; the layers themselves live in the
//! [`LayerRegistry`](crate::registry::LayerRegistry).

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::layer::LayerId;

/// Maps each original layer to the clones aliasing its images.
#[derive(Clone, Debug, Default)]
pub struct CloneIndex {
    deps: BTreeMap<LayerId, BTreeSet<LayerId>>,
}

impl CloneIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `clone` aliases the images of `original`.
    pub(crate) fn register(&mut self, original: LayerId, clone: LayerId) {
        self.deps.entry(original).or_default().insert(clone);
    }

    /// Removes one clone from its original's dependent set. Unknown pairs
    /// are ignored; empty sets are dropped.
    pub(crate) fn unregister(&mut self, original: LayerId, clone: LayerId) {
        if let Some(set) = self.deps.get_mut(&original) {
            set.remove(&clone);
            if set.is_empty() {
                self.deps.remove(&original);
            }
        }
    }

    /// Returns the clones currently aliasing `original`, in id order.
    #[must_use]
    pub fn dependents(&self, original: LayerId) -> Vec<LayerId> {
        self.deps
            .get(&original)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Removes and returns the full dependent set of `original`.
    ///
    /// Teardown uses this so the set cannot be observed half-destroyed.
    pub(crate) fn take_dependents(&mut self, original: LayerId) -> Vec<LayerId> {
        self.deps
            .remove(&original)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut index = CloneIndex::new();
        index.register(LayerId(1), LayerId(2));
        index.register(LayerId(1), LayerId(3));
        assert_eq!(index.dependents(LayerId(1)), [LayerId(2), LayerId(3)]);
        assert!(index.dependents(LayerId(2)).is_empty());
    }

    #[test]
    fn unregister_drops_empty_sets() {
        let mut index = CloneIndex::new();
        index.register(LayerId(1), LayerId(2));
        index.unregister(LayerId(1), LayerId(2));
        assert!(index.dependents(LayerId(1)).is_empty());
        // Unknown pairs are a no-op.
        index.unregister(LayerId(9), LayerId(10));
    }

    #[test]
    fn take_dependents_empties_the_entry() {
        let mut index = CloneIndex::new();
        index.register(LayerId(1), LayerId(2));
        index.register(LayerId(1), LayerId(3));

        let taken = index.take_dependents(LayerId(1));
        assert_eq!(taken, [LayerId(2), LayerId(3)]);
        assert!(index.dependents(LayerId(1)).is_empty());
        assert!(index.take_dependents(LayerId(1)).is_empty());
    }
}
