// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The depth-ordered collection of live layers.
//!
//! The registry owns every non-torn-down [`Layer`] and maintains the depth
//! order the frame loop iterates in. Ordering is computed lazily: mutations
//! only mark it dirty, and [`depth_order`](LayerRegistry::depth_order)
//! resorts on demand with a stable sort so layers at equal depth keep their
//! insertion order.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::layer::{Layer, LayerId};

/// All live layers, keyed by id, plus the cached depth order.
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    layers: BTreeMap<LayerId, Layer>,
    order: Vec<LayerId>,
    order_dirty: bool,
    next_id: u32,
}

impl LayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next process-unique id.
    ///
    /// Ids start at 1 and are never reused, even after the layer they named
    /// is torn down.
    pub(crate) fn allocate_id(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId(self.next_id)
    }

    /// Inserts a layer. Returns `false` (and leaves the registry untouched)
    /// if a layer with the same id is already present.
    pub(crate) fn insert(&mut self, layer: Layer) -> bool {
        let id = layer.id();
        if self.layers.contains_key(&id) {
            return false;
        }
        self.layers.insert(id, layer);
        self.order.push(id);
        self.order_dirty = true;
        true
    }

    /// Removes and returns a layer. Unknown ids return `None`.
    pub(crate) fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.layers.remove(&id)?;
        self.order.retain(|&entry| entry != id);
        Some(layer)
    }

    /// Returns a shared reference to a layer.
    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Returns a mutable reference to a layer.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    /// Returns whether the registry holds a layer with this id.
    #[must_use]
    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Returns the number of live layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Marks the cached depth order stale, e.g. after a depth change.
    pub(crate) fn mark_order_dirty(&mut self) {
        self.order_dirty = true;
    }

    /// Returns layer ids sorted by ascending depth.
    ///
    /// Resorts only when a mutation since the last call invalidated the
    /// cache. The sort is stable, so equal depths iterate in insertion order.
    pub fn depth_order(&mut self) -> &[LayerId] {
        if self.order_dirty {
            let layers = &self.layers;
            self.order
                .sort_by_key(|id| layers.get(id).map_or(i32::MAX, Layer::depth));
            self.order_dirty = false;
        }
        &self.order
    }
}
