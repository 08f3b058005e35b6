// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swap-chain wrapping and slot rotation.
//!
//! The compositor owns the native multi-image swap chain; this module wraps
//! the raw per-image handles into a [`SwapChain`] per eye and enforces the
//! rotation invariant: the write index is always in range, and advances only
//! when the frame loop decides the previously written slot has been handed
//! to the compositor.

use alloc::vec::Vec;

use crate::compositor::CompositorApi;
use crate::error::AllocationError;
use crate::layer::{ImageHandle, LayerParams, PerEye};

/// One eye's ordered list of native swap-chain images plus the index of the
/// currently writable slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapChain {
    slots: Vec<ImageHandle>,
    write_index: usize,
}

impl SwapChain {
    /// Wraps a non-empty list of image handles.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is empty; the allocator never produces an empty
    /// chain.
    #[must_use]
    pub fn new(slots: Vec<ImageHandle>) -> Self {
        assert!(!slots.is_empty(), "swap chain must have at least one slot");
        Self {
            slots,
            write_index: 0,
        }
    }

    /// Returns the number of buffered slots.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the index of the currently writable slot.
    #[inline]
    #[must_use]
    pub const fn write_index(&self) -> usize {
        self.write_index
    }

    /// Returns the currently writable image.
    #[inline]
    #[must_use]
    pub fn writable(&self) -> ImageHandle {
        self.slots[self.write_index]
    }

    /// Returns all slots in order.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[ImageHandle] {
        &self.slots
    }

    /// Advances the write index to the next slot, wrapping around.
    pub(crate) fn advance(&mut self) {
        self.write_index = (self.write_index + 1) % self.slots.len();
    }
}

/// Queries the compositor for every eye the layout needs and wraps the
/// returned handles.
///
/// Fails with [`AllocationError::InsufficientImages`] when an eye reports no
/// images (the compositor may simply not be ready yet) and
/// [`AllocationError::NullHandle`] when any returned pointer is null. On
/// failure nothing is wrapped; the caller retries next frame.
pub fn wrap_images(
    compositor: &mut dyn CompositorApi,
    params: &LayerParams,
) -> Result<PerEye<Option<SwapChain>>, AllocationError> {
    let mut chains = PerEye::new(None, None);
    for &eye in params.layout.eyes() {
        let count = compositor
            .image_count(params.id, eye)
            .filter(|&count| count >= 1)
            .ok_or(AllocationError::InsufficientImages { eye })?;

        let mut slots = Vec::with_capacity(count as usize);
        for index in 0..count {
            let handle = compositor
                .image_handle(params.id, eye, index)
                .ok_or(AllocationError::NullHandle { eye, index })?;
            slots.push(handle);
        }
        chains[eye] = Some(SwapChain::new(slots));
    }
    Ok(chains)
}
