// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary traits for platform integrations.
//!
//! Parallax splits platform-specific work into two contracts:
//!
//! - **[`CompositorApi`]** — the native compositor that owns swap-chain
//!   images and performs presentation. The engine integration wraps the
//!   platform's layer API (one call per method, no state of its own).
//!
//! - **[`TextureCopier`]** — the engine's blit/material system, used by the
//!   per-frame synchronizer to move caller-texture content into swap-chain
//!   slots. A direct copy covers the format-matching fast path; the
//!   converting path runs an intermediate render pass that applies the
//!   color-space transform (and, for cubemaps, a per-face projection remap).
//!
//! Both traits are object-safe so test doubles and generic frame loops can
//! hold `&mut dyn` references.
//!
//! # Ownership
//!
//! Native image handles obtained through [`CompositorApi`] are owned by the
//! compositor (and, logically, by the single non-clone layer wrapping them).
//! This crate never frees them; it only asks the compositor to
//! [`destroy_layer`](CompositorApi::destroy_layer), which is idempotent.

use crate::error::{AllocationError, CopyError};
use crate::layer::{Eye, ImageHandle, LayerId, LayerParams, SurfaceHandle, TextureHandle};
use crate::shape::Shape;

/// The native compositor that allocates swap-chain images and presents
/// layers.
pub trait CompositorApi {
    /// Registers or updates a layer's static parameter block.
    ///
    /// Called exactly once per allocation. A compositor may reject the
    /// negotiated format with [`AllocationError::FormatUnsupported`], in
    /// which case the layer stays in `Allocating` and registration is
    /// retried next frame.
    fn request_layer_params(&mut self, params: &LayerParams) -> Result<(), AllocationError>;

    /// Returns how many buffered images the given eye of a layer has, or
    /// `None` if the query itself failed. `Some(0)` means the compositor has
    /// not produced images yet.
    fn image_count(&mut self, layer: LayerId, eye: Eye) -> Option<u32>;

    /// Returns the raw handle for one buffered image, or `None` for a null
    /// pointer.
    fn image_handle(&mut self, layer: LayerId, eye: Eye, index: u32) -> Option<ImageHandle>;

    /// Releases a layer's native swap chain. Idempotent; unknown ids are
    /// ignored.
    fn destroy_layer(&mut self, layer: LayerId);

    /// Returns the Android surface handle for an external-surface layer.
    ///
    /// This is the alternate acquisition path for video/DRM content; such
    /// layers never go through the per-frame copy.
    fn android_surface(&mut self, layer: LayerId, eye: Eye) -> Option<SurfaceHandle>;
}

/// The blit boundary used by the per-frame synchronizer.
pub trait TextureCopier {
    /// Copies one face of the source texture directly into the destination
    /// image. Only valid when source and destination formats already match.
    fn copy_face(&mut self, src: TextureHandle, dst: ImageHandle, face: u32)
    -> Result<(), CopyError>;

    /// Copies one face through an intermediate render pass that applies the
    /// color-space transform and, for [`Shape::Cubemap`], the per-face
    /// projection remap.
    fn convert_face(
        &mut self,
        src: TextureHandle,
        dst: ImageHandle,
        face: u32,
        shape: Shape,
    ) -> Result<(), CopyError>;
}
