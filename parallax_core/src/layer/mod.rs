// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer data model.
//!
//! A *layer* is a single compositor-managed visual surface. Each layer has:
//!
//! - An identity ([`LayerId`]) — process-unique, never reused, so clone
//!   back-references can never alias a newer layer.
//! - A [`Shape`](crate::shape::Shape), a [`Kind`] (overlay/underlay), and a
//!   composition depth that orders it in the
//!   [`LayerRegistry`](crate::registry::LayerRegistry).
//! - A derived [`Layout`] — mono when both eye textures are identical or the
//!   right one is absent, stereo otherwise.
//! - Per-eye caller-owned [`SourceTexture`]s, per-eye
//!   [`SwapChain`](crate::swapchain::SwapChain)s of compositor-owned images,
//!   and per-eye [`TransformSnapshot`](crate::snapshot::TransformSnapshot)s.
//! - A lifecycle state (`Unallocated → Allocating → Active → TornDown`)
//!   driven by the [`CompositionContext`](crate::context::CompositionContext).
//!
//! Exactly one of two content modes is active per layer: caller-texture
//! driven (the per-frame copy step fills the swap chain) or external-surface
//! (an outside producer fills the images and the copy step never runs).

mod eye;
mod id;
mod params;

pub use eye::{Eye, PerEye};
pub use id::{ImageHandle, LayerId, SurfaceHandle, TextureHandle};
pub use params::{Kind, LayerFlags, LayerParams, Layout, SourceTexture, Surface3d};

use glam::Vec4;

use crate::shape::{Placement, Shape};
use crate::snapshot::{PlacementNode, TransformSnapshot};
use crate::swapchain::SwapChain;

/// Lifecycle state of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Created but no allocation attempted yet.
    Unallocated,
    /// Parameter block built; waiting for the compositor to produce images.
    Allocating,
    /// Swap chains wrapped; the layer participates in composition.
    Active,
    /// Terminal. Native images released and registry entry removed.
    TornDown,
}

/// Content sub-state of an [`LifecycleState::Active`] layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentState {
    /// No copy has landed yet; the compositor has nothing to show.
    Pending,
    /// Every eye required by the layout has received content.
    Copied,
}

/// A single compositor-managed visual surface.
///
/// Constructed by
/// [`CompositionContext::create_layer`](crate::context::CompositionContext::create_layer)
/// and mutated each frame by the synchronizer and snapshotter.
#[derive(Clone, Debug)]
pub struct Layer {
    pub(crate) params: LayerParams,
    pub(crate) placement: Placement,
    pub(crate) depth: i32,
    pub(crate) dynamic: bool,
    pub(crate) clone_of: Option<LayerId>,
    pub(crate) state: LifecycleState,

    pub(crate) sources: PerEye<Option<SourceTexture>>,
    pub(crate) chains: PerEye<Option<SwapChain>>,
    pub(crate) copied: PerEye<bool>,
    pub(crate) snapshots: PerEye<Option<TransformSnapshot>>,

    pub(crate) node: Option<PlacementNode>,
    pub(crate) surface: Option<SurfaceHandle>,

    pub(crate) color_scale: Vec4,
    pub(crate) color_offset: Vec4,
    pub(crate) color_override: bool,

    /// A successful dynamic copy happened this frame; the write slot rotates
    /// at the start of the next frame, once the compositor has consumed it.
    pub(crate) pending_rotate: bool,
    /// Whether the current parameter block has reached the compositor.
    pub(crate) params_registered: bool,
}

impl Layer {
    pub(crate) fn new(
        params: LayerParams,
        placement: Placement,
        depth: i32,
        dynamic: bool,
        sources: PerEye<Option<SourceTexture>>,
        clone_of: Option<LayerId>,
    ) -> Self {
        Self {
            params,
            placement,
            depth,
            dynamic,
            clone_of,
            state: LifecycleState::Unallocated,
            sources,
            chains: PerEye::new(None, None),
            copied: PerEye::new(false, false),
            snapshots: PerEye::new(None, None),
            node: None,
            surface: None,
            color_scale: Vec4::ONE,
            color_offset: Vec4::ZERO,
            color_override: false,
            pending_rotate: false,
            params_registered: false,
        }
    }

    /// Returns the layer's process-unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.params.id
    }

    /// Returns the projection shape. Immutable after creation.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.params.shape
    }

    /// Returns whether this is an overlay or underlay.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.params.kind
    }

    /// Returns the mono/stereo layout derived at creation.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.params.layout
    }

    /// Returns the shape placement parameters.
    #[inline]
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Returns the composition depth. Lower depths composite first.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> i32 {
        self.depth
    }

    /// Returns whether the layer copies its source every frame.
    #[inline]
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Returns the original layer's id if this layer is a clone.
    #[inline]
    #[must_use]
    pub const fn clone_of(&self) -> Option<LayerId> {
        self.clone_of
    }

    /// Returns whether the layer's images come from an external producer.
    #[inline]
    #[must_use]
    pub const fn is_external_surface(&self) -> bool {
        self.params.flags.android_surface
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the content sub-state for an `Active` layer.
    ///
    /// External-surface layers are always [`ContentState::Copied`]; their
    /// producer fills the images outside this crate.
    #[must_use]
    pub fn content_state(&self) -> ContentState {
        if self.is_external_surface() {
            return ContentState::Copied;
        }
        let all_copied = self
            .params
            .layout
            .eyes()
            .iter()
            .all(|&eye| self.copied[eye]);
        if all_copied {
            ContentState::Copied
        } else {
            ContentState::Pending
        }
    }

    /// Returns the static parameter block.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &LayerParams {
        &self.params
    }

    /// Returns the caller's source texture for an eye, if set.
    #[inline]
    #[must_use]
    pub fn source(&self, eye: Eye) -> Option<SourceTexture> {
        self.sources[eye]
    }

    /// Returns the wrapped swap chain for an eye, if allocated.
    #[inline]
    #[must_use]
    pub fn swap_chain(&self, eye: Eye) -> Option<&SwapChain> {
        self.chains[eye].as_ref()
    }

    /// Returns the latest transform snapshot for an eye.
    #[inline]
    #[must_use]
    pub fn snapshot(&self, eye: Eye) -> Option<&TransformSnapshot> {
        self.snapshots[eye].as_ref()
    }

    /// Returns the cached external surface handle, if any.
    #[inline]
    #[must_use]
    pub const fn external_surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    /// Sets the placement node snapshotted each frame.
    pub fn set_placement_node(&mut self, node: Option<PlacementNode>) {
        self.node = node;
    }

    /// Overrides the compositor's color scale and offset for this layer.
    pub fn set_color_scale_offset(&mut self, scale: Vec4, offset: Vec4) {
        self.color_scale = scale;
        self.color_offset = offset;
        self.color_override = true;
    }

    /// Returns the effective color scale (identity unless overridden).
    #[must_use]
    pub fn color_scale(&self) -> Vec4 {
        if self.color_override {
            self.color_scale
        } else {
            Vec4::ONE
        }
    }

    /// Returns the effective color offset (zero unless overridden).
    #[must_use]
    pub fn color_offset(&self) -> Vec4 {
        if self.color_override {
            self.color_offset
        } else {
            Vec4::ZERO
        }
    }

    /// Rotates each eye's write slot if the previous frame copied content.
    ///
    /// Rotation is deferred to the frame after the copy so the just-written
    /// slot stays untouched while the compositor consumes it.
    pub(crate) fn rotate_if_pending(&mut self) -> bool {
        if !self.pending_rotate {
            return false;
        }
        self.pending_rotate = false;
        for &eye in self.params.layout.eyes() {
            if let Some(chain) = &mut self.chains[eye] {
                chain.advance();
            }
        }
        true
    }

    /// Drops all wrapped image handles. Part of teardown; the cleared state
    /// makes any in-flight synchronizer call for this layer a no-op.
    pub(crate) fn clear_chains(&mut self) {
        self.chains = PerEye::new(None, None);
        self.copied = PerEye::new(false, false);
        self.pending_rotate = false;
    }
}
