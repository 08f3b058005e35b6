// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle controller.
//!
//! [`CompositionContext`] owns the [`LayerRegistry`] and [`CloneIndex`] and
//! exposes the host-facing operations: layer and clone creation, texture
//! replacement, teardown, and the once-per-frame
//! [`on_frame_begin`](CompositionContext::on_frame_begin) step that drives
//! rotation, allocation retries, transform snapshots, and the content copy
//! for every live layer in depth order.
//!
//! All operations take the platform boundaries (`&mut dyn CompositorApi`,
//! `&mut dyn TextureCopier`) as arguments rather than storing them, so a
//! single context works with borrowed engine objects and with test doubles.

use alloc::vec::Vec;

use crate::clone::CloneIndex;
use crate::compositor::{CompositorApi, TextureCopier};
use crate::error::{AllocationError, ConfigurationError};
use crate::format::{self, ColorSpace, GraphicsBackend};
use crate::layer::{
    Eye, Kind, Layer, LayerFlags, LayerId, LayerParams, Layout, LifecycleState, PerEye,
    SourceTexture, Surface3d,
};
use crate::registry::LayerRegistry;
use crate::shape::{Placement, Shape};
use crate::snapshot::{EyeCamera, TransformSnapshot};
use crate::swapchain::{self, SwapChain};
use crate::sync::sync_frame;
use crate::trace::{
    AllocationCompleteEvent, AllocationDeferredEvent, LayerCreatedEvent, LayerRecreatedEvent,
    SlotRotatedEvent, TearDownEvent, Tracer,
};

/// External-surface layers always allocate at this fixed size; the producer
/// scales its content into the images.
const EXTERNAL_SURFACE_EXTENT: u32 = 1024;

/// Creation parameters for a regular layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerDesc {
    /// Projection shape.
    pub shape: Shape,
    /// Overlay or underlay composition.
    pub kind: Kind,
    /// Shape placement parameters. Must fit `shape`.
    pub placement: Placement,
    /// Composition depth. Lower composites first.
    pub depth: i32,
    /// Whether content is re-copied every frame.
    pub dynamic: bool,
    /// Left-eye source texture.
    pub left_texture: Option<SourceTexture>,
    /// Right-eye source texture. Absent (or identical to the left) means the
    /// layer is mono.
    pub right_texture: Option<SourceTexture>,
    /// Route content through an external Android surface producer instead of
    /// the per-frame copy.
    pub external_surface: bool,
    /// Stereo packing of external-surface content.
    pub surface_3d: Surface3d,
    /// Mark external-surface content as DRM protected.
    pub protected_content: bool,
}

impl Default for LayerDesc {
    fn default() -> Self {
        Self {
            shape: Shape::Quad,
            kind: Kind::Overlay,
            placement: Placement::Sized {
                width: 1.0,
                height: 1.0,
            },
            depth: 0,
            dynamic: true,
            left_texture: None,
            right_texture: None,
            external_surface: false,
            surface_3d: Surface3d::Single,
            protected_content: false,
        }
    }
}

/// Creation parameters for a clone layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloneDesc {
    /// The layer whose images the clone aliases.
    pub original: LayerId,
    /// Overlay or underlay composition. Independent of the original.
    pub kind: Kind,
    /// Shape placement parameters. Must fit the original's shape.
    pub placement: Placement,
    /// Composition depth. Independent of the original.
    pub depth: i32,
}

/// The top-level controller tying the registry, clone index, and per-frame
/// machinery together.
#[derive(Debug)]
pub struct CompositionContext {
    registry: LayerRegistry,
    clones: CloneIndex,
    color_space: ColorSpace,
    backend: GraphicsBackend,
    frame_index: u64,
}

impl CompositionContext {
    /// Creates a context for the given color space and graphics backend.
    ///
    /// Both are fixed for the context's lifetime; they determine the pixel
    /// format every layer negotiates.
    #[must_use]
    pub fn new(color_space: ColorSpace, backend: GraphicsBackend) -> Self {
        Self {
            registry: LayerRegistry::new(),
            clones: CloneIndex::new(),
            color_space,
            backend,
            frame_index: 0,
        }
    }

    /// Returns the number of frames [`on_frame_begin`] has completed.
    ///
    /// [`on_frame_begin`]: Self::on_frame_begin
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns a shared reference to a live layer.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.registry.get(id)
    }

    /// Returns a mutable reference to a live layer, e.g. to set its
    /// placement node or color scale/offset.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.registry.get_mut(id)
    }

    /// Returns the number of live layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the clone dependency index.
    #[must_use]
    pub const fn clones(&self) -> &CloneIndex {
        &self.clones
    }

    /// Creates a layer and attempts its allocation immediately.
    ///
    /// On success the layer is in the registry; it is `Active` if the
    /// compositor produced images right away and `Allocating` otherwise, in
    /// which case [`on_frame_begin`](Self::on_frame_begin) retries each
    /// frame. Fails only on caller misconfiguration; allocation trouble is
    /// never an error here.
    pub fn create_layer(
        &mut self,
        compositor: &mut dyn CompositorApi,
        desc: &LayerDesc,
        tracer: &mut Tracer<'_>,
    ) -> Result<LayerId, ConfigurationError> {
        if !desc.placement.fits(desc.shape) {
            return Err(ConfigurationError::ShapeMismatch { shape: desc.shape });
        }

        let id = self.registry.allocate_id();
        let format = format::select(self.color_space, self.backend);

        let mut layer = if desc.external_surface {
            let params = LayerParams {
                id,
                shape: desc.shape,
                kind: desc.kind,
                layout: Layout::Mono,
                format,
                width: EXTERNAL_SURFACE_EXTENT,
                height: EXTERNAL_SURFACE_EXTENT,
                sample_count: 1,
                face_count: desc.shape.face_count(),
                array_size: 1,
                mip_count: 1,
                flags: LayerFlags {
                    static_image: false,
                    shared_images: false,
                    android_surface: true,
                    protected_content: desc.protected_content,
                    surface_3d: desc.surface_3d,
                },
                shared_source: None,
            };
            Layer::new(
                params,
                desc.placement,
                desc.depth,
                desc.dynamic,
                PerEye::new(None, None),
                None,
            )
        } else {
            // A missing left texture falls back to the right one so mono
            // callers can populate either slot.
            let left = desc.left_texture.or(desc.right_texture);
            let right = desc.right_texture;
            let layout = Layout::derive(
                left.map(|texture| texture.handle),
                right.map(|texture| texture.handle),
            );
            let (width, height) = left.map_or((0, 0), |texture| (texture.width, texture.height));
            let params = LayerParams {
                id,
                shape: desc.shape,
                kind: desc.kind,
                layout,
                format,
                width,
                height,
                sample_count: 1,
                face_count: desc.shape.face_count(),
                array_size: 1,
                mip_count: 1,
                flags: LayerFlags {
                    static_image: !desc.dynamic,
                    ..LayerFlags::default()
                },
                shared_source: None,
            };
            Layer::new(
                params,
                desc.placement,
                desc.depth,
                desc.dynamic,
                PerEye::new(left, right),
                None,
            )
        };

        tracer.layer_created(&LayerCreatedEvent { id, clone_of: None });
        try_allocate(&mut layer, compositor, tracer);
        self.registry.insert(layer);
        Ok(id)
    }

    /// Creates a clone layer aliasing an existing layer's images.
    ///
    /// The clone inherits the original's shape, layout, format, and size;
    /// only kind, placement, and depth are its own. It never copies content
    /// itself.
    pub fn create_clone(
        &mut self,
        compositor: &mut dyn CompositorApi,
        desc: &CloneDesc,
        tracer: &mut Tracer<'_>,
    ) -> Result<LayerId, ConfigurationError> {
        let original = self
            .registry
            .get(desc.original)
            .ok_or(ConfigurationError::MissingOriginal)?;
        let original_params = *original.params();
        let original_dynamic = original.is_dynamic();
        if !desc.placement.fits(original_params.shape) {
            return Err(ConfigurationError::ShapeMismatch {
                shape: original_params.shape,
            });
        }

        let id = self.registry.allocate_id();
        let params = LayerParams {
            id,
            kind: desc.kind,
            flags: LayerFlags {
                shared_images: true,
                ..original_params.flags
            },
            shared_source: Some(desc.original),
            ..original_params
        };
        let mut layer = Layer::new(
            params,
            desc.placement,
            desc.depth,
            original_dynamic,
            PerEye::new(None, None),
            Some(desc.original),
        );

        tracer.layer_created(&LayerCreatedEvent {
            id,
            clone_of: Some(desc.original),
        });
        try_allocate(&mut layer, compositor, tracer);
        self.registry.insert(layer);
        self.clones.register(desc.original, id);
        Ok(id)
    }

    /// Tears down a layer and every clone depending on it.
    ///
    /// Clones go first so no layer ever aliases freed images. Idempotent:
    /// unknown (already destroyed) ids are a no-op.
    pub fn destroy_layer(
        &mut self,
        compositor: &mut dyn CompositorApi,
        id: LayerId,
        tracer: &mut Tracer<'_>,
    ) {
        if !self.registry.contains(id) {
            return;
        }
        for clone_id in self.clones.take_dependents(id) {
            self.tear_down_one(compositor, clone_id, true, tracer);
        }
        self.tear_down_one(compositor, id, false, tracer);
    }

    fn tear_down_one(
        &mut self,
        compositor: &mut dyn CompositorApi,
        id: LayerId,
        cascaded: bool,
        tracer: &mut Tracer<'_>,
    ) {
        let Some(mut layer) = self.registry.remove(id) else {
            return;
        };
        // Wrapped handles go first so an in-flight copy for this layer
        // degrades to a skip rather than a write into freed images.
        layer.clear_chains();
        layer.state = LifecycleState::TornDown;
        compositor.destroy_layer(id);
        if let Some(original) = layer.clone_of() {
            self.clones.unregister(original, id);
        }
        tracer.tear_down(&TearDownEvent { id, cascaded });
    }

    /// Replaces a layer's source textures, rebuilding its swap chain under
    /// the same id.
    ///
    /// The old native images are destroyed and a fresh allocation is
    /// negotiated from the new textures' size and layout; `dynamic` sets the
    /// replacement's copy cadence. Dependent clones are destroyed before the
    /// original's images are released and re-allocated against the new ones
    /// afterwards, so no clone ever aliases freed images. External and clone
    /// layers have no caller textures; for them this is a no-op.
    pub fn replace_source_texture(
        &mut self,
        compositor: &mut dyn CompositorApi,
        id: LayerId,
        left: SourceTexture,
        right: Option<SourceTexture>,
        dynamic: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), ConfigurationError> {
        {
            let layer = self
                .registry
                .get(id)
                .ok_or(ConfigurationError::UnknownLayer)?;
            if layer.is_external_surface() || layer.clone_of().is_some() {
                return Ok(());
            }
        }

        // Clones go first, same order as teardown.
        let dependents = self.clones.dependents(id);
        for &clone_id in &dependents {
            if let Some(clone) = self.registry.get_mut(clone_id) {
                clone.clear_chains();
                clone.state = LifecycleState::Allocating;
                clone.params_registered = false;
                compositor.destroy_layer(clone_id);
            }
        }

        let layer = self
            .registry
            .get_mut(id)
            .ok_or(ConfigurationError::UnknownLayer)?;
        layer.clear_chains();
        layer.snapshots = PerEye::new(None, None);
        compositor.destroy_layer(id);

        let layout = Layout::derive(Some(left.handle), right.map(|texture| texture.handle));
        layer.sources = PerEye::new(Some(left), right);
        layer.dynamic = dynamic;
        layer.params.layout = layout;
        layer.params.width = left.width;
        layer.params.height = left.height;
        layer.params.flags.static_image = !dynamic;
        layer.state = LifecycleState::Allocating;
        layer.params_registered = false;
        try_allocate(layer, compositor, tracer);
        let new_params = *layer.params();

        // Now that the original owns fresh images, rebuild each clone
        // against the replacement allocation.
        for &clone_id in &dependents {
            if let Some(clone) = self.registry.get_mut(clone_id) {
                clone.dynamic = dynamic;
                clone.params.layout = new_params.layout;
                clone.params.width = new_params.width;
                clone.params.height = new_params.height;
                clone.params.flags.static_image = !dynamic;
                try_allocate(clone, compositor, tracer);
            }
        }
        tracer.layer_recreated(&LayerRecreatedEvent {
            id,
            clones_recreated: dependents.len(),
        });
        Ok(())
    }

    /// Changes a layer's placement parameters.
    pub fn set_placement(
        &mut self,
        id: LayerId,
        placement: Placement,
    ) -> Result<(), ConfigurationError> {
        let layer = self
            .registry
            .get_mut(id)
            .ok_or(ConfigurationError::UnknownLayer)?;
        if !placement.fits(layer.shape()) {
            return Err(ConfigurationError::ShapeMismatch {
                shape: layer.shape(),
            });
        }
        layer.placement = placement;
        Ok(())
    }

    /// Changes a layer's composition depth and invalidates the depth order.
    pub fn set_depth(&mut self, id: LayerId, depth: i32) -> Result<(), ConfigurationError> {
        let layer = self
            .registry
            .get_mut(id)
            .ok_or(ConfigurationError::UnknownLayer)?;
        layer.depth = depth;
        self.registry.mark_order_dirty();
        Ok(())
    }

    /// Runs the per-frame step for every live layer in depth order.
    ///
    /// Per layer, in order: rotate the write slot if the previous frame's
    /// copy succeeded, retry a pending allocation, capture per-eye transform
    /// snapshots, and synchronize content. The snapshot step is skipped
    /// entirely unless both eye cameras are present; an inactive placement
    /// node skips it as well.
    pub fn on_frame_begin(
        &mut self,
        compositor: &mut dyn CompositorApi,
        copier: &mut dyn TextureCopier,
        cameras: &PerEye<Option<EyeCamera>>,
        tracer: &mut Tracer<'_>,
    ) {
        let order: Vec<LayerId> = self.registry.depth_order().to_vec();
        for id in order {
            let Some(layer) = self.registry.get_mut(id) else {
                continue;
            };

            if layer.rotate_if_pending() {
                tracer.slot_rotated(&SlotRotatedEvent { id });
            }

            if matches!(
                layer.state(),
                LifecycleState::Unallocated | LifecycleState::Allocating
            ) {
                try_allocate(layer, compositor, tracer);
            }

            if let Some(node) = layer.node {
                if cameras[Eye::Left].is_some() && cameras[Eye::Right].is_some() {
                    for eye in Eye::BOTH {
                        if let Some(camera) = &cameras[eye] {
                            if let Some(snapshot) = TransformSnapshot::capture(&node, camera) {
                                layer.snapshots[eye] = Some(snapshot);
                            }
                        }
                    }
                }
            }

            sync_frame(layer, copier, self.color_space, tracer);
        }
        self.frame_index += 1;
    }
}

/// Drives one layer as far through allocation as the compositor allows.
///
/// Registration and image wrapping each either succeed or leave the layer in
/// `Allocating` for a retry on the next frame. External-surface layers fetch
/// their producer surface instead of wrapping images.
fn try_allocate(layer: &mut Layer, compositor: &mut dyn CompositorApi, tracer: &mut Tracer<'_>) {
    let id = layer.id();
    if !layer.params_registered {
        if let Err(error) = compositor.request_layer_params(layer.params()) {
            layer.state = LifecycleState::Allocating;
            tracer.allocation_deferred(&AllocationDeferredEvent { id, error });
            return;
        }
        layer.params_registered = true;
    }

    if layer.is_external_surface() {
        match compositor.android_surface(id, Eye::Left) {
            Some(surface) => {
                layer.surface = Some(surface);
                layer.state = LifecycleState::Active;
                tracer.allocation_complete(&AllocationCompleteEvent { id, slot_count: 0 });
            }
            None => {
                layer.state = LifecycleState::Allocating;
                tracer.allocation_deferred(&AllocationDeferredEvent {
                    id,
                    error: AllocationError::SurfaceUnavailable,
                });
            }
        }
        return;
    }

    match swapchain::wrap_images(compositor, layer.params()) {
        Ok(chains) => {
            let slot_count = chains[Eye::Left].as_ref().map_or(0, SwapChain::slot_count);
            layer.chains = chains;
            layer.state = LifecycleState::Active;
            tracer.allocation_complete(&AllocationCompleteEvent { id, slot_count });
        }
        Err(error) => {
            layer.state = LifecycleState::Allocating;
            tracer.allocation_deferred(&AllocationDeferredEvent { id, error });
        }
    }
}
