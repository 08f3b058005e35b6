// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted platform doubles and frame metrics for integration tests.
//!
//! [`ScriptedCompositor`] and [`RecordingCopier`] implement the
//! `parallax_core` boundary traits with fully deterministic behavior and
//! failure injection, so lifecycle scenarios can be driven end to end without
//! a real compositor. [`EventLog`] records every trace event for ordering
//! assertions, and [`FrameStats`] keeps a rolling per-frame copy history with
//! an ASCII sparkline for demo HUDs.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use parallax_core::compositor::{CompositorApi, TextureCopier};
use parallax_core::error::{AllocationError, CopyError};
use parallax_core::layer::{
    Eye, ImageHandle, LayerId, LayerParams, SurfaceHandle, TextureHandle,
};
use parallax_core::shape::Shape;
use parallax_core::trace::{
    AllocationCompleteEvent, AllocationDeferredEvent, CopyEvent, CopySkippedEvent,
    LayerCreatedEvent, LayerRecreatedEvent, SlotRotatedEvent, TearDownEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// ScriptedCompositor
// ---------------------------------------------------------------------------

/// A deterministic [`CompositorApi`] double.
///
/// Image handles are a pure function of layer id, eye, and slot index, so a
/// clone registered with a `shared_source` receives exactly its original's
/// handles. Failure injection covers the three allocation deferral paths:
/// format rejection, image starvation, and null handles.
#[derive(Debug)]
pub struct ScriptedCompositor {
    image_count: u32,
    images_ready: bool,
    surface_ready: bool,
    null_handles: bool,
    reject_params: u32,
    aliases: BTreeMap<LayerId, LayerId>,
    /// Every parameter block received, in call order.
    pub params_log: Vec<LayerParams>,
    /// Every destroyed layer id, in call order.
    pub destroyed: Vec<LayerId>,
}

impl Default for ScriptedCompositor {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ScriptedCompositor {
    /// Creates a compositor serving `image_count` buffered images per eye.
    #[must_use]
    pub fn new(image_count: u32) -> Self {
        Self {
            image_count,
            images_ready: true,
            surface_ready: true,
            null_handles: false,
            reject_params: 0,
            aliases: BTreeMap::new(),
            params_log: Vec::new(),
            destroyed: Vec::new(),
        }
    }

    /// While `false`, image-count queries report zero buffered images.
    pub fn set_images_ready(&mut self, ready: bool) {
        self.images_ready = ready;
    }

    /// While `false`, external-surface queries report no surface.
    pub fn set_surface_ready(&mut self, ready: bool) {
        self.surface_ready = ready;
    }

    /// While `true`, every image-handle query returns a null pointer.
    pub fn set_null_handles(&mut self, null: bool) {
        self.null_handles = null;
    }

    /// Rejects the next `count` parameter registrations with
    /// [`AllocationError::FormatUnsupported`].
    pub fn reject_next_params(&mut self, count: u32) {
        self.reject_params = count;
    }

    /// The handle this compositor serves for a given layer, eye, and slot.
    ///
    /// Exposed so tests can assert that a copy landed in a specific slot.
    #[must_use]
    pub fn handle_for(layer: LayerId, eye: Eye, index: u32) -> ImageHandle {
        let base = (u64::from(layer.raw()) << 16) | (u64::from(eye as u32) << 8);
        ImageHandle(base | (u64::from(index) + 1))
    }

    fn effective_id(&self, layer: LayerId) -> LayerId {
        self.aliases.get(&layer).copied().unwrap_or(layer)
    }
}

impl CompositorApi for ScriptedCompositor {
    fn request_layer_params(&mut self, params: &LayerParams) -> Result<(), AllocationError> {
        if self.reject_params > 0 {
            self.reject_params -= 1;
            return Err(AllocationError::FormatUnsupported);
        }
        if let Some(original) = params.shared_source {
            self.aliases.insert(params.id, original);
        }
        self.params_log.push(*params);
        Ok(())
    }

    fn image_count(&mut self, _layer: LayerId, _eye: Eye) -> Option<u32> {
        Some(if self.images_ready { self.image_count } else { 0 })
    }

    fn image_handle(&mut self, layer: LayerId, eye: Eye, index: u32) -> Option<ImageHandle> {
        if self.null_handles {
            return None;
        }
        Some(Self::handle_for(self.effective_id(layer), eye, index))
    }

    fn destroy_layer(&mut self, layer: LayerId) {
        self.destroyed.push(layer);
    }

    fn android_surface(&mut self, layer: LayerId, _eye: Eye) -> Option<SurfaceHandle> {
        self.surface_ready
            .then(|| SurfaceHandle(0xface_0000 | u64::from(layer.raw())))
    }
}

// ---------------------------------------------------------------------------
// RecordingCopier
// ---------------------------------------------------------------------------

/// One recorded copy operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyRecord {
    /// Source texture.
    pub src: TextureHandle,
    /// Destination swap-chain image.
    pub dst: ImageHandle,
    /// Face index.
    pub face: u32,
    /// `true` when the converting path was taken.
    pub converted: bool,
}

/// A [`TextureCopier`] double that records every operation.
#[derive(Debug, Default)]
pub struct RecordingCopier {
    /// All recorded operations, in call order.
    pub records: Vec<CopyRecord>,
    /// While `true`, every operation fails with
    /// [`CopyError::NullDestinationSlot`].
    pub fail: bool,
}

impl RecordingCopier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the destination images written so far, in order.
    #[must_use]
    pub fn destinations(&self) -> Vec<ImageHandle> {
        self.records.iter().map(|record| record.dst).collect()
    }
}

impl TextureCopier for RecordingCopier {
    fn copy_face(
        &mut self,
        src: TextureHandle,
        dst: ImageHandle,
        face: u32,
    ) -> Result<(), CopyError> {
        if self.fail {
            return Err(CopyError::NullDestinationSlot);
        }
        self.records.push(CopyRecord {
            src,
            dst,
            face,
            converted: false,
        });
        Ok(())
    }

    fn convert_face(
        &mut self,
        src: TextureHandle,
        dst: ImageHandle,
        face: u32,
        _shape: Shape,
    ) -> Result<(), CopyError> {
        if self.fail {
            return Err(CopyError::NullDestinationSlot);
        }
        self.records.push(CopyRecord {
            src,
            dst,
            face,
            converted: true,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// A flattened trace event, suitable for ordering assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggedEvent {
    /// A layer entered the registry.
    Created {
        /// The new layer.
        id: LayerId,
        /// Its original, when it is a clone.
        clone_of: Option<LayerId>,
    },
    /// Allocation completed and the layer became active.
    AllocationComplete {
        /// The layer.
        id: LayerId,
    },
    /// Allocation was deferred for a retry.
    AllocationDeferred {
        /// The layer.
        id: LayerId,
        /// Why.
        error: AllocationError,
    },
    /// One eye's content copy succeeded.
    Copy {
        /// The layer.
        id: LayerId,
        /// The eye.
        eye: Eye,
    },
    /// One eye's content copy was skipped.
    CopySkipped {
        /// The layer.
        id: LayerId,
        /// The eye.
        eye: Eye,
        /// Why.
        error: CopyError,
    },
    /// Write slots rotated at the start of a frame.
    SlotRotated {
        /// The layer.
        id: LayerId,
    },
    /// A layer was torn down.
    TearDown {
        /// The layer.
        id: LayerId,
        /// Whether its original's teardown cascaded into it.
        cascaded: bool,
    },
    /// A texture replacement rebuilt a layer under the same id.
    Recreated {
        /// The layer.
        id: LayerId,
    },
}

/// A [`TraceSink`] that appends every event to a vector.
#[derive(Debug, Default)]
pub struct EventLog {
    /// All events, in emission order.
    pub events: Vec<LoggedEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the teardown events in emission order.
    #[must_use]
    pub fn teardowns(&self) -> Vec<LayerId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                LoggedEvent::TearDown { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl TraceSink for EventLog {
    fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
        self.events.push(LoggedEvent::Created {
            id: e.id,
            clone_of: e.clone_of,
        });
    }

    fn on_allocation_complete(&mut self, e: &AllocationCompleteEvent) {
        self.events.push(LoggedEvent::AllocationComplete { id: e.id });
    }

    fn on_allocation_deferred(&mut self, e: &AllocationDeferredEvent) {
        self.events.push(LoggedEvent::AllocationDeferred {
            id: e.id,
            error: e.error,
        });
    }

    fn on_copy(&mut self, e: &CopyEvent) {
        self.events.push(LoggedEvent::Copy {
            id: e.id,
            eye: e.eye,
        });
    }

    fn on_copy_skipped(&mut self, e: &CopySkippedEvent) {
        self.events.push(LoggedEvent::CopySkipped {
            id: e.id,
            eye: e.eye,
            error: e.error,
        });
    }

    fn on_slot_rotated(&mut self, e: &SlotRotatedEvent) {
        self.events.push(LoggedEvent::SlotRotated { id: e.id });
    }

    fn on_tear_down(&mut self, e: &TearDownEvent) {
        self.events.push(LoggedEvent::TearDown {
            id: e.id,
            cascaded: e.cascaded,
        });
    }

    fn on_layer_recreated(&mut self, e: &LayerRecreatedEvent) {
        self.events.push(LoggedEvent::Recreated { id: e.id });
    }
}

// ---------------------------------------------------------------------------
// FrameStats
// ---------------------------------------------------------------------------

/// One frame's copy activity fed into [`FrameStats::observe`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSample {
    /// Successful per-eye copies this frame.
    pub copies: u32,
    /// Skipped per-eye copies this frame.
    pub skips: u32,
}

/// Aggregated report returned by [`FrameStats::observe`].
#[derive(Clone, Copy, Debug)]
pub struct StatsReport {
    /// Skips per 1000 attempted copies.
    pub skip_rate_per_1000: f64,
    /// Total frames observed.
    pub total_frames: u64,
    /// Total skipped copies.
    pub total_skips: u64,
}

/// Rolling per-frame copy tracker with fixed-size history.
#[derive(Debug)]
pub struct FrameStats<const N: usize> {
    copies: [u32; N],
    cursor: usize,
    total_frames: u64,
    total_copies: u64,
    total_skips: u64,
}

impl<const N: usize> Default for FrameStats<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameStats<N> {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            copies: [0; N],
            cursor: 0,
            total_frames: 0,
            total_copies: 0,
            total_skips: 0,
        }
    }

    /// Observes one frame and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, sample: FrameSample) -> StatsReport {
        self.total_frames = self.total_frames.saturating_add(1);
        self.total_copies = self.total_copies.saturating_add(u64::from(sample.copies));
        self.total_skips = self.total_skips.saturating_add(u64::from(sample.skips));
        self.copies[self.cursor % N] = sample.copies;
        self.cursor = (self.cursor + 1) % N;

        let attempted = self.total_copies + self.total_skips;
        let skip_rate = if attempted == 0 {
            0.0
        } else {
            self.total_skips as f64 * 1000.0 / attempted as f64
        };
        StatsReport {
            skip_rate_per_1000: skip_rate,
            total_frames: self.total_frames,
            total_skips: self.total_skips,
        }
    }

    /// Returns the copy history oldest→newest.
    #[must_use]
    pub fn copy_history(&self) -> [u32; N] {
        let mut out = [0; N];
        let mut i = 0;
        while i < N {
            out[i] = self.copies[(self.cursor + i) % N];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline over `copy_history()`, scaled to `max`.
    #[must_use]
    pub fn sparkline_ascii(&self, max: u32) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let v = self.copies[(self.cursor + i) % N].min(max);
            let t = f64::from(v) / f64::from(max.max(1));
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use parallax_core::context::{CloneDesc, CompositionContext, LayerDesc};
    use parallax_core::format::{ColorSpace, GraphicsBackend, TextureFormat};
    use parallax_core::layer::{
        ContentState, Kind, LifecycleState, PerEye, SourceTexture, TextureHandle,
    };
    use parallax_core::shape::Placement;
    use parallax_core::snapshot::EyeCamera;
    use parallax_core::trace::Tracer;

    use super::*;

    fn texture(handle: u64, width: u32, height: u32) -> SourceTexture {
        SourceTexture {
            handle: TextureHandle(handle),
            width,
            height,
            format: TextureFormat::VkRgba8Unorm,
        }
    }

    fn stereo_desc() -> LayerDesc {
        LayerDesc {
            left_texture: Some(texture(0xa, 256, 256)),
            right_texture: Some(texture(0xb, 256, 256)),
            ..LayerDesc::default()
        }
    }

    fn quad_placement() -> Placement {
        Placement::Sized {
            width: 1.0,
            height: 1.0,
        }
    }

    fn no_cameras() -> PerEye<Option<EyeCamera>> {
        PerEye::new(None, None)
    }

    #[test]
    fn dynamic_layer_round_robins_write_slots() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(3);
        let mut copier = RecordingCopier::new();
        let mut log = EventLog::new();

        let id = {
            let mut tracer = Tracer::new(&mut log);
            let id = ctx
                .create_layer(&mut compositor, &stereo_desc(), &mut tracer)
                .unwrap();
            for _ in 0..4 {
                ctx.on_frame_begin(&mut compositor, &mut copier, &no_cameras(), &mut tracer);
            }
            id
        };

        // Left-eye destinations cycle through all three slots and wrap.
        let left_dsts: Vec<_> = copier
            .records
            .iter()
            .filter(|record| record.src == TextureHandle(0xa))
            .map(|record| record.dst)
            .collect();
        let slot = |index| ScriptedCompositor::handle_for(id, Eye::Left, index);
        assert_eq!(left_dsts, [slot(0), slot(1), slot(2), slot(0)]);

        // Rotation events start on the second frame.
        let rotations = log
            .events
            .iter()
            .filter(|event| matches!(event, LoggedEvent::SlotRotated { .. }))
            .count();
        assert_eq!(rotations, 3);
    }

    #[test]
    fn static_layer_copies_once_and_never_rotates() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(3);
        let mut copier = RecordingCopier::new();
        let mut tracer = Tracer::none();

        let desc = LayerDesc {
            dynamic: false,
            ..stereo_desc()
        };
        let id = ctx
            .create_layer(&mut compositor, &desc, &mut tracer)
            .unwrap();
        for _ in 0..3 {
            ctx.on_frame_begin(&mut compositor, &mut copier, &no_cameras(), &mut tracer);
        }

        assert_eq!(copier.records.len(), 2, "one copy per eye, ever");
        assert_eq!(
            ctx.layer(id).unwrap().content_state(),
            ContentState::Copied
        );
        assert_eq!(
            ctx.layer(id).unwrap().swap_chain(Eye::Left).unwrap().write_index(),
            0
        );
    }

    #[test]
    fn linear_color_space_records_converted_copies() {
        let mut ctx = CompositionContext::new(ColorSpace::Linear, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(2);
        let mut copier = RecordingCopier::new();
        let mut tracer = Tracer::none();

        ctx.create_layer(&mut compositor, &stereo_desc(), &mut tracer)
            .unwrap();
        ctx.on_frame_begin(&mut compositor, &mut copier, &no_cameras(), &mut tracer);

        assert_eq!(copier.records.len(), 2);
        assert!(copier.records.iter().all(|record| record.converted));
    }

    #[test]
    fn format_rejection_defers_and_reregisters() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(3);
        let mut copier = RecordingCopier::new();
        let mut log = EventLog::new();
        compositor.reject_next_params(1);

        let mut tracer = Tracer::new(&mut log);
        let id = ctx
            .create_layer(&mut compositor, &stereo_desc(), &mut tracer)
            .unwrap();
        assert_eq!(ctx.layer(id).unwrap().state(), LifecycleState::Allocating);
        assert!(compositor.params_log.is_empty());

        ctx.on_frame_begin(&mut compositor, &mut copier, &no_cameras(), &mut tracer);
        drop(tracer);

        assert_eq!(ctx.layer(id).unwrap().state(), LifecycleState::Active);
        assert_eq!(compositor.params_log.len(), 1);
        assert!(log.events.contains(&LoggedEvent::AllocationDeferred {
            id,
            error: AllocationError::FormatUnsupported,
        }));
    }

    #[test]
    fn null_handles_defer_until_the_compositor_recovers() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(3);
        let mut copier = RecordingCopier::new();
        let mut tracer = Tracer::none();
        compositor.set_null_handles(true);

        let id = ctx
            .create_layer(&mut compositor, &stereo_desc(), &mut tracer)
            .unwrap();
        assert_eq!(ctx.layer(id).unwrap().state(), LifecycleState::Allocating);

        compositor.set_null_handles(false);
        ctx.on_frame_begin(&mut compositor, &mut copier, &no_cameras(), &mut tracer);
        assert_eq!(ctx.layer(id).unwrap().state(), LifecycleState::Active);
    }

    #[test]
    fn clone_serves_its_originals_images_and_cascades_on_teardown() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(2);
        let mut log = EventLog::new();

        let (original, clone) = {
            let mut tracer = Tracer::new(&mut log);
            let original = ctx
                .create_layer(&mut compositor, &stereo_desc(), &mut tracer)
                .unwrap();
            let clone = ctx
                .create_clone(
                    &mut compositor,
                    &CloneDesc {
                        original,
                        kind: Kind::Underlay,
                        placement: quad_placement(),
                        depth: 3,
                    },
                    &mut tracer,
                )
                .unwrap();
            (original, clone)
        };

        // The clone's chain holds the original's image handles.
        let clone_layer = ctx.layer(clone).unwrap();
        assert_eq!(
            clone_layer.swap_chain(Eye::Left).unwrap().slots()[0],
            ScriptedCompositor::handle_for(original, Eye::Left, 0)
        );

        let mut tracer = Tracer::new(&mut log);
        ctx.destroy_layer(&mut compositor, original, &mut tracer);
        drop(tracer);

        assert_eq!(log.teardowns(), [clone, original]);
        assert_eq!(compositor.destroyed, [clone, original]);
        assert_eq!(ctx.layer_count(), 0);
    }

    #[test]
    fn texture_replacement_recreates_clones_under_the_same_ids() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(2);
        let mut tracer = Tracer::none();

        let original = ctx
            .create_layer(&mut compositor, &stereo_desc(), &mut tracer)
            .unwrap();
        let clone = ctx
            .create_clone(
                &mut compositor,
                &CloneDesc {
                    original,
                    kind: Kind::Overlay,
                    placement: quad_placement(),
                    depth: 0,
                },
                &mut tracer,
            )
            .unwrap();

        ctx.replace_source_texture(
            &mut compositor,
            original,
            texture(0xcafe, 1024, 512),
            None,
            true,
            &mut tracer,
        )
        .unwrap();

        // The clone is destroyed before the original's images go away, then
        // both get fresh allocations with the new geometry; the clone's
        // re-registration carries the shared source again.
        assert_eq!(compositor.destroyed, [clone, original]);
        assert_eq!(ctx.layer(original).unwrap().params().width, 1024);
        assert_eq!(ctx.layer(clone).unwrap().params().width, 1024);
        let last = compositor.params_log.last().unwrap();
        assert_eq!(last.id, clone);
        assert_eq!(last.shared_source, Some(original));
    }

    #[test]
    fn skipped_copies_surface_in_the_event_log() {
        let mut ctx = CompositionContext::new(ColorSpace::Gamma, GraphicsBackend::Vulkan);
        let mut compositor = ScriptedCompositor::new(2);
        let mut copier = RecordingCopier::new();
        let mut log = EventLog::new();
        copier.fail = true;

        let id = {
            let mut tracer = Tracer::new(&mut log);
            let id = ctx
                .create_layer(&mut compositor, &stereo_desc(), &mut tracer)
                .unwrap();
            ctx.on_frame_begin(&mut compositor, &mut copier, &no_cameras(), &mut tracer);
            id
        };

        assert!(log.events.contains(&LoggedEvent::CopySkipped {
            id,
            eye: Eye::Left,
            error: CopyError::NullDestinationSlot,
        }));
        assert_eq!(
            ctx.layer(id).unwrap().content_state(),
            ContentState::Pending
        );
    }

    #[test]
    fn frame_stats_tracks_skip_rate_and_history() {
        let mut stats = FrameStats::<8>::new();
        let _ = stats.observe(FrameSample { copies: 2, skips: 0 });
        let report = stats.observe(FrameSample { copies: 2, skips: 2 });
        assert_eq!(report.total_frames, 2);
        assert_eq!(report.total_skips, 2);
        assert!((report.skip_rate_per_1000 - 2.0 * 1000.0 / 6.0).abs() < 1e-9);

        let history = stats.copy_history();
        assert_eq!(&history[6..], &[2, 2]);
    }

    #[test]
    fn sparkline_spans_the_level_range() {
        let mut stats = FrameStats::<4>::new();
        let _ = stats.observe(FrameSample { copies: 0, skips: 0 });
        let _ = stats.observe(FrameSample { copies: 6, skips: 0 });
        let _ = stats.observe(FrameSample { copies: 3, skips: 0 });
        let _ = stats.observe(FrameSample { copies: 6, skips: 0 });

        let line = stats.sparkline_ascii(6);
        assert_eq!(line.len(), 4);
        assert!(line.starts_with(' '));
        assert!(line.ends_with('@'));
    }
}
