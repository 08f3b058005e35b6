// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! lifecycle controller calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.

use crate::error::{AllocationError, CopyError};
use crate::layer::{Eye, LayerId};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layer (or clone) is created and enters the registry.
#[derive(Clone, Copy, Debug)]
pub struct LayerCreatedEvent {
    /// The new layer's id.
    pub id: LayerId,
    /// The original's id if the new layer is a clone.
    pub clone_of: Option<LayerId>,
}

/// Emitted when a layer's swap chains are wrapped and it becomes active.
#[derive(Clone, Copy, Debug)]
pub struct AllocationCompleteEvent {
    /// The layer that became active.
    pub id: LayerId,
    /// Buffered slot count of the left-eye chain.
    pub slot_count: usize,
}

/// Emitted when an allocation attempt fails and will be retried next frame.
#[derive(Clone, Copy, Debug)]
pub struct AllocationDeferredEvent {
    /// The layer still waiting for images.
    pub id: LayerId,
    /// Why this attempt failed.
    pub error: AllocationError,
}

/// Emitted after a successful per-eye copy.
#[derive(Clone, Copy, Debug)]
pub struct CopyEvent {
    /// The layer that received content.
    pub id: LayerId,
    /// Which eye was filled.
    pub eye: Eye,
    /// How many faces were copied (6 for cubemaps).
    pub faces: u32,
}

/// Emitted when one eye's copy was skipped this frame.
#[derive(Clone, Copy, Debug)]
pub struct CopySkippedEvent {
    /// The layer whose copy was skipped.
    pub id: LayerId,
    /// Which eye was skipped.
    pub eye: Eye,
    /// Why.
    pub error: CopyError,
}

/// Emitted when a layer's write slots rotate at the start of a frame.
#[derive(Clone, Copy, Debug)]
pub struct SlotRotatedEvent {
    /// The layer whose chains advanced.
    pub id: LayerId,
}

/// Emitted when a layer's native resources are released.
#[derive(Clone, Copy, Debug)]
pub struct TearDownEvent {
    /// The layer being torn down.
    pub id: LayerId,
    /// Whether teardown was triggered by its original going away.
    pub cascaded: bool,
}

/// Emitted when a texture replacement rebuilds a layer's swap chain under
/// the same id.
#[derive(Clone, Copy, Debug)]
pub struct LayerRecreatedEvent {
    /// The layer whose allocation was rebuilt.
    pub id: LayerId,
    /// How many dependent clones were recreated with it.
    pub clones_recreated: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layer is created.
    fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
        _ = e;
    }

    /// Called when a layer's allocation completes.
    fn on_allocation_complete(&mut self, e: &AllocationCompleteEvent) {
        _ = e;
    }

    /// Called when an allocation attempt is deferred to the next frame.
    fn on_allocation_deferred(&mut self, e: &AllocationDeferredEvent) {
        _ = e;
    }

    /// Called after each successful per-eye copy.
    fn on_copy(&mut self, e: &CopyEvent) {
        _ = e;
    }

    /// Called when one eye's copy was skipped.
    fn on_copy_skipped(&mut self, e: &CopySkippedEvent) {
        _ = e;
    }

    /// Called when a layer's write slots rotate.
    fn on_slot_rotated(&mut self, e: &SlotRotatedEvent) {
        _ = e;
    }

    /// Called when a layer is torn down.
    fn on_tear_down(&mut self, e: &TearDownEvent) {
        _ = e;
    }

    /// Called when a texture replacement rebuilds a layer.
    fn on_layer_recreated(&mut self, e: &LayerRecreatedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LayerCreatedEvent`].
    #[inline]
    pub fn layer_created(&mut self, e: &LayerCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AllocationCompleteEvent`].
    #[inline]
    pub fn allocation_complete(&mut self, e: &AllocationCompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_allocation_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AllocationDeferredEvent`].
    #[inline]
    pub fn allocation_deferred(&mut self, e: &AllocationDeferredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_allocation_deferred(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CopyEvent`].
    #[inline]
    pub fn copy(&mut self, e: &CopyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_copy(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CopySkippedEvent`].
    #[inline]
    pub fn copy_skipped(&mut self, e: &CopySkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_copy_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SlotRotatedEvent`].
    #[inline]
    pub fn slot_rotated(&mut self, e: &SlotRotatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_slot_rotated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TearDownEvent`].
    #[inline]
    pub fn tear_down(&mut self, e: &TearDownEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tear_down(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerRecreatedEvent`].
    #[inline]
    pub fn layer_recreated(&mut self, e: &LayerRecreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_recreated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_layer_created(&LayerCreatedEvent {
            id: LayerId(1),
            clone_of: None,
        });
        sink.on_copy(&CopyEvent {
            id: LayerId(1),
            eye: Eye::Left,
            faces: 1,
        });
        sink.on_tear_down(&TearDownEvent {
            id: LayerId(1),
            cascaded: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.layer_created(&LayerCreatedEvent {
            id: LayerId(3),
            clone_of: Some(LayerId(1)),
        });
        tracer.slot_rotated(&SlotRotatedEvent { id: LayerId(3) });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            created: Vec<LayerId>,
        }
        impl TraceSink for RecordingSink {
            fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
                self.created.push(e.id);
            }
        }

        let mut sink = RecordingSink {
            created: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.layer_created(&LayerCreatedEvent {
            id: LayerId(5),
            clone_of: None,
        });
        drop(tracer);
        assert_eq!(sink.created, &[LayerId(5)]);
    }
}
