// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame content synchronization step.
//!
//! [`sync_frame`] moves caller-texture content into the currently writable
//! swap-chain slot of each eye the layer's layout requires. Two paths exist:
//!
//! - **Fast path** — when the working color space is gamma and the source
//!   texture already carries the negotiated format, each face is copied
//!   directly.
//! - **Converting path** — otherwise each face goes through the copier's
//!   intermediate render pass, which applies the color-space transform and,
//!   for cubemaps, the per-face projection remap.
//!
//! Failure semantics are skip-and-retry: a missing source or chain skips that
//! eye for this frame without touching lifecycle state, and the next frame
//! tries again. Slot rotation is not performed here; a successful dynamic
//! copy only marks the layer for rotation at the start of the next frame.

use crate::compositor::TextureCopier;
use crate::error::CopyError;
use crate::format::ColorSpace;
use crate::layer::{Layer, LifecycleState};
use crate::trace::{CopyEvent, CopySkippedEvent, Tracer};

/// Synchronizes one layer's content for this frame.
///
/// Returns `true` if at least one eye received new content. Layers that are
/// not [`Active`](LifecycleState::Active), external-surface layers, clones,
/// and static layers whose copy already landed are all no-ops.
pub fn sync_frame(
    layer: &mut Layer,
    copier: &mut dyn TextureCopier,
    color_space: ColorSpace,
    tracer: &mut Tracer<'_>,
) -> bool {
    if layer.state != LifecycleState::Active {
        return false;
    }
    // External producers fill the images themselves; clones alias their
    // original's images and must never write into them.
    if layer.is_external_surface() || layer.clone_of.is_some() {
        return false;
    }

    let is_static = layer.params.flags.static_image;
    let mut made_visible = false;

    for &eye in layer.params.layout.eyes() {
        if is_static && layer.copied[eye] {
            continue;
        }

        let Some(source) = layer.sources[eye] else {
            tracer.copy_skipped(&CopySkippedEvent {
                id: layer.id(),
                eye,
                error: CopyError::NullSource,
            });
            continue;
        };
        let Some(chain) = &layer.chains[eye] else {
            tracer.copy_skipped(&CopySkippedEvent {
                id: layer.id(),
                eye,
                error: CopyError::NullDestinationSlot,
            });
            continue;
        };
        let dst = chain.writable();

        let faces = layer.params.face_count;
        let direct = color_space == ColorSpace::Gamma && source.format == layer.params.format;
        let mut failed = false;
        for face in 0..faces {
            let result = if direct {
                copier.copy_face(source.handle, dst, face)
            } else {
                copier.convert_face(source.handle, dst, face, layer.params.shape)
            };
            if let Err(error) = result {
                tracer.copy_skipped(&CopySkippedEvent {
                    id: layer.id(),
                    eye,
                    error,
                });
                failed = true;
                break;
            }
        }
        if failed {
            continue;
        }

        layer.copied[eye] = true;
        made_visible = true;
        tracer.copy(&CopyEvent {
            id: layer.id(),
            eye,
            faces,
        });
    }

    if made_visible && layer.dynamic {
        layer.pending_rotate = true;
    }
    made_visible
}
