// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.
//!
//! Errors here are *local*: they leave the affected layer in a non-terminal
//! lifecycle state (or skip one frame's copy) and never unwind across the
//! per-frame loop boundary. Teardown has no error type at all — it is
//! unconditionally safe and idempotent.

use thiserror::Error;

use crate::layer::Eye;
use crate::shape::Shape;

/// Failure while acquiring a swap chain from the compositor.
///
/// The layer remains in the `Allocating` state; the next frame retries.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// The compositor reported fewer than one buffered image for an eye.
    #[error("compositor reported no images for {eye:?}")]
    InsufficientImages {
        /// The eye whose image-count query came back empty.
        eye: Eye,
    },
    /// The compositor returned a null image pointer.
    #[error("null image handle for {eye:?} at slot {index}")]
    NullHandle {
        /// The eye being queried.
        eye: Eye,
        /// The slot index whose pointer was null.
        index: u32,
    },
    /// The compositor rejected the negotiated pixel format.
    #[error("pixel format rejected by the compositor")]
    FormatUnsupported,
    /// The external surface producer has not handed over a surface yet.
    #[error("external surface not yet available")]
    SurfaceUnavailable,
}

/// Invalid layer configuration supplied by the caller.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The operation named a layer id the registry does not hold.
    #[error("no layer with the requested id")]
    UnknownLayer,
    /// A clone was requested against a layer that does not exist.
    #[error("clone requested against a missing original layer")]
    MissingOriginal,
    /// The placement parameters do not fit the requested shape.
    #[error("placement parameters do not fit shape {shape:?}")]
    ShapeMismatch {
        /// The shape the placement was checked against.
        shape: Shape,
    },
}

/// A recoverable per-frame copy failure.
///
/// The copy for the affected eye is skipped this frame and retried on the
/// next; the frame loop itself is never aborted.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CopyError {
    /// The caller's source texture is absent or null.
    #[error("source texture is null")]
    NullSource,
    /// The destination swap-chain slot is absent or null.
    #[error("destination swap-chain slot is null")]
    NullDestinationSlot,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn allocation_error_messages_name_the_eye() {
        let err = AllocationError::InsufficientImages { eye: Eye::Right };
        assert!(err.to_string().contains("Right"));

        let err = AllocationError::NullHandle {
            eye: Eye::Left,
            index: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Left") && msg.contains('2'));
    }

    #[test]
    fn shape_mismatch_names_the_shape() {
        let err = ConfigurationError::ShapeMismatch {
            shape: Shape::Cylinder,
        };
        assert!(err.to_string().contains("Cylinder"));
    }
}
