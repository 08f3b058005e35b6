// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity and opaque native handles.

use core::fmt;

/// A process-unique handle to a layer.
///
/// Ids are assigned monotonically by the
/// [`LayerRegistry`](crate::registry::LayerRegistry) and are never reused,
/// so a stale id (for example a clone's back-reference after its original
/// was torn down) can never alias a newer layer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) u32);

impl LayerId {
    /// Returns the raw id value (for diagnostics and the native ABI).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// An opaque handle to one native swap-chain image owned by the compositor.
///
/// The raw value is the native pointer the compositor handed back; this crate
/// never dereferences it, only passes it to the [`TextureCopier`] boundary.
///
/// [`TextureCopier`]: crate::compositor::TextureCopier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({:#x})", self.0)
    }
}

/// An opaque reference to a caller-owned source texture.
///
/// Ownership stays with the caller; layers only read from it during the
/// per-frame copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureHandle({:#x})", self.0)
    }
}

/// An opaque handle to an externally produced Android surface.
///
/// Only external-surface layers carry one; their content arrives through
/// this producer instead of the per-frame copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceHandle({:#x})", self.0)
    }
}
