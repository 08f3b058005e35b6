// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection-shape descriptors.
//!
//! A [`Shape`] names the geometric projection topology of a layer. All
//! shape-dependent facts (face count, blit rotation, placement parameter
//! kind) are answered here, so the rest of the crate never branches on
//! individual shape variants.

/// The geometric projection topology of a layer.
///
/// Discriminants match the native compositor ABI and are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Shape {
    /// A flat rectangle placed in world space.
    Quad = 1,
    /// A section of a cylinder curved around the viewer.
    Cylinder = 2,
    /// An equirectangular panorama sphere.
    Equirect = 3,
    /// A six-faced cubemap surrounding the viewer.
    Cubemap = 5,
    /// An equi-angular cubemap (EAC) panorama.
    Eac = 6,
}

/// Which placement parameters a shape expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    /// Placed by explicit width/height in world units.
    Sized,
    /// Placed by radius and central angle around the viewer.
    Curved,
    /// Encloses the viewer entirely; no placement parameter.
    Ambient,
}

/// Shape-specific placement parameters carried by a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Width/height extent for [`Shape::Quad`].
    Sized {
        /// World-space width.
        width: f32,
        /// World-space height.
        height: f32,
    },
    /// Radius and central angle for curved shapes.
    Curved {
        /// Distance from the viewer, in world units. Must be positive.
        radius: f32,
        /// Horizontal arc covered, in radians.
        central_angle: f32,
    },
    /// No placement parameter ([`Shape::Cubemap`]).
    Ambient,
}

impl Shape {
    /// Returns the number of texture faces this shape requires.
    #[inline]
    #[must_use]
    pub const fn face_count(self) -> u32 {
        match self {
            Self::Cubemap => 6,
            _ => 1,
        }
    }

    /// Returns whether per-face blit rotation is required when copying
    /// source content into the swap chain.
    #[inline]
    #[must_use]
    pub const fn needs_face_rotation(self) -> bool {
        matches!(self, Self::Cubemap)
    }

    /// Returns the kind of placement parameter this shape expects.
    #[inline]
    #[must_use]
    pub const fn placement_kind(self) -> PlacementKind {
        match self {
            Self::Quad => PlacementKind::Sized,
            Self::Cylinder | Self::Equirect | Self::Eac => PlacementKind::Curved,
            Self::Cubemap => PlacementKind::Ambient,
        }
    }
}

impl Placement {
    /// Returns the [`PlacementKind`] this value carries.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PlacementKind {
        match self {
            Self::Sized { .. } => PlacementKind::Sized,
            Self::Curved { .. } => PlacementKind::Curved,
            Self::Ambient => PlacementKind::Ambient,
        }
    }

    /// Returns whether this placement fits `shape`.
    #[inline]
    #[must_use]
    pub fn fits(&self, shape: Shape) -> bool {
        self.kind() == shape.placement_kind()
    }
}
