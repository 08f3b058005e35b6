// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The static parameter block registered with the compositor.

use super::eye::Eye;
use super::id::{LayerId, TextureHandle};
use crate::format::TextureFormat;
use crate::shape::Shape;

/// Whether a layer composites in front of or behind the main scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Kind {
    /// Drawn in front of the main scene.
    #[default]
    Overlay = 0,
    /// Drawn behind the main scene.
    Underlay = 1,
}

/// Mono/stereo image-set layout.
///
/// Discriminants match the native compositor ABI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Layout {
    /// Distinct image sets per eye.
    Stereo = 0,
    /// One image set shared by both eyes.
    Mono = 3,
}

impl Layout {
    /// Derives the layout from the caller's eye textures.
    ///
    /// Identical textures (or an absent right texture) mean both eyes can
    /// share one image set. This is a policy decision, never an error.
    #[must_use]
    pub fn derive(left: Option<TextureHandle>, right: Option<TextureHandle>) -> Self {
        match (left, right) {
            (Some(l), Some(r)) if l == r => Self::Mono,
            (_, None) => Self::Mono,
            _ => Self::Stereo,
        }
    }

    /// Returns how many image sets this layout needs.
    #[inline]
    #[must_use]
    pub const fn eye_count(self) -> usize {
        match self {
            Self::Stereo => 2,
            Self::Mono => 1,
        }
    }

    /// Returns the eyes that carry an image set under this layout.
    #[inline]
    #[must_use]
    pub const fn eyes(self) -> &'static [Eye] {
        match self {
            Self::Stereo => &[Eye::Left, Eye::Right],
            Self::Mono => &[Eye::Left],
        }
    }
}

/// Stereo packing of an external surface's content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Surface3d {
    /// Monoscopic content.
    #[default]
    Single,
    /// Side-by-side left/right packing.
    LeftRight,
    /// Over/under top/bottom packing.
    TopBottom,
}

/// Per-layer creation flags forwarded to the compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// The content is copied once and never changes.
    pub static_image: bool,
    /// The layer aliases another layer's images instead of owning its own.
    pub shared_images: bool,
    /// The images come from an external Android surface producer.
    pub android_surface: bool,
    /// The external surface carries DRM-protected content.
    pub protected_content: bool,
    /// Stereo packing of external-surface content.
    pub surface_3d: Surface3d,
}

/// A caller-owned source texture a layer reads from each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceTexture {
    /// Opaque reference to the texture.
    pub handle: TextureHandle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format of the texture's content.
    pub format: TextureFormat,
}

/// The static parameter block describing one layer to the compositor.
///
/// Registered via
/// [`CompositorApi::request_layer_params`](crate::compositor::CompositorApi::request_layer_params)
/// exactly once per allocation; re-allocation re-registers after destroying
/// the previous swap chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerParams {
    /// The layer's process-unique id.
    pub id: LayerId,
    /// Projection shape.
    pub shape: Shape,
    /// Overlay or underlay composition.
    pub kind: Kind,
    /// Mono or stereo image-set layout.
    pub layout: Layout,
    /// Negotiated pixel format.
    pub format: TextureFormat,
    /// Image width in pixels (cube face size for cubemaps).
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// MSAA sample count. Always 1.
    pub sample_count: u32,
    /// Texture faces per image: 6 for cubemaps, 1 otherwise.
    pub face_count: u32,
    /// Texture array size. Always 1.
    pub array_size: u32,
    /// Mip levels per image. Always 1.
    pub mip_count: u32,
    /// Creation flags.
    pub flags: LayerFlags,
    /// For shared-image (clone) layers, the id of the layer whose images are
    /// aliased. Passed to the compositor for the duration of the registration
    /// call only; never held across frames.
    pub shared_source: Option<LayerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_textures_derive_mono() {
        let tex = TextureHandle(0x10);
        assert_eq!(Layout::derive(Some(tex), Some(tex)), Layout::Mono);
        assert_eq!(Layout::Mono.eye_count(), 1);
    }

    #[test]
    fn absent_right_texture_derives_mono() {
        assert_eq!(
            Layout::derive(Some(TextureHandle(0x10)), None),
            Layout::Mono
        );
    }

    #[test]
    fn distinct_textures_derive_stereo() {
        let layout = Layout::derive(Some(TextureHandle(0x10)), Some(TextureHandle(0x20)));
        assert_eq!(layout, Layout::Stereo);
        assert_eq!(layout.eye_count(), 2);
        assert_eq!(layout.eyes(), &[Eye::Left, Eye::Right]);
    }

    #[test]
    fn abi_discriminants_are_stable() {
        assert_eq!(Layout::Stereo as u32, 0);
        assert_eq!(Layout::Mono as u32, 3);
        assert_eq!(Kind::Overlay as u32, 0);
        assert_eq!(Kind::Underlay as u32, 1);
    }
}
