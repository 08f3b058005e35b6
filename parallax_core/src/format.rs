// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-format negotiation.
//!
//! The swap-chain format is a function of the engine's active color space and
//! the graphics backend in use: a linear color space needs an sRGB-capable
//! format so the compositor's sampler applies the transfer function, while a
//! gamma color space stores already-encoded values in a plain format.

/// The engine's active color space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Rendering happens in linear light; swap chains need sRGB formats.
    Linear,
    /// Rendering happens in gamma space; swap chains use plain formats.
    #[default]
    Gamma,
}

/// The graphics API the engine renders with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GraphicsBackend {
    /// Vulkan.
    #[default]
    Vulkan,
    /// OpenGL ES.
    OpenGlEs,
}

/// A native pixel format understood by the compositor.
///
/// Discriminants are the raw API enum values and are passed through the
/// parameter block unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureFormat {
    /// `VK_FORMAT_R8G8B8A8_UNORM`.
    VkRgba8Unorm = 37,
    /// `VK_FORMAT_R8G8B8A8_SRGB`.
    VkRgba8Srgb = 43,
    /// `GL_RGBA8`.
    GlRgba8 = 0x8058,
    /// `GL_SRGB8_ALPHA8`.
    GlSrgb8Alpha8 = 0x8c43,
}

impl TextureFormat {
    /// Returns the raw API enum value for the parameter block.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

/// Selects the swap-chain pixel format for the given color space and backend.
#[must_use]
pub const fn select(color_space: ColorSpace, backend: GraphicsBackend) -> TextureFormat {
    match (backend, color_space) {
        (GraphicsBackend::Vulkan, ColorSpace::Linear) => TextureFormat::VkRgba8Srgb,
        (GraphicsBackend::Vulkan, ColorSpace::Gamma) => TextureFormat::VkRgba8Unorm,
        (GraphicsBackend::OpenGlEs, ColorSpace::Linear) => TextureFormat::GlSrgb8Alpha8,
        (GraphicsBackend::OpenGlEs, ColorSpace::Gamma) => TextureFormat::GlRgba8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_selects_srgb_capable_formats() {
        assert_eq!(
            select(ColorSpace::Linear, GraphicsBackend::Vulkan),
            TextureFormat::VkRgba8Srgb
        );
        assert_eq!(
            select(ColorSpace::Linear, GraphicsBackend::OpenGlEs),
            TextureFormat::GlSrgb8Alpha8
        );
    }

    #[test]
    fn gamma_selects_plain_formats() {
        assert_eq!(
            select(ColorSpace::Gamma, GraphicsBackend::Vulkan),
            TextureFormat::VkRgba8Unorm
        );
        assert_eq!(
            select(ColorSpace::Gamma, GraphicsBackend::OpenGlEs),
            TextureFormat::GlRgba8
        );
    }

    #[test]
    fn raw_values_match_native_enums() {
        assert_eq!(TextureFormat::VkRgba8Unorm.raw(), 37);
        assert_eq!(TextureFormat::VkRgba8Srgb.raw(), 43);
        assert_eq!(TextureFormat::GlRgba8.raw(), 0x8058);
        assert_eq!(TextureFormat::GlSrgb8Alpha8.raw(), 0x8c43);
    }
}
