// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines data structures related to 2D textures and their sampling state.

use super::image::{ImageDataType, ImageFormat};
use crate::math::Extent2D;
use serde::{Deserialize, Serialize};

/// The scalar type of one component of a texel as stored by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelComponent {
    /// 8-bit unsigned (normalized or integer).
    U8,
    /// 16-bit unsigned (normalized or integer).
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 32-bit signed integer.
    I32,
    /// 16-bit float.
    F16,
    /// 32-bit float.
    F32,
    /// 24-bit depth and 8-bit stencil packed into 32 bits.
    PackedDepthStencil,
}

impl TexelComponent {
    /// Size of one component in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            TexelComponent::U8 => 1,
            TexelComponent::U16 | TexelComponent::F16 => 2,
            TexelComponent::U32
            | TexelComponent::I32
            | TexelComponent::F32
            | TexelComponent::PackedDepthStencil => 4,
        }
    }
}

/// Defines the internal storage format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// Three 8-bit unsigned normalized components.
    RedGreenBlue8,
    /// Three 16-bit unsigned normalized components.
    RedGreenBlue16,
    /// Four 8-bit unsigned normalized components.
    RedGreenBlueAlpha8,
    /// Four 16-bit unsigned normalized components.
    RedGreenBlueAlpha16,
    /// Three 8-bit components in the sRGB color space.
    SRedGreenBlue8,
    /// Four 8-bit components, RGB in the sRGB color space.
    SRedGreenBlue8Alpha8,
    /// One 8-bit unsigned normalized component.
    Red8,
    /// One 16-bit unsigned normalized component.
    Red16,
    /// Two 8-bit unsigned normalized components.
    RedGreen8,
    /// Two 16-bit unsigned normalized components.
    RedGreen16,
    /// One 16-bit float component.
    Red16f,
    /// One 32-bit float component.
    Red32f,
    /// Two 16-bit float components.
    RedGreen16f,
    /// Two 32-bit float components.
    RedGreen32f,
    /// Three 16-bit float components.
    RedGreenBlue16f,
    /// Three 32-bit float components.
    RedGreenBlue32f,
    /// Four 16-bit float components.
    RedGreenBlueAlpha16f,
    /// Four 32-bit float components.
    RedGreenBlueAlpha32f,
    /// One 8-bit unsigned integer component.
    Red8ui,
    /// One 16-bit unsigned integer component.
    Red16ui,
    /// One 32-bit unsigned integer component.
    Red32ui,
    /// One 32-bit signed integer component.
    Red32i,
    /// Four 8-bit unsigned integer components.
    RedGreenBlueAlpha8ui,
    /// Four 32-bit unsigned integer components.
    RedGreenBlueAlpha32ui,
    /// A 16-bit depth format.
    Depth16,
    /// A 24-bit depth format stored in 32 bits.
    Depth24,
    /// A 32-bit float depth format.
    Depth32f,
    /// A 24-bit depth format with an 8-bit stencil component.
    Depth24Stencil8,
}

impl TextureFormat {
    /// Returns the number of components per texel.
    pub fn component_count(&self) -> usize {
        use TextureFormat::*;
        match self {
            Red8 | Red16 | Red16f | Red32f | Red8ui | Red16ui | Red32ui | Red32i | Depth16
            | Depth24 | Depth32f | Depth24Stencil8 => 1,
            RedGreen8 | RedGreen16 | RedGreen16f | RedGreen32f => 2,
            RedGreenBlue8 | RedGreenBlue16 | SRedGreenBlue8 | RedGreenBlue16f
            | RedGreenBlue32f => 3,
            RedGreenBlueAlpha8
            | RedGreenBlueAlpha16
            | SRedGreenBlue8Alpha8
            | RedGreenBlueAlpha16f
            | RedGreenBlueAlpha32f
            | RedGreenBlueAlpha8ui
            | RedGreenBlueAlpha32ui => 4,
        }
    }

    /// Returns the scalar type of each component.
    pub fn component(&self) -> TexelComponent {
        use TextureFormat::*;
        match self {
            RedGreenBlue8 | RedGreenBlueAlpha8 | SRedGreenBlue8 | SRedGreenBlue8Alpha8 | Red8
            | RedGreen8 | Red8ui | RedGreenBlueAlpha8ui => TexelComponent::U8,
            RedGreenBlue16 | RedGreenBlueAlpha16 | Red16 | RedGreen16 | Red16ui | Depth16 => {
                TexelComponent::U16
            }
            Red32ui | RedGreenBlueAlpha32ui | Depth24 => TexelComponent::U32,
            Red32i => TexelComponent::I32,
            Red16f | RedGreen16f | RedGreenBlue16f | RedGreenBlueAlpha16f => TexelComponent::F16,
            Red32f | RedGreen32f | RedGreenBlue32f | RedGreenBlueAlpha32f | Depth32f => {
                TexelComponent::F32
            }
            Depth24Stencil8 => TexelComponent::PackedDepthStencil,
        }
    }

    /// Returns the size in bytes of a single texel for this format.
    pub fn bytes_per_texel(&self) -> usize {
        self.component_count() * self.component().size_in_bytes()
    }

    /// Returns `true` for depth-only formats.
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth16 | TextureFormat::Depth24 | TextureFormat::Depth32f
        )
    }

    /// Returns `true` for combined depth/stencil formats.
    pub fn is_depth_stencil(&self) -> bool {
        matches!(self, TextureFormat::Depth24Stencil8)
    }

    /// Returns `true` for formats that can be color render targets.
    pub fn is_color(&self) -> bool {
        !self.is_depth() && !self.is_depth_stencil()
    }

    /// Returns `true` for unnormalized integer formats.
    pub fn is_integer(&self) -> bool {
        use TextureFormat::*;
        matches!(
            self,
            Red8ui | Red16ui | Red32ui | Red32i | RedGreenBlueAlpha8ui | RedGreenBlueAlpha32ui
        )
    }

    /// Returns `true` for sRGB-encoded formats.
    pub fn is_srgb(&self) -> bool {
        matches!(
            self,
            TextureFormat::SRedGreenBlue8 | TextureFormat::SRedGreenBlue8Alpha8
        )
    }

    /// The client-side pixel layout that matches this format byte for byte.
    pub fn native_transfer(&self) -> (ImageFormat, ImageDataType) {
        let data_type = match self.component() {
            TexelComponent::U8 => ImageDataType::UnsignedByte,
            TexelComponent::U16 => ImageDataType::UnsignedShort,
            TexelComponent::U32 => ImageDataType::UnsignedInt,
            TexelComponent::I32 => ImageDataType::Int,
            TexelComponent::F16 => ImageDataType::HalfFloat,
            TexelComponent::F32 => ImageDataType::Float,
            TexelComponent::PackedDepthStencil => ImageDataType::UnsignedInt248,
        };
        let format = if self.is_depth() {
            ImageFormat::DepthComponent
        } else if self.is_depth_stencil() {
            ImageFormat::DepthStencil
        } else {
            match (self.component_count(), self.is_integer()) {
                (1, false) => ImageFormat::Red,
                (2, false) => ImageFormat::RedGreen,
                (3, false) => ImageFormat::RedGreenBlue,
                (_, false) => ImageFormat::RedGreenBlueAlpha,
                (1, true) => ImageFormat::RedInteger,
                (2, true) => ImageFormat::RedGreenInteger,
                (3, true) => ImageFormat::RedGreenBlueInteger,
                (_, true) => ImageFormat::RedGreenBlueAlphaInteger,
            }
        };
        (format, data_type)
    }
}

/// Describes the immutable properties of a 2D texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Texture2DDescription {
    width: u32,
    height: u32,
    format: TextureFormat,
    generate_mipmaps: bool,
}

impl Texture2DDescription {
    /// Creates a description. Sizes are not validated here; the driver rejects
    /// what it cannot allocate.
    pub const fn new(width: u32, height: u32, format: TextureFormat, generate_mipmaps: bool) -> Self {
        Self {
            width,
            height,
            format,
            generate_mipmaps,
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as an extent.
    pub fn extent(&self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }

    /// Internal storage format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Whether a full mip chain is generated after each upload.
    pub fn generate_mipmaps(&self) -> bool {
        self.generate_mipmaps
    }

    /// Number of mip levels the texture allocates.
    pub fn mipmap_levels(&self) -> u32 {
        if !self.generate_mipmaps {
            return 1;
        }
        let largest = self.width.max(self.height).max(1);
        u32::BITS - largest.leading_zeros()
    }

    /// Bytes needed to store every level of the texture.
    pub fn approximate_size_in_bytes(&self) -> usize {
        let texel = self.format.bytes_per_texel();
        (0..self.mipmap_levels())
            .map(|level| mip_extent(self.extent(), level).area() * texel)
            .sum()
    }
}

/// Returns the extent of mip `level` for a base extent.
pub fn mip_extent(base: Extent2D, level: u32) -> Extent2D {
    Extent2D::new(
        (base.width >> level).max(1),
        (base.height >> level).max(1),
    )
}

/// Filtering when a texture is drawn smaller than its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureMinificationFilter {
    /// Nearest texel from the base level.
    Nearest,
    /// Bilinear from the base level.
    Linear,
    /// Nearest texel from the nearest mip level.
    NearestMipmapNearest,
    /// Bilinear from the nearest mip level.
    LinearMipmapNearest,
    /// Nearest texel, blended between two mip levels.
    NearestMipmapLinear,
    /// Trilinear.
    LinearMipmapLinear,
}

impl TextureMinificationFilter {
    /// Returns `true` if the filter samples mip levels.
    pub fn uses_mipmaps(&self) -> bool {
        !matches!(
            self,
            TextureMinificationFilter::Nearest | TextureMinificationFilter::Linear
        )
    }
}

/// Filtering when a texture is drawn larger than its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureMagnificationFilter {
    /// Point sampling.
    Nearest,
    /// Bilinear interpolation.
    Linear,
}

/// Defines how texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureWrap {
    /// Coordinates are clamped, blending with the border at the edge.
    Clamp,
    /// Coordinates wrap around.
    Repeat,
    /// Coordinates outside the range sample the border color.
    ClampToBorder,
    /// Coordinates are clamped to the edge texels.
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirroredRepeat,
}

/// Sampling state of a texture. Value semantics; no range validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Texture2DFilter {
    minification_filter: TextureMinificationFilter,
    magnification_filter: TextureMagnificationFilter,
    wrap_s: TextureWrap,
    wrap_t: TextureWrap,
    maximum_anisotropic: f32,
}

impl Texture2DFilter {
    /// Point sampling, clamped to the edge.
    pub const NEAREST_CLAMP: Self = Self::new(
        TextureMinificationFilter::Nearest,
        TextureMagnificationFilter::Nearest,
        TextureWrap::ClampToEdge,
        TextureWrap::ClampToEdge,
        1.0,
    );

    /// Bilinear sampling, clamped to the edge.
    pub const LINEAR_CLAMP: Self = Self::new(
        TextureMinificationFilter::Linear,
        TextureMagnificationFilter::Linear,
        TextureWrap::ClampToEdge,
        TextureWrap::ClampToEdge,
        1.0,
    );

    /// Point sampling, repeating.
    pub const NEAREST_REPEAT: Self = Self::new(
        TextureMinificationFilter::Nearest,
        TextureMagnificationFilter::Nearest,
        TextureWrap::Repeat,
        TextureWrap::Repeat,
        1.0,
    );

    /// Bilinear sampling, repeating.
    pub const LINEAR_REPEAT: Self = Self::new(
        TextureMinificationFilter::Linear,
        TextureMagnificationFilter::Linear,
        TextureWrap::Repeat,
        TextureWrap::Repeat,
        1.0,
    );

    /// Creates a filter from its parts.
    pub const fn new(
        minification_filter: TextureMinificationFilter,
        magnification_filter: TextureMagnificationFilter,
        wrap_s: TextureWrap,
        wrap_t: TextureWrap,
        maximum_anisotropic: f32,
    ) -> Self {
        Self {
            minification_filter,
            magnification_filter,
            wrap_s,
            wrap_t,
            maximum_anisotropic,
        }
    }

    /// Minification filter.
    pub fn minification_filter(&self) -> TextureMinificationFilter {
        self.minification_filter
    }

    /// Magnification filter.
    pub fn magnification_filter(&self) -> TextureMagnificationFilter {
        self.magnification_filter
    }

    /// Wrap mode along S (horizontal).
    pub fn wrap_s(&self) -> TextureWrap {
        self.wrap_s
    }

    /// Wrap mode along T (vertical).
    pub fn wrap_t(&self) -> TextureWrap {
        self.wrap_t
    }

    /// Maximum anisotropy; `1.0` disables anisotropic filtering.
    pub fn maximum_anisotropic(&self) -> f32 {
        self.maximum_anisotropic
    }
}

impl Default for Texture2DFilter {
    fn default() -> Self {
        Self::LINEAR_CLAMP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_equality_compares_all_fields() {
        let description = Texture2DDescription::new(512, 256, TextureFormat::RedGreenBlueAlpha8, true);
        assert_eq!(description.width(), 512);
        assert_eq!(description.height(), 256);
        assert_eq!(description.format(), TextureFormat::RedGreenBlueAlpha8);
        assert!(description.generate_mipmaps());

        let same = Texture2DDescription::new(512, 256, TextureFormat::RedGreenBlueAlpha8, true);
        assert_eq!(description, same);

        let variants = [
            Texture2DDescription::new(64, 256, TextureFormat::RedGreenBlueAlpha8, true),
            Texture2DDescription::new(512, 32, TextureFormat::RedGreenBlueAlpha8, true),
            Texture2DDescription::new(512, 256, TextureFormat::RedGreenBlue8, true),
            Texture2DDescription::new(512, 256, TextureFormat::RedGreenBlueAlpha8, false),
        ];
        for other in variants {
            assert_ne!(description, other);
        }
    }

    #[test]
    fn filter_equality_compares_all_fields() {
        let filter = Texture2DFilter::new(
            TextureMinificationFilter::Linear,
            TextureMagnificationFilter::Nearest,
            TextureWrap::MirroredRepeat,
            TextureWrap::Repeat,
            2.0,
        );
        assert_eq!(filter.minification_filter(), TextureMinificationFilter::Linear);
        assert_eq!(filter.magnification_filter(), TextureMagnificationFilter::Nearest);
        assert_eq!(filter.wrap_s(), TextureWrap::MirroredRepeat);
        assert_eq!(filter.wrap_t(), TextureWrap::Repeat);
        assert_eq!(filter.maximum_anisotropic(), 2.0);

        assert_ne!(filter, Texture2DFilter::LINEAR_CLAMP);
        assert_eq!(Texture2DFilter::LINEAR_CLAMP, Texture2DFilter::LINEAR_CLAMP);

        let mut anisotropy_only = filter;
        anisotropy_only.maximum_anisotropic = 4.0;
        assert_ne!(filter, anisotropy_only);
    }

    #[test]
    fn mipmap_levels_cover_the_largest_side() {
        let description = Texture2DDescription::new(512, 256, TextureFormat::Red8, true);
        assert_eq!(description.mipmap_levels(), 10);
        assert_eq!(
            Texture2DDescription::new(1, 1, TextureFormat::Red8, true).mipmap_levels(),
            1
        );
        assert_eq!(
            Texture2DDescription::new(5, 3, TextureFormat::Red8, false).mipmap_levels(),
            1
        );
        // 4x2 + 2x1 + 1x1 texels of 4 bytes each
        assert_eq!(
            Texture2DDescription::new(4, 2, TextureFormat::Red32f, true).approximate_size_in_bytes(),
            (8 + 2 + 1) * 4
        );
    }

    #[test]
    fn native_transfer_matches_texel_size() {
        assert_eq!(
            TextureFormat::RedGreenBlue8.native_transfer(),
            (ImageFormat::RedGreenBlue, ImageDataType::UnsignedByte)
        );
        assert_eq!(
            TextureFormat::Red32f.native_transfer(),
            (ImageFormat::Red, ImageDataType::Float)
        );
        assert_eq!(
            TextureFormat::Red32i.native_transfer(),
            (ImageFormat::RedInteger, ImageDataType::Int)
        );
        assert_eq!(
            TextureFormat::Depth24Stencil8.native_transfer(),
            (ImageFormat::DepthStencil, ImageDataType::UnsignedInt248)
        );
        assert_eq!(TextureFormat::Depth24Stencil8.bytes_per_texel(), 4);
        assert_eq!(TextureFormat::RedGreenBlueAlpha16f.bytes_per_texel(), 8);
    }
}
