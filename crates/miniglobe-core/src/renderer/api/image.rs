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

//! Client-side pixel layouts used when moving texels between pixel buffers
//! and textures.

use crate::math::{Extent2D, Rectangle};
use crate::renderer::error::ResourceError;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Component order of pixels in a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Stencil values.
    StencilIndex,
    /// Depth values.
    DepthComponent,
    /// Red only.
    Red,
    /// Green only.
    Green,
    /// Blue only.
    Blue,
    /// Red, green.
    RedGreen,
    /// Red, green, blue.
    RedGreenBlue,
    /// Red, green, blue, alpha.
    RedGreenBlueAlpha,
    /// Blue, green, red.
    BlueGreenRed,
    /// Blue, green, red, alpha.
    BlueGreenRedAlpha,
    /// Unnormalized red.
    RedInteger,
    /// Unnormalized red, green.
    RedGreenInteger,
    /// Unnormalized red, green, blue.
    RedGreenBlueInteger,
    /// Unnormalized red, green, blue, alpha.
    RedGreenBlueAlphaInteger,
    /// Packed depth and stencil.
    DepthStencil,
}

impl ImageFormat {
    /// Number of components per pixel.
    pub fn component_count(&self) -> usize {
        use ImageFormat::*;
        match self {
            StencilIndex | DepthComponent | Red | Green | Blue | RedInteger | DepthStencil => 1,
            RedGreen | RedGreenInteger => 2,
            RedGreenBlue | BlueGreenRed | RedGreenBlueInteger => 3,
            RedGreenBlueAlpha | BlueGreenRedAlpha | RedGreenBlueAlphaInteger => 4,
        }
    }

    /// Returns `true` for the unnormalized integer layouts.
    pub fn is_integer(&self) -> bool {
        use ImageFormat::*;
        matches!(
            self,
            RedInteger | RedGreenInteger | RedGreenBlueInteger | RedGreenBlueAlphaInteger
        )
    }

    /// Returns `true` when red and blue are swapped relative to RGB order.
    pub fn is_bgr(&self) -> bool {
        matches!(self, ImageFormat::BlueGreenRed | ImageFormat::BlueGreenRedAlpha)
    }
}

/// Scalar type of each component of pixels in a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageDataType {
    /// Signed 8-bit.
    Byte,
    /// Unsigned 8-bit.
    UnsignedByte,
    /// Signed 16-bit.
    Short,
    /// Unsigned 16-bit.
    UnsignedShort,
    /// Signed 32-bit.
    Int,
    /// Unsigned 32-bit.
    UnsignedInt,
    /// 32-bit float.
    Float,
    /// 16-bit float.
    HalfFloat,
    /// 24-bit depth and 8-bit stencil packed in one 32-bit word.
    UnsignedInt248,
}

impl ImageDataType {
    /// Size of one component, or of the whole pixel for packed types.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ImageDataType::Byte | ImageDataType::UnsignedByte => 1,
            ImageDataType::Short | ImageDataType::UnsignedShort | ImageDataType::HalfFloat => 2,
            ImageDataType::Int
            | ImageDataType::UnsignedInt
            | ImageDataType::Float
            | ImageDataType::UnsignedInt248 => 4,
        }
    }

    /// Returns `true` when one value holds every component of a pixel.
    pub fn is_packed(&self) -> bool {
        matches!(self, ImageDataType::UnsignedInt248)
    }

    /// Returns `true` for floating-point types.
    pub fn is_float(&self) -> bool {
        matches!(self, ImageDataType::Float | ImageDataType::HalfFloat)
    }
}

/// Returns the size of one pixel with the given layout, or
/// [`ResourceError::IncompatibleTransfer`] if the pair is not a valid layout.
pub fn bytes_per_pixel(format: ImageFormat, data_type: ImageDataType) -> Result<usize, ResourceError> {
    let packed_pair = format == ImageFormat::DepthStencil || data_type.is_packed();
    let valid = if packed_pair {
        format == ImageFormat::DepthStencil && data_type.is_packed()
    } else {
        !(format.is_integer() && data_type.is_float())
    };
    if !valid {
        return Err(ResourceError::IncompatibleTransfer { format, data_type });
    }
    if data_type.is_packed() {
        Ok(data_type.size_in_bytes())
    } else {
        Ok(format.component_count() * data_type.size_in_bytes())
    }
}

/// Byte alignment of the start of each pixel row in a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RowAlignment {
    /// Rows are tightly packed.
    #[default]
    One,
    /// Rows start on 2-byte boundaries.
    Two,
    /// Rows start on 4-byte boundaries.
    Four,
    /// Rows start on 8-byte boundaries.
    Eight,
}

impl RowAlignment {
    /// Alignment in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            RowAlignment::One => 1,
            RowAlignment::Two => 2,
            RowAlignment::Four => 4,
            RowAlignment::Eight => 8,
        }
    }

    /// Rounds `length` up to the next multiple of the alignment.
    pub fn align(&self, length: usize) -> usize {
        let alignment = self.bytes();
        length.div_ceil(alignment) * alignment
    }
}

impl TryFrom<u32> for RowAlignment {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RowAlignment::One),
            2 => Ok(RowAlignment::Two),
            4 => Ok(RowAlignment::Four),
            8 => Ok(RowAlignment::Eight),
            other => Err(format!("row alignment must be 1, 2, 4 or 8, got {other}")),
        }
    }
}

impl From<RowAlignment> for u32 {
    fn from(value: RowAlignment) -> Self {
        value.bytes() as u32
    }
}

/// Describes one pixel transfer between a pixel buffer and a texture region.
///
/// The buffer side always starts at byte 0; rows are `row_stride()` bytes
/// apart and rows run bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelTransfer {
    /// Texel region of the texture.
    pub region: Rectangle,
    /// Component order in the buffer.
    pub format: ImageFormat,
    /// Component type in the buffer.
    pub data_type: ImageDataType,
    /// Row alignment in the buffer.
    pub row_alignment: RowAlignment,
}

impl PixelTransfer {
    /// A transfer covering a whole texture of `extent`.
    pub fn full(
        extent: Extent2D,
        format: ImageFormat,
        data_type: ImageDataType,
        row_alignment: RowAlignment,
    ) -> Self {
        Self {
            region: Rectangle::from_extent(extent),
            format,
            data_type,
            row_alignment,
        }
    }

    /// Size of one pixel in the buffer.
    pub fn bytes_per_pixel(&self) -> Result<usize, ResourceError> {
        bytes_per_pixel(self.format, self.data_type)
    }

    /// Bytes of pixel data in one row, without padding.
    pub fn row_length(&self) -> Result<usize, ResourceError> {
        Ok(self.region.size.width as usize * self.bytes_per_pixel()?)
    }

    /// Distance in bytes between the starts of two consecutive rows.
    pub fn row_stride(&self) -> Result<usize, ResourceError> {
        Ok(self.row_alignment.align(self.row_length()?))
    }

    /// Total bytes the transfer occupies in the buffer.
    pub fn size_in_bytes(&self) -> Result<usize, ResourceError> {
        Ok(self.row_stride()? * self.region.size.height as usize)
    }
}

/// An 8-bit RGBA pixel that can be copied straight into a pixel buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct BlittableRgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl BlittableRgba {
    /// Pixel layout to pass when transferring slices of this type.
    pub const FORMAT: ImageFormat = ImageFormat::RedGreenBlueAlpha;
    /// Component type to pass when transferring slices of this type.
    pub const DATA_TYPE: ImageDataType = ImageDataType::UnsignedByte;
    /// Size of one pixel.
    pub const SIZE_IN_BYTES: usize = std::mem::size_of::<Self>();

    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Creates a pixel.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}
