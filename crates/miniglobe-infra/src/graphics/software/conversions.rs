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

//! Maps client pixel layouts onto the texel layout of a texture format.

use miniglobe_core::renderer::{ImageFormat, PixelTransfer, ResourceError, TextureFormat};

/// How the pixels of a transfer relate to the texels they land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TexelLayout {
    /// Same bytes on both sides.
    Identity,
    /// Red and blue components are swapped. Swapping is its own inverse, so
    /// the same layout serves uploads and downloads.
    SwapRedBlue { component_size: usize },
}

impl TexelLayout {
    /// Resolves the layout for `transfer` against `texture_format`.
    ///
    /// Only transfers that keep the component type are supported; a
    /// conversion between component types fails with
    /// [`ResourceError::UnsupportedTransfer`].
    pub(crate) fn resolve(
        texture_format: TextureFormat,
        transfer: &PixelTransfer,
    ) -> Result<Self, ResourceError> {
        // Rejects invalid format/type pairs with `IncompatibleTransfer` first.
        transfer.bytes_per_pixel()?;

        let (native_format, native_type) = texture_format.native_transfer();
        if transfer.data_type == native_type {
            match (native_format, transfer.format) {
                (a, b) if a == b => return Ok(Self::Identity),
                (ImageFormat::RedGreenBlue, ImageFormat::BlueGreenRed)
                | (ImageFormat::RedGreenBlueAlpha, ImageFormat::BlueGreenRedAlpha) => {
                    return Ok(Self::SwapRedBlue {
                        component_size: native_type.size_in_bytes(),
                    })
                }
                _ => {}
            }
        }
        Err(ResourceError::UnsupportedTransfer {
            texture_format,
            format: transfer.format,
            data_type: transfer.data_type,
        })
    }

    /// Rewrites a run of whole texels of `texel_size` bytes in place.
    pub(crate) fn apply(&self, texels: &mut [u8], texel_size: usize) {
        match *self {
            Self::Identity => {}
            Self::SwapRedBlue { component_size } => {
                for texel in texels.chunks_exact_mut(texel_size) {
                    let (red, rest) = texel.split_at_mut(component_size);
                    let blue = &mut rest[component_size..2 * component_size];
                    red.swap_with_slice(blue);
                }
            }
        }
    }
}
