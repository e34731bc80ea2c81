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

use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The native graphics driver as seen by the resource layer.
///
/// Implementations own every driver-side object and hand out opaque IDs. The
/// wrappers in this crate ([`Texture2D`](crate::Texture2D),
/// [`WritePixelBuffer`](crate::WritePixelBuffer), ...) validate arguments
/// before calling in and release their IDs when dropped.
pub trait GraphicsDriver: Send + Sync + Debug + 'static {
    /// Get the adapter information of the driver.
    fn adapter_info(&self) -> RendererAdapterInfo;

    /// Number of texture units a context can bind at once.
    fn max_texture_units(&self) -> usize;

    /// Creates an offscreen render surface.
    /// ## Errors
    /// * `ResourceError` - If the surface cannot be allocated.
    fn create_surface(&self, size: Extent2D) -> Result<SurfaceId, ResourceError>;

    /// Destroys a render surface.
    fn destroy_surface(&self, id: SurfaceId) -> Result<(), ResourceError>;

    /// Allocates a 2D texture with every mip level the description asks for.
    /// Texel contents are undefined until uploaded.
    /// ## Errors
    /// * `ResourceError::UnsupportedFormat` - If the driver cannot store the format.
    fn create_texture_2d(
        &self,
        description: &Texture2DDescription,
    ) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Copies `transfer.region` of level 0 from a write pixel buffer into the texture.
    /// Texels outside the region keep their values.
    fn upload_texture(
        &self,
        texture: TextureId,
        source: PixelBufferId,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError>;

    /// Copies `transfer.region` of level 0 into a read pixel buffer.
    fn download_texture(
        &self,
        texture: TextureId,
        destination: PixelBufferId,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError>;

    /// Rebuilds levels `1..n` of the texture from level 0.
    fn generate_mipmaps(&self, texture: TextureId) -> Result<(), ResourceError>;

    /// Allocates `size_in_bytes` of zeroed staging memory.
    fn create_pixel_buffer(
        &self,
        usage: PixelBufferUsage,
        size_in_bytes: usize,
    ) -> Result<PixelBufferId, ResourceError>;

    /// Destroys a pixel buffer.
    fn destroy_pixel_buffer(&self, id: PixelBufferId) -> Result<(), ResourceError>;

    /// Writes `data` into a pixel buffer at byte `offset`.
    fn write_pixel_buffer(
        &self,
        id: PixelBufferId,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError>;

    /// Reads `length` bytes of a pixel buffer starting at byte `offset`.
    fn read_pixel_buffer(
        &self,
        id: PixelBufferId,
        offset: usize,
        length: usize,
    ) -> Result<Vec<u8>, ResourceError>;

    /// Binds `texture` with `filter` to a texture unit of `surface`, or
    /// clears the unit when `texture` is `None`.
    ///
    /// Each surface has its own set of units; binding on one surface never
    /// changes what another surface has bound.
    /// ## Errors
    /// * `ResourceError::NotFound` - If the surface or the texture does not exist.
    fn bind_texture_unit(
        &self,
        surface: SurfaceId,
        unit: usize,
        texture: Option<(TextureId, Texture2DFilter)>,
    ) -> Result<(), ResourceError>;
}
