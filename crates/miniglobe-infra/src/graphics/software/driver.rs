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

use super::conversions::TexelLayout;
use miniglobe_core::math::{Extent2D, Rectangle};
use miniglobe_core::renderer::api::mipmap;
use miniglobe_core::renderer::{
    mip_extent, GraphicsBackendType, GraphicsDriver, PixelBufferId, PixelBufferUsage,
    PixelTransfer, RendererAdapterInfo, RendererDeviceType, ResourceError, SurfaceId,
    Texture2DDescription, Texture2DFilter, TextureId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Number of texture units reported when none is configured.
pub const DEFAULT_TEXTURE_UNITS: usize = 32;

#[derive(Debug)]
struct SoftwareTexture {
    description: Texture2DDescription,
    /// One tightly packed, row-major buffer per mip level, bottom row first.
    levels: Vec<Vec<u8>>,
}

#[derive(Debug)]
struct SoftwareBuffer {
    usage: PixelBufferUsage,
    data: Vec<u8>,
}

/// A driver that keeps every resource in host memory.
///
/// Texels are stored in the texture format's own layout, so uploads and
/// downloads are plain copies (plus a red/blue swap for BGR transfers).
/// Besides serving as the fallback when no GPU is present, it exposes its
/// state (texels, bindings) for inspection.
#[derive(Debug)]
pub struct SoftwareDriver {
    texture_units: usize,
    next_id: AtomicUsize,
    surfaces: Mutex<HashMap<SurfaceId, Extent2D>>,
    textures: Mutex<HashMap<TextureId, SoftwareTexture>>,
    buffers: Mutex<HashMap<PixelBufferId, SoftwareBuffer>>,
    bindings: Mutex<HashMap<SurfaceId, Vec<Option<(TextureId, Texture2DFilter)>>>>,
}

impl Default for SoftwareDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TEXTURE_UNITS)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ResourceError> {
    mutex
        .lock()
        .map_err(|_| ResourceError::BackendError("software driver state poisoned".to_string()))
}

fn check_region(region: Rectangle, extent: Extent2D) -> Result<(), ResourceError> {
    if region.fits_within(extent) {
        Ok(())
    } else {
        Err(ResourceError::OutOfBounds { region, extent })
    }
}

impl SoftwareDriver {
    /// Creates a driver with `texture_units` binding slots.
    pub fn new(texture_units: usize) -> Self {
        log::debug!("SoftwareDriver: created with {texture_units} texture unit(s)");
        Self {
            texture_units,
            next_id: AtomicUsize::new(0),
            surfaces: Mutex::new(HashMap::new()),
            textures: Mutex::new(HashMap::new()),
            buffers: Mutex::new(HashMap::new()),
            bindings: Mutex::new(HashMap::new()),
        }
    }

    fn generate_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// What the driver currently has bound to `unit` of `surface`.
    pub fn bound_texture(
        &self,
        surface: SurfaceId,
        unit: usize,
    ) -> Option<(TextureId, Texture2DFilter)> {
        lock(&self.bindings).ok()?.get(&surface)?.get(unit).copied().flatten()
    }

    /// A copy of mip `level` of a texture, tightly packed in the texture's format.
    pub fn texture_level(&self, id: TextureId, level: u32) -> Option<Vec<u8>> {
        let textures = lock(&self.textures).ok()?;
        textures.get(&id)?.levels.get(level as usize).cloned()
    }

    /// Number of textures currently alive.
    pub fn live_textures(&self) -> usize {
        lock(&self.textures).map_or(0, |t| t.len())
    }

    /// Number of pixel buffers currently alive.
    pub fn live_pixel_buffers(&self) -> usize {
        lock(&self.buffers).map_or(0, |b| b.len())
    }

    /// Number of surfaces currently alive.
    pub fn live_surfaces(&self) -> usize {
        lock(&self.surfaces).map_or(0, |s| s.len())
    }
}

impl GraphicsDriver for SoftwareDriver {
    fn adapter_info(&self) -> RendererAdapterInfo {
        RendererAdapterInfo {
            name: "MiniGlobe Software Rasterizer".to_string(),
            backend_type: GraphicsBackendType::Software,
            device_type: RendererDeviceType::Cpu,
        }
    }

    fn max_texture_units(&self) -> usize {
        self.texture_units
    }

    fn create_surface(&self, size: Extent2D) -> Result<SurfaceId, ResourceError> {
        let id = SurfaceId(self.generate_id());
        lock(&self.surfaces)?.insert(id, size);
        lock(&self.bindings)?.insert(id, vec![None; self.texture_units]);
        Ok(id)
    }

    fn destroy_surface(&self, id: SurfaceId) -> Result<(), ResourceError> {
        lock(&self.surfaces)?
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        lock(&self.bindings)?.remove(&id);
        Ok(())
    }

    fn create_texture_2d(
        &self,
        description: &Texture2DDescription,
    ) -> Result<TextureId, ResourceError> {
        let texel_size = description.format().bytes_per_texel();
        let levels = (0..description.mipmap_levels())
            .map(|level| vec![0u8; mip_extent(description.extent(), level).area() * texel_size])
            .collect();
        let id = TextureId(self.generate_id());
        lock(&self.textures)?.insert(
            id,
            SoftwareTexture {
                description: *description,
                levels,
            },
        );
        log::trace!(
            "SoftwareDriver: created texture {id:?} ({} bytes)",
            description.approximate_size_in_bytes()
        );
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        lock(&self.textures)?
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        for binding in lock(&self.bindings)?.values_mut().flatten() {
            if matches!(binding, Some((bound, _)) if *bound == id) {
                *binding = None;
            }
        }
        Ok(())
    }

    fn upload_texture(
        &self,
        texture: TextureId,
        source: PixelBufferId,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError> {
        let buffers = lock(&self.buffers)?;
        let buffer = buffers.get(&source).ok_or(ResourceError::NotFound)?;
        if !buffer.usage.is_write() {
            return Err(ResourceError::InvalidHandle);
        }
        let mut textures = lock(&self.textures)?;
        let entry = textures.get_mut(&texture).ok_or(ResourceError::NotFound)?;
        let format = entry.description.format();
        let extent = entry.description.extent();

        check_region(transfer.region, extent)?;
        let layout = TexelLayout::resolve(format, transfer)?;
        let required = transfer.size_in_bytes()?;
        if buffer.data.len() < required {
            return Err(ResourceError::SizeMismatch {
                expected: required,
                actual: buffer.data.len(),
            });
        }

        let texel_size = format.bytes_per_texel();
        let stride = transfer.row_stride()?;
        let row_length = transfer.row_length()?;
        let Rectangle { origin, size } = transfer.region;
        let base = &mut entry.levels[0];
        for row in 0..size.height as usize {
            let src = &buffer.data[row * stride..row * stride + row_length];
            let start = ((origin.y as usize + row) * extent.width as usize + origin.x as usize)
                * texel_size;
            let dst = &mut base[start..start + row_length];
            dst.copy_from_slice(src);
            layout.apply(dst, texel_size);
        }
        Ok(())
    }

    fn download_texture(
        &self,
        texture: TextureId,
        destination: PixelBufferId,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError> {
        let mut buffers = lock(&self.buffers)?;
        let buffer = buffers
            .get_mut(&destination)
            .ok_or(ResourceError::NotFound)?;
        if buffer.usage.is_write() {
            return Err(ResourceError::InvalidHandle);
        }
        let textures = lock(&self.textures)?;
        let entry = textures.get(&texture).ok_or(ResourceError::NotFound)?;
        let format = entry.description.format();
        let extent = entry.description.extent();

        check_region(transfer.region, extent)?;
        let layout = TexelLayout::resolve(format, transfer)?;
        let required = transfer.size_in_bytes()?;
        if buffer.data.len() < required {
            return Err(ResourceError::SizeMismatch {
                expected: required,
                actual: buffer.data.len(),
            });
        }

        let texel_size = format.bytes_per_texel();
        let stride = transfer.row_stride()?;
        let row_length = transfer.row_length()?;
        let Rectangle { origin, size } = transfer.region;
        let base = &entry.levels[0];
        for row in 0..size.height as usize {
            let start = ((origin.y as usize + row) * extent.width as usize + origin.x as usize)
                * texel_size;
            let dst = &mut buffer.data[row * stride..row * stride + row_length];
            dst.copy_from_slice(&base[start..start + row_length]);
            layout.apply(dst, texel_size);
        }
        Ok(())
    }

    fn generate_mipmaps(&self, texture: TextureId) -> Result<(), ResourceError> {
        let mut textures = lock(&self.textures)?;
        let entry = textures.get_mut(&texture).ok_or(ResourceError::NotFound)?;
        let description = entry.description;
        let chain = mipmap::generate_chain(
            description.format(),
            &entry.levels[0],
            description.extent(),
            description.mipmap_levels(),
        )?;
        entry.levels.truncate(1);
        entry.levels.extend(chain);
        Ok(())
    }

    fn create_pixel_buffer(
        &self,
        usage: PixelBufferUsage,
        size_in_bytes: usize,
    ) -> Result<PixelBufferId, ResourceError> {
        let id = PixelBufferId(self.generate_id());
        lock(&self.buffers)?.insert(
            id,
            SoftwareBuffer {
                usage,
                data: vec![0; size_in_bytes],
            },
        );
        Ok(id)
    }

    fn destroy_pixel_buffer(&self, id: PixelBufferId) -> Result<(), ResourceError> {
        lock(&self.buffers)?
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotFound)
    }

    fn write_pixel_buffer(
        &self,
        id: PixelBufferId,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let mut buffers = lock(&self.buffers)?;
        let buffer = buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let available = buffer.data.len().saturating_sub(offset);
        if data.len() > available {
            return Err(ResourceError::SizeMismatch {
                expected: available,
                actual: data.len(),
            });
        }
        buffer.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_pixel_buffer(
        &self,
        id: PixelBufferId,
        offset: usize,
        length: usize,
    ) -> Result<Vec<u8>, ResourceError> {
        let buffers = lock(&self.buffers)?;
        let buffer = buffers.get(&id).ok_or(ResourceError::NotFound)?;
        let available = buffer.data.len().saturating_sub(offset);
        if length > available {
            return Err(ResourceError::SizeMismatch {
                expected: available,
                actual: length,
            });
        }
        Ok(buffer.data[offset..offset + length].to_vec())
    }

    fn bind_texture_unit(
        &self,
        surface: SurfaceId,
        unit: usize,
        texture: Option<(TextureId, Texture2DFilter)>,
    ) -> Result<(), ResourceError> {
        if let Some((id, _)) = texture {
            if !lock(&self.textures)?.contains_key(&id) {
                return Err(ResourceError::NotFound);
            }
        }
        let mut bindings = lock(&self.bindings)?;
        let units = bindings.get_mut(&surface).ok_or(ResourceError::NotFound)?;
        let count = units.len();
        let slot = units
            .get_mut(unit)
            .ok_or(ResourceError::TextureUnitOutOfRange { index: unit, count })?;
        *slot = texture;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniglobe_core::renderer::{
        ImageDataType, ImageFormat, ReadPixelBufferHint, RowAlignment, TextureFormat,
        WritePixelBufferHint,
    };

    fn rgba_texture(driver: &SoftwareDriver, width: u32, height: u32, mipmaps: bool) -> TextureId {
        let description =
            Texture2DDescription::new(width, height, TextureFormat::RedGreenBlueAlpha8, mipmaps);
        driver.create_texture_2d(&description).unwrap()
    }

    fn staged(driver: &SoftwareDriver, data: &[u8]) -> PixelBufferId {
        let id = driver
            .create_pixel_buffer(PixelBufferUsage::Write(WritePixelBufferHint::StreamDraw), data.len())
            .unwrap();
        driver.write_pixel_buffer(id, 0, data).unwrap();
        id
    }

    fn rgba(extent: Extent2D) -> PixelTransfer {
        PixelTransfer::full(
            extent,
            ImageFormat::RedGreenBlueAlpha,
            ImageDataType::UnsignedByte,
            RowAlignment::One,
        )
    }

    #[test]
    fn allocates_every_mip_level() {
        let driver = SoftwareDriver::new(4);
        let id = rgba_texture(&driver, 4, 2, true);
        assert_eq!(driver.texture_level(id, 0).map(|l| l.len()), Some(32));
        assert_eq!(driver.texture_level(id, 1).map(|l| l.len()), Some(8));
        assert_eq!(driver.texture_level(id, 2).map(|l| l.len()), Some(4));
        assert_eq!(driver.texture_level(id, 3), None);
    }

    #[test]
    fn aligned_rows_skip_padding() {
        let driver = SoftwareDriver::new(4);
        let description = Texture2DDescription::new(1, 2, TextureFormat::RedGreenBlue8, false);
        let id = driver.create_texture_2d(&description).unwrap();
        // Rows of 3 bytes padded to 4.
        let source = staged(&driver, &[1, 2, 3, 0xFF, 4, 5, 6, 0xFF]);
        let transfer = PixelTransfer::full(
            description.extent(),
            ImageFormat::RedGreenBlue,
            ImageDataType::UnsignedByte,
            RowAlignment::Four,
        );
        driver.upload_texture(id, source, &transfer).unwrap();
        assert_eq!(driver.texture_level(id, 0), Some(vec![1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn download_swizzles_bgra() {
        let driver = SoftwareDriver::new(4);
        let id = rgba_texture(&driver, 1, 1, false);
        let source = staged(&driver, &[10, 20, 30, 40]);
        driver.upload_texture(id, source, &rgba(Extent2D::new(1, 1))).unwrap();

        let destination = driver
            .create_pixel_buffer(PixelBufferUsage::Read(ReadPixelBufferHint::StreamRead), 4)
            .unwrap();
        let transfer = PixelTransfer {
            format: ImageFormat::BlueGreenRedAlpha,
            ..rgba(Extent2D::new(1, 1))
        };
        driver.download_texture(id, destination, &transfer).unwrap();
        assert_eq!(driver.read_pixel_buffer(destination, 0, 4), Ok(vec![30, 20, 10, 40]));
    }

    #[test]
    fn mipmaps_average_the_base_level() {
        let driver = SoftwareDriver::new(4);
        let id = rgba_texture(&driver, 2, 2, true);
        let source = staged(
            &driver,
            &[0, 0, 0, 0, 100, 100, 100, 100, 200, 200, 200, 200, 100, 100, 100, 100],
        );
        driver.upload_texture(id, source, &rgba(Extent2D::new(2, 2))).unwrap();
        driver.generate_mipmaps(id).unwrap();
        assert_eq!(driver.texture_level(id, 1), Some(vec![100, 100, 100, 100]));
    }

    #[test]
    fn rejects_regions_outside_the_texture() {
        let driver = SoftwareDriver::new(4);
        let id = rgba_texture(&driver, 2, 2, false);
        let source = staged(&driver, &[0; 16]);
        let transfer = PixelTransfer {
            region: Rectangle::new(1, 1, 2, 1),
            ..rgba(Extent2D::new(2, 2))
        };
        assert_eq!(
            driver.upload_texture(id, source, &transfer),
            Err(ResourceError::OutOfBounds {
                region: Rectangle::new(1, 1, 2, 1),
                extent: Extent2D::new(2, 2),
            })
        );
    }

    #[test]
    fn uploads_require_a_write_buffer() {
        let driver = SoftwareDriver::new(4);
        let id = rgba_texture(&driver, 1, 1, false);
        let read = driver
            .create_pixel_buffer(PixelBufferUsage::Read(ReadPixelBufferHint::StreamRead), 4)
            .unwrap();
        assert_eq!(
            driver.upload_texture(id, read, &rgba(Extent2D::new(1, 1))),
            Err(ResourceError::InvalidHandle)
        );
    }

    #[test]
    fn binding_tracks_units_and_destruction() {
        let driver = SoftwareDriver::new(2);
        let surface = driver.create_surface(Extent2D::new(1, 1)).unwrap();
        let id = rgba_texture(&driver, 1, 1, false);
        driver
            .bind_texture_unit(surface, 1, Some((id, Texture2DFilter::NEAREST_REPEAT)))
            .unwrap();
        assert_eq!(
            driver.bound_texture(surface, 1),
            Some((id, Texture2DFilter::NEAREST_REPEAT))
        );
        assert_eq!(
            driver.bind_texture_unit(surface, 2, None),
            Err(ResourceError::TextureUnitOutOfRange { index: 2, count: 2 })
        );

        driver.destroy_texture(id).unwrap();
        assert_eq!(driver.bound_texture(surface, 1), None);
        assert_eq!(driver.live_textures(), 0);
    }

    #[test]
    fn bindings_are_kept_per_surface() {
        let driver = SoftwareDriver::new(2);
        let first = driver.create_surface(Extent2D::new(1, 1)).unwrap();
        let second = driver.create_surface(Extent2D::new(1, 1)).unwrap();
        let a = rgba_texture(&driver, 1, 1, false);
        let b = rgba_texture(&driver, 1, 1, false);

        driver
            .bind_texture_unit(first, 0, Some((a, Texture2DFilter::NEAREST_CLAMP)))
            .unwrap();
        driver
            .bind_texture_unit(second, 0, Some((b, Texture2DFilter::LINEAR_CLAMP)))
            .unwrap();
        assert_eq!(driver.bound_texture(first, 0), Some((a, Texture2DFilter::NEAREST_CLAMP)));
        assert_eq!(driver.bound_texture(second, 0), Some((b, Texture2DFilter::LINEAR_CLAMP)));

        driver.destroy_surface(second).unwrap();
        assert_eq!(driver.bound_texture(second, 0), None);
        assert_eq!(
            driver.bind_texture_unit(second, 0, None),
            Err(ResourceError::NotFound)
        );
        assert_eq!(driver.bound_texture(first, 0), Some((a, Texture2DFilter::NEAREST_CLAMP)));
    }

    #[test]
    fn pixel_buffer_bounds_are_checked() {
        let driver = SoftwareDriver::new(1);
        let id = staged(&driver, &[1, 2, 3, 4]);
        assert_eq!(
            driver.write_pixel_buffer(id, 2, &[0, 0, 0]),
            Err(ResourceError::SizeMismatch { expected: 2, actual: 3 })
        );
        assert_eq!(driver.read_pixel_buffer(id, 1, 2), Ok(vec![2, 3]));
        driver.destroy_pixel_buffer(id).unwrap();
        assert_eq!(driver.destroy_pixel_buffer(id), Err(ResourceError::NotFound));
    }
}
