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

use super::conversions::{backend_from_wgpu, device_type_from_wgpu, IntoWgpu};
use anyhow::{anyhow, Result};
use miniglobe_core::math::{Extent2D, Rectangle};
use miniglobe_core::renderer::api::mipmap;
use miniglobe_core::renderer::{
    mip_extent, GraphicsDriver, PixelBufferId, PixelBufferUsage, PixelTransfer,
    RendererAdapterInfo, ResourceError, SurfaceId, Texture2DDescription, Texture2DFilter,
    TextureFormat, TextureId, TextureWrap,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex, MutexGuard};

/// Optional device features used when the adapter offers them.
const OPTIONAL_FEATURES: wgpu::Features = wgpu::Features::TEXTURE_FORMAT_16BIT_NORM
    .union(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);

#[derive(Debug)]
struct WgpuTextureEntry {
    texture: wgpu::Texture,
    description: Texture2DDescription,
}

/// Pixel buffers live in host memory; transfers go through the queue.
#[derive(Debug)]
struct PixelBufferEntry {
    usage: PixelBufferUsage,
    data: Vec<u8>,
}

#[derive(Debug)]
struct WgpuBinding {
    texture: TextureId,
    filter: Texture2DFilter,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

/// A headless [`GraphicsDriver`] backed by a wgpu device.
///
/// Surfaces are offscreen render targets. Texture units hold the view and
/// sampler that a draw would bind.
#[derive(Debug)]
pub struct WgpuDriver {
    adapter_info: RendererAdapterInfo,
    device: wgpu::Device,
    queue: wgpu::Queue,
    texture_units: usize,
    next_id: AtomicUsize,
    surfaces: Mutex<HashMap<SurfaceId, wgpu::Texture>>,
    textures: Mutex<HashMap<TextureId, WgpuTextureEntry>>,
    buffers: Mutex<HashMap<PixelBufferId, PixelBufferEntry>>,
    bindings: Mutex<HashMap<SurfaceId, Vec<Option<WgpuBinding>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ResourceError> {
    mutex
        .lock()
        .map_err(|_| ResourceError::BackendError("wgpu driver state poisoned".to_string()))
}

impl WgpuDriver {
    /// Opens the first suitable adapter without a presentation surface.
    ///
    /// ## Returns
    /// * `Result<Self>` - The driver, or an error if no adapter or device could be obtained.
    pub fn new_headless() -> Result<Self> {
        pollster::block_on(Self::new_headless_async())
    }

    async fn new_headless_async() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to find a suitable graphics adapter: {}", e))?;

        let info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            info.name,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("MiniGlobe Logical Device"),
                required_features: adapter.features() & OPTIONAL_FEATURES,
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| anyhow!("Failed to create logical device: {}", e))?;

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        let texture_units = device.limits().max_sampled_textures_per_shader_stage as usize;
        log::debug!(
            "Active device features: {:?}, {texture_units} texture unit(s)",
            device.features()
        );

        Ok(Self {
            adapter_info: RendererAdapterInfo {
                name: info.name,
                backend_type: backend_from_wgpu(info.backend),
                device_type: device_type_from_wgpu(info.device_type),
            },
            device,
            queue,
            texture_units,
            next_id: AtomicUsize::new(0),
            surfaces: Mutex::new(HashMap::new()),
            textures: Mutex::new(HashMap::new()),
            buffers: Mutex::new(HashMap::new()),
            bindings: Mutex::new(HashMap::new()),
        })
    }

    fn generate_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// The texture and filter bound to `unit` of `surface`.
    pub fn bound_texture(
        &self,
        surface: SurfaceId,
        unit: usize,
    ) -> Option<(TextureId, Texture2DFilter)> {
        let bindings = lock(&self.bindings).ok()?;
        let binding = bindings.get(&surface)?.get(unit)?.as_ref()?;
        Some((binding.texture, binding.filter))
    }

    /// The view and sampler a draw on `surface` would bind for `unit`.
    pub fn bound_resources(
        &self,
        surface: SurfaceId,
        unit: usize,
    ) -> Option<(wgpu::TextureView, wgpu::Sampler)> {
        let bindings = lock(&self.bindings).ok()?;
        let binding = bindings.get(&surface)?.get(unit)?.as_ref()?;
        Some((binding.view.clone(), binding.sampler.clone()))
    }

    /// Runs `operation` inside a validation error scope so wgpu validation
    /// failures surface as `ResourceError::BackendError` instead of the
    /// uncaptured error handler.
    fn validated<R>(&self, operation: impl FnOnce(&wgpu::Device) -> R) -> Result<R, ResourceError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let result = operation(&self.device);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(e) => Err(ResourceError::BackendError(e.to_string())),
            None => Ok(result),
        }
    }

    fn wgpu_format(&self, format: TextureFormat) -> Result<wgpu::TextureFormat, ResourceError> {
        let wgpu_format: Option<wgpu::TextureFormat> = format.into_wgpu();
        match wgpu_format {
            Some(f) if self.device.features().contains(f.required_features()) => Ok(f),
            _ => Err(ResourceError::UnsupportedFormat(format)),
        }
    }

    /// Uploads can only use the texel layout of the format itself.
    fn check_native(format: TextureFormat, transfer: &PixelTransfer) -> Result<(), ResourceError> {
        transfer.bytes_per_pixel()?;
        if format.is_color() && (transfer.format, transfer.data_type) == format.native_transfer() {
            Ok(())
        } else {
            Err(ResourceError::UnsupportedTransfer {
                texture_format: format,
                format: transfer.format,
                data_type: transfer.data_type,
            })
        }
    }

    fn write_level(
        &self,
        texture: &wgpu::Texture,
        level: u32,
        region: Rectangle,
        data: &[u8],
        bytes_per_row: usize,
    ) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: level,
                origin: region.origin.into_wgpu(),
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row as u32),
                rows_per_image: Some(region.size.height),
            },
            region.size.into_wgpu(),
        );
    }

    /// Reads `region` of a mip level back to host memory, tightly packed.
    fn read_level(
        &self,
        texture: &wgpu::Texture,
        level: u32,
        region: Rectangle,
        texel_size: usize,
    ) -> Result<Vec<u8>, ResourceError> {
        let row_length = region.size.width as usize * texel_size;
        let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
        let padded_row = row_length.div_ceil(alignment) * alignment;
        let height = region.size.height as usize;

        let staging = self.validated(|device| {
            let staging = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("MiniGlobe Readback Buffer"),
                size: (padded_row * height) as u64,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            });
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("MiniGlobe Readback Encoder"),
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    texture,
                    mip_level: level,
                    origin: region.origin.into_wgpu(),
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &staging,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_row as u32),
                        rows_per_image: Some(region.size.height),
                    },
                },
                region.size.into_wgpu(),
            );
            self.queue.submit(Some(encoder.finish()));
            staging
        })?;

        let slice = staging.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| ResourceError::BackendError(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| ResourceError::BackendError(e.to_string()))?
            .map_err(|e| ResourceError::BackendError(e.to_string()))?;

        let mut texels = Vec::with_capacity(row_length * height);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks(padded_row).take(height) {
                texels.extend_from_slice(&row[..row_length]);
            }
        }
        staging.unmap();
        Ok(texels)
    }

    fn create_sampler(&self, filter: &Texture2DFilter) -> wgpu::Sampler {
        let (min_filter, mipmap_filter) = filter.minification_filter().into_wgpu();
        let mag_filter = filter.magnification_filter().into_wgpu();
        let all_linear = [min_filter, mag_filter, mipmap_filter]
            .iter()
            .all(|f| *f == wgpu::FilterMode::Linear);
        let anisotropy_clamp = if all_linear {
            filter.maximum_anisotropic().clamp(1.0, 16.0) as u16
        } else {
            1
        };

        let border_supported = self
            .device
            .features()
            .contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);
        let address_mode = |wrap: TextureWrap| -> wgpu::AddressMode {
            match wrap {
                TextureWrap::ClampToBorder if !border_supported => {
                    log::debug!("Clamp-to-border unavailable, using clamp-to-edge");
                    wgpu::AddressMode::ClampToEdge
                }
                other => other.into_wgpu(),
            }
        };
        let address_mode_u = address_mode(filter.wrap_s());
        let address_mode_v = address_mode(filter.wrap_t());
        let border_color = [address_mode_u, address_mode_v]
            .contains(&wgpu::AddressMode::ClampToBorder)
            .then_some(wgpu::SamplerBorderColor::TransparentBlack);

        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("MiniGlobe Texture Unit Sampler"),
            address_mode_u,
            address_mode_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter,
            min_filter,
            mipmap_filter,
            lod_min_clamp: 0.0,
            lod_max_clamp: if filter.minification_filter().uses_mipmaps() {
                32.0
            } else {
                0.0
            },
            compare: None,
            anisotropy_clamp,
            border_color,
        })
    }
}

impl GraphicsDriver for WgpuDriver {
    fn adapter_info(&self) -> RendererAdapterInfo {
        self.adapter_info.clone()
    }

    fn max_texture_units(&self) -> usize {
        self.texture_units
    }

    fn create_surface(&self, size: Extent2D) -> Result<SurfaceId, ResourceError> {
        let size = Extent2D::new(size.width.max(1), size.height.max(1));
        let texture = self.validated(|device| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("MiniGlobe Offscreen Surface"),
                size: size.into_wgpu(),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        })?;
        let id = SurfaceId(self.generate_id());
        lock(&self.surfaces)?.insert(id, texture);
        lock(&self.bindings)?.insert(id, (0..self.texture_units).map(|_| None).collect());
        Ok(id)
    }

    fn destroy_surface(&self, id: SurfaceId) -> Result<(), ResourceError> {
        let texture = lock(&self.surfaces)?
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        lock(&self.bindings)?.remove(&id);
        texture.destroy();
        Ok(())
    }

    fn create_texture_2d(
        &self,
        description: &Texture2DDescription,
    ) -> Result<TextureId, ResourceError> {
        let format = self.wgpu_format(description.format())?;
        let usage = if description.format().is_color() {
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC
        } else {
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT
        };
        let texture = self.validated(|device| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: None,
                size: description.extent().into_wgpu(),
                mip_level_count: description.mipmap_levels(),
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        })?;
        let id = TextureId(self.generate_id());
        lock(&self.textures)?.insert(
            id,
            WgpuTextureEntry {
                texture,
                description: *description,
            },
        );
        log::debug!(
            "WgpuDriver: Created texture {id:?} as {format:?}, approx. {} bytes (VRAM)",
            description.approximate_size_in_bytes()
        );
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let entry = lock(&self.textures)?
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        for binding in lock(&self.bindings)?.values_mut().flatten() {
            if binding.as_ref().is_some_and(|b| b.texture == id) {
                *binding = None;
            }
        }
        entry.texture.destroy();
        log::debug!("WgpuDriver: Destroyed texture with ID: {id:?}");
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
        let textures = lock(&self.textures)?;
        let entry = textures.get(&texture).ok_or(ResourceError::NotFound)?;
        let extent = entry.description.extent();
        if !transfer.region.fits_within(extent) {
            return Err(ResourceError::OutOfBounds {
                region: transfer.region,
                extent,
            });
        }
        Self::check_native(entry.description.format(), transfer)?;
        if transfer.region.is_empty() {
            return Ok(());
        }
        let required = transfer.size_in_bytes()?;
        let data = buffer.data.get(..required).ok_or(ResourceError::SizeMismatch {
            expected: required,
            actual: buffer.data.len(),
        })?;

        self.write_level(&entry.texture, 0, transfer.region, data, transfer.row_stride()?);
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
        if !transfer.region.fits_within(extent) {
            return Err(ResourceError::OutOfBounds {
                region: transfer.region,
                extent,
            });
        }
        Self::check_native(format, transfer)?;
        if transfer.region.is_empty() {
            return Ok(());
        }
        let required = transfer.size_in_bytes()?;
        if buffer.data.len() < required {
            return Err(ResourceError::SizeMismatch {
                expected: required,
                actual: buffer.data.len(),
            });
        }

        let texels = self.read_level(&entry.texture, 0, transfer.region, format.bytes_per_texel())?;
        let stride = transfer.row_stride()?;
        let row_length = transfer.row_length()?;
        for (row, texels) in texels.chunks(row_length).enumerate() {
            buffer.data[row * stride..row * stride + row_length].copy_from_slice(texels);
        }
        Ok(())
    }

    fn generate_mipmaps(&self, texture: TextureId) -> Result<(), ResourceError> {
        let textures = lock(&self.textures)?;
        let entry = textures.get(&texture).ok_or(ResourceError::NotFound)?;
        let description = entry.description;
        let format = description.format();
        let extent = description.extent();

        let base = self.read_level(
            &entry.texture,
            0,
            Rectangle::from_extent(extent),
            format.bytes_per_texel(),
        )?;
        let chain = mipmap::generate_chain(format, &base, extent, description.mipmap_levels())?;
        for (level, texels) in (1u32..).zip(chain.iter()) {
            let level_extent = mip_extent(extent, level);
            self.write_level(
                &entry.texture,
                level,
                Rectangle::from_extent(level_extent),
                texels,
                level_extent.width as usize * format.bytes_per_texel(),
            );
        }
        log::trace!("WgpuDriver: Regenerated {} mip level(s) of {texture:?}", chain.len());
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
            PixelBufferEntry {
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
        let binding = match texture {
            Some((id, filter)) => {
                let textures = lock(&self.textures)?;
                let entry = textures.get(&id).ok_or(ResourceError::NotFound)?;
                Some(WgpuBinding {
                    texture: id,
                    filter,
                    view: entry.texture.create_view(&wgpu::TextureViewDescriptor::default()),
                    sampler: self.create_sampler(&filter),
                })
            }
            None => None,
        };
        let mut bindings = lock(&self.bindings)?;
        let units = bindings.get_mut(&surface).ok_or(ResourceError::NotFound)?;
        let count = units.len();
        let slot = units
            .get_mut(unit)
            .ok_or(ResourceError::TextureUnitOutOfRange { index: unit, count })?;
        *slot = binding;
        Ok(())
    }
}
