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

//! Recording driver used by the unit tests of this crate.

use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDriver;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DriverCall {
    CreateSurface(SurfaceId),
    DestroySurface(SurfaceId),
    CreateTexture(TextureId),
    DestroyTexture(TextureId),
    Upload(TextureId, PixelBufferId, PixelTransfer),
    Download(TextureId, PixelBufferId, PixelTransfer),
    GenerateMipmaps(TextureId),
    Bind(SurfaceId, usize, Option<(TextureId, Texture2DFilter)>),
}

/// Keeps pixel buffers in memory and records every texture-level call.
#[derive(Debug)]
pub(crate) struct MockDriver {
    units: usize,
    next_id: AtomicUsize,
    buffers: Mutex<HashMap<PixelBufferId, Vec<u8>>>,
    calls: Mutex<Vec<DriverCall>>,
}

impl MockDriver {
    pub(crate) fn new(units: usize) -> Self {
        Self {
            units,
            next_id: AtomicUsize::new(0),
            buffers: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn live_buffers(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, call: DriverCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GraphicsDriver for MockDriver {
    fn adapter_info(&self) -> RendererAdapterInfo {
        RendererAdapterInfo {
            name: "Mock".to_string(),
            backend_type: GraphicsBackendType::Software,
            device_type: RendererDeviceType::Cpu,
        }
    }

    fn max_texture_units(&self) -> usize {
        self.units
    }

    fn create_surface(&self, _size: Extent2D) -> Result<SurfaceId, ResourceError> {
        let id = SurfaceId(self.next());
        self.record(DriverCall::CreateSurface(id));
        Ok(id)
    }

    fn destroy_surface(&self, id: SurfaceId) -> Result<(), ResourceError> {
        self.record(DriverCall::DestroySurface(id));
        Ok(())
    }

    fn create_texture_2d(
        &self,
        _description: &Texture2DDescription,
    ) -> Result<TextureId, ResourceError> {
        let id = TextureId(self.next());
        self.record(DriverCall::CreateTexture(id));
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.record(DriverCall::DestroyTexture(id));
        Ok(())
    }

    fn upload_texture(
        &self,
        texture: TextureId,
        source: PixelBufferId,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError> {
        self.record(DriverCall::Upload(texture, source, *transfer));
        Ok(())
    }

    fn download_texture(
        &self,
        texture: TextureId,
        destination: PixelBufferId,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError> {
        self.record(DriverCall::Download(texture, destination, *transfer));
        Ok(())
    }

    fn generate_mipmaps(&self, texture: TextureId) -> Result<(), ResourceError> {
        self.record(DriverCall::GenerateMipmaps(texture));
        Ok(())
    }

    fn create_pixel_buffer(
        &self,
        _usage: PixelBufferUsage,
        size_in_bytes: usize,
    ) -> Result<PixelBufferId, ResourceError> {
        let id = PixelBufferId(self.next());
        self.buffers.lock().unwrap().insert(id, vec![0; size_in_bytes]);
        Ok(id)
    }

    fn destroy_pixel_buffer(&self, id: PixelBufferId) -> Result<(), ResourceError> {
        self.buffers
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::InvalidHandle)
    }

    fn write_pixel_buffer(
        &self,
        id: PixelBufferId,
        offset: usize,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let mut buffers = self.buffers.lock().unwrap();
        let buffer = buffers.get_mut(&id).ok_or(ResourceError::InvalidHandle)?;
        buffer[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_pixel_buffer(
        &self,
        id: PixelBufferId,
        offset: usize,
        length: usize,
    ) -> Result<Vec<u8>, ResourceError> {
        let buffers = self.buffers.lock().unwrap();
        let buffer = buffers.get(&id).ok_or(ResourceError::InvalidHandle)?;
        Ok(buffer[offset..offset + length].to_vec())
    }

    fn bind_texture_unit(
        &self,
        surface: SurfaceId,
        unit: usize,
        texture: Option<(TextureId, Texture2DFilter)>,
    ) -> Result<(), ResourceError> {
        self.record(DriverCall::Bind(surface, unit, texture));
        Ok(())
    }
}
