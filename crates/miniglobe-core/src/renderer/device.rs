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

//! The resource factory.

use crate::math::Extent2D;
use crate::renderer::api::{
    DeviceSettings, ImageDataType, ImageFormat, ReadPixelBufferHint, RendererAdapterInfo,
    Texture2DDescription, WritePixelBufferHint,
};
use crate::renderer::context::Window;
use crate::renderer::error::ResourceError;
use crate::renderer::pixel_buffer::{ReadPixelBuffer, WritePixelBuffer};
use crate::renderer::texture::Texture2D;
use crate::renderer::traits::GraphicsDriver;
use bytemuck::Pod;
use std::sync::Arc;

/// Creates windows, textures and pixel buffers on a [`GraphicsDriver`].
///
/// Every resource keeps a reference to the driver, so they may outlive the
/// device that created them.
#[derive(Debug, Clone)]
pub struct Device {
    driver: Arc<dyn GraphicsDriver>,
    settings: DeviceSettings,
}

impl Device {
    /// Wraps a driver.
    pub fn new(driver: Arc<dyn GraphicsDriver>, settings: DeviceSettings) -> Self {
        let info = driver.adapter_info();
        log::info!(
            "Device created on '{}' ({:?}, {:?}), {} texture unit(s)",
            info.name,
            info.backend_type,
            info.device_type,
            settings.texture_unit_count(driver.max_texture_units())
        );
        Self { driver, settings }
    }

    /// The driver this device creates resources on.
    pub fn driver(&self) -> &Arc<dyn GraphicsDriver> {
        &self.driver
    }

    /// The settings the device was created with.
    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    /// Information about the adapter behind the driver.
    pub fn adapter_info(&self) -> RendererAdapterInfo {
        self.driver.adapter_info()
    }

    /// Number of texture units each new context gets.
    pub fn texture_unit_count(&self) -> usize {
        self.settings
            .texture_unit_count(self.driver.max_texture_units())
    }

    /// Creates a render surface of `width` x `height` pixels and its context.
    pub fn create_window(&self, width: u32, height: u32) -> Result<Window, ResourceError> {
        Window::new(
            self.driver.clone(),
            Extent2D::new(width, height),
            self.texture_unit_count(),
        )
    }

    /// Creates a texture with undefined contents.
    pub fn create_texture_2d(
        &self,
        description: Texture2DDescription,
    ) -> Result<Texture2D, ResourceError> {
        Texture2D::new(
            self.driver.clone(),
            description,
            self.settings.default_row_alignment,
        )
    }

    /// Creates a texture and uploads `data`, laid out as `format`/`data_type`,
    /// as its whole image.
    pub fn create_texture_2d_with_data<T: Pod>(
        &self,
        description: Texture2DDescription,
        data: &[T],
        format: ImageFormat,
        data_type: ImageDataType,
    ) -> Result<Texture2D, ResourceError> {
        let texture = self.create_texture_2d(description)?;
        let mut buffer = self.create_write_pixel_buffer(
            WritePixelBufferHint::StreamDraw,
            std::mem::size_of_val(data),
        )?;
        buffer.copy_from_system_memory(data)?;
        texture.copy_from_buffer(&buffer, format, data_type)?;
        Ok(texture)
    }

    /// Creates a zeroed staging buffer for uploads.
    pub fn create_write_pixel_buffer(
        &self,
        hint: WritePixelBufferHint,
        size_in_bytes: usize,
    ) -> Result<WritePixelBuffer, ResourceError> {
        WritePixelBuffer::new(self.driver.clone(), hint, size_in_bytes)
    }

    /// Creates a zeroed staging buffer for downloads.
    pub fn create_read_pixel_buffer(
        &self,
        hint: ReadPixelBufferHint,
        size_in_bytes: usize,
    ) -> Result<ReadPixelBuffer, ResourceError> {
        ReadPixelBuffer::new(self.driver.clone(), hint, size_in_bytes)
    }
}
