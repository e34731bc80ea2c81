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

//! GPU-backed 2D textures.

use crate::math::Rectangle;
use crate::renderer::api::{
    ImageDataType, ImageFormat, PixelTransfer, ReadPixelBufferHint, RowAlignment,
    Texture2DDescription, Texture2DFilter, TextureId,
};
use crate::renderer::error::ResourceError;
use crate::renderer::pixel_buffer::{ReadPixelBuffer, WritePixelBuffer};
use crate::renderer::traits::GraphicsDriver;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

struct TextureResource {
    id: TextureId,
    description: Texture2DDescription,
    filter: Mutex<Texture2DFilter>,
    default_row_alignment: RowAlignment,
    driver: Arc<dyn GraphicsDriver>,
}

impl Drop for TextureResource {
    fn drop(&mut self) {
        match self.driver.destroy_texture(self.id) {
            Ok(()) => log::debug!("Released texture {:?}", self.id),
            Err(e) => log::warn!("Failed to release texture {:?}: {e}", self.id),
        }
    }
}

/// A shared handle to a driver-side 2D texture.
///
/// Cloning the handle does not copy the image; the driver texture is released
/// when the last handle (including ones held by texture units) is dropped.
/// Two handles compare equal when they refer to the same texture.
#[derive(Clone)]
pub struct Texture2D {
    resource: Arc<TextureResource>,
}

impl Texture2D {
    pub(crate) fn new(
        driver: Arc<dyn GraphicsDriver>,
        description: Texture2DDescription,
        default_row_alignment: RowAlignment,
    ) -> Result<Self, ResourceError> {
        let id = driver.create_texture_2d(&description)?;
        if description.generate_mipmaps() && !description.format().is_color() {
            log::warn!(
                "Texture {id:?}: mipmaps are not generated for {:?}",
                description.format()
            );
        }
        log::debug!(
            "Created texture {id:?}: {}x{} {:?}, {} level(s)",
            description.width(),
            description.height(),
            description.format(),
            description.mipmap_levels()
        );
        Ok(Self {
            resource: Arc::new(TextureResource {
                id,
                description,
                filter: Mutex::new(Texture2DFilter::default()),
                default_row_alignment,
                driver,
            }),
        })
    }

    /// Driver handle of the texture.
    pub fn id(&self) -> TextureId {
        self.resource.id
    }

    /// The immutable description the texture was created from.
    pub fn description(&self) -> &Texture2DDescription {
        &self.resource.description
    }

    /// Current sampling state.
    pub fn filter(&self) -> Texture2DFilter {
        *self
            .resource
            .filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the sampling state. Texture units pick the change up on their
    /// next bind.
    pub fn set_filter(&self, filter: Texture2DFilter) {
        *self
            .resource
            .filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = filter;
    }

    /// Uploads the whole image from `buffer`.
    pub fn copy_from_buffer(
        &self,
        buffer: &WritePixelBuffer,
        format: ImageFormat,
        data_type: ImageDataType,
    ) -> Result<(), ResourceError> {
        let transfer = PixelTransfer::full(
            self.description().extent(),
            format,
            data_type,
            self.resource.default_row_alignment,
        );
        self.copy_from_buffer_with(buffer, &transfer)
    }

    /// Uploads a `width` x `height` rectangle at (`x`, `y`). The pixels are
    /// read from the start of `buffer`.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_from_buffer_region(
        &self,
        buffer: &WritePixelBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: ImageFormat,
        data_type: ImageDataType,
    ) -> Result<(), ResourceError> {
        let transfer = PixelTransfer {
            region: Rectangle::new(x, y, width, height),
            format,
            data_type,
            row_alignment: self.resource.default_row_alignment,
        };
        self.copy_from_buffer_with(buffer, &transfer)
    }

    /// Uploads according to an explicit transfer description.
    pub fn copy_from_buffer_with(
        &self,
        buffer: &WritePixelBuffer,
        transfer: &PixelTransfer,
    ) -> Result<(), ResourceError> {
        self.validate(transfer, buffer.size_in_bytes())?;
        if transfer.region.is_empty() {
            return Ok(());
        }
        let driver = &self.resource.driver;
        driver.upload_texture(self.id(), buffer.id(), transfer)?;

        let description = self.description();
        if description.generate_mipmaps() && description.format().is_color() {
            driver.generate_mipmaps(self.id())?;
        }
        Ok(())
    }

    /// Downloads the whole image into a new read pixel buffer sized exactly
    /// for it.
    pub fn copy_to_buffer(
        &self,
        format: ImageFormat,
        data_type: ImageDataType,
    ) -> Result<ReadPixelBuffer, ResourceError> {
        let transfer = PixelTransfer::full(
            self.description().extent(),
            format,
            data_type,
            self.resource.default_row_alignment,
        );
        self.copy_to_buffer_with(&transfer, ReadPixelBufferHint::StreamRead)
    }

    /// Downloads according to an explicit transfer description.
    pub fn copy_to_buffer_with(
        &self,
        transfer: &PixelTransfer,
        hint: ReadPixelBufferHint,
    ) -> Result<ReadPixelBuffer, ResourceError> {
        let size_in_bytes = transfer.size_in_bytes()?;
        self.validate(transfer, size_in_bytes)?;
        let buffer = ReadPixelBuffer::new(self.resource.driver.clone(), hint, size_in_bytes)?;
        if !transfer.region.is_empty() {
            self.resource
                .driver
                .download_texture(self.id(), buffer.id(), transfer)?;
        }
        Ok(buffer)
    }

    fn validate(&self, transfer: &PixelTransfer, buffer_size: usize) -> Result<(), ResourceError> {
        let required = transfer.size_in_bytes()?;
        let extent = self.description().extent();
        if !transfer.region.fits_within(extent) {
            return Err(ResourceError::OutOfBounds {
                region: transfer.region,
                extent,
            });
        }
        if required > buffer_size {
            return Err(ResourceError::SizeMismatch {
                expected: required,
                actual: buffer_size,
            });
        }
        Ok(())
    }
}

impl PartialEq for Texture2D {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl Eq for Texture2D {}

impl fmt::Debug for Texture2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture2D")
            .field("id", &self.id())
            .field("description", self.description())
            .field("filter", &self.filter())
            .finish()
    }
}
