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

//! Staging buffers for CPU <-> GPU pixel transfer.

use crate::renderer::api::{PixelBufferId, PixelBufferUsage, ReadPixelBufferHint, WritePixelBufferHint};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDriver;
use bytemuck::Pod;
use std::sync::Arc;

/// Staging memory the CPU fills before a texture upload.
#[derive(Debug)]
pub struct WritePixelBuffer {
    id: PixelBufferId,
    size_in_bytes: usize,
    hint: WritePixelBufferHint,
    driver: Arc<dyn GraphicsDriver>,
}

impl WritePixelBuffer {
    pub(crate) fn new(
        driver: Arc<dyn GraphicsDriver>,
        hint: WritePixelBufferHint,
        size_in_bytes: usize,
    ) -> Result<Self, ResourceError> {
        let id = driver.create_pixel_buffer(PixelBufferUsage::Write(hint), size_in_bytes)?;
        log::debug!("Created write pixel buffer {id:?} ({size_in_bytes} bytes, {hint:?})");
        Ok(Self {
            id,
            size_in_bytes,
            hint,
            driver,
        })
    }

    /// Driver handle of the buffer.
    pub fn id(&self) -> PixelBufferId {
        self.id
    }

    /// Capacity of the buffer.
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    /// Usage hint the buffer was created with.
    pub fn hint(&self) -> WritePixelBufferHint {
        self.hint
    }

    /// Stages `data` at the start of the buffer.
    pub fn copy_from_system_memory<T: Pod>(&mut self, data: &[T]) -> Result<(), ResourceError> {
        self.copy_from_system_memory_at(data, 0)
    }

    /// Stages `data` starting `offset` bytes into the buffer. Bytes outside
    /// the written range keep their previous contents.
    pub fn copy_from_system_memory_at<T: Pod>(
        &mut self,
        data: &[T],
        offset: usize,
    ) -> Result<(), ResourceError> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let available = self.size_in_bytes.saturating_sub(offset);
        if offset > self.size_in_bytes || bytes.len() > available {
            return Err(ResourceError::SizeMismatch {
                expected: available,
                actual: bytes.len(),
            });
        }
        self.driver.write_pixel_buffer(self.id, offset, bytes)
    }
}

impl Drop for WritePixelBuffer {
    fn drop(&mut self) {
        if let Err(e) = self.driver.destroy_pixel_buffer(self.id) {
            log::warn!("Failed to release write pixel buffer {:?}: {e}", self.id);
        }
    }
}

/// Staging memory a texture download lands in.
#[derive(Debug)]
pub struct ReadPixelBuffer {
    id: PixelBufferId,
    size_in_bytes: usize,
    hint: ReadPixelBufferHint,
    driver: Arc<dyn GraphicsDriver>,
}

impl ReadPixelBuffer {
    pub(crate) fn new(
        driver: Arc<dyn GraphicsDriver>,
        hint: ReadPixelBufferHint,
        size_in_bytes: usize,
    ) -> Result<Self, ResourceError> {
        let id = driver.create_pixel_buffer(PixelBufferUsage::Read(hint), size_in_bytes)?;
        log::debug!("Created read pixel buffer {id:?} ({size_in_bytes} bytes, {hint:?})");
        Ok(Self {
            id,
            size_in_bytes,
            hint,
            driver,
        })
    }

    /// Driver handle of the buffer.
    pub fn id(&self) -> PixelBufferId {
        self.id
    }

    /// Size of the buffer.
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    /// Usage hint the buffer was created with.
    pub fn hint(&self) -> ReadPixelBufferHint {
        self.hint
    }

    /// Returns the whole buffer reinterpreted as a sequence of `T`.
    ///
    /// The buffer size must be a whole number of `T`s.
    pub fn copy_to_system_memory<T: Pod>(&self) -> Result<Vec<T>, ResourceError> {
        let element = std::mem::size_of::<T>();
        if element == 0 || self.size_in_bytes % element != 0 {
            return Err(ResourceError::SizeMismatch {
                expected: self.size_in_bytes - self.size_in_bytes % element.max(1),
                actual: self.size_in_bytes,
            });
        }
        let bytes = self.driver.read_pixel_buffer(self.id, 0, self.size_in_bytes)?;
        Ok(bytemuck::pod_collect_to_vec(&bytes))
    }

    /// Returns `count` values of `T` starting `offset` bytes into the buffer.
    pub fn copy_to_system_memory_range<T: Pod>(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<T>, ResourceError> {
        let available = self.size_in_bytes.saturating_sub(offset);
        let length = count.checked_mul(std::mem::size_of::<T>()).ok_or(
            ResourceError::SizeMismatch {
                expected: available,
                actual: usize::MAX,
            },
        )?;
        if offset > self.size_in_bytes || length > available {
            return Err(ResourceError::SizeMismatch {
                expected: available,
                actual: length,
            });
        }
        let bytes = self.driver.read_pixel_buffer(self.id, offset, length)?;
        Ok(bytemuck::pod_collect_to_vec(&bytes))
    }
}

impl Drop for ReadPixelBuffer {
    fn drop(&mut self) {
        if let Err(e) = self.driver.destroy_pixel_buffer(self.id) {
            log::warn!("Failed to release read pixel buffer {:?}: {e}", self.id);
        }
    }
}
