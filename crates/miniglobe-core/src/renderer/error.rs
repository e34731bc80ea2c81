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

//! Defines the error type for resource creation and pixel transfers.

use crate::math::{Extent2D, Rectangle};
use crate::renderer::api::{ImageDataType, ImageFormat, TextureFormat};
use std::fmt;

/// An error related to the creation or use of a GPU resource (textures,
/// pixel buffers, surfaces, texture units).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// No resource is registered under the given handle.
    NotFound,
    /// The handle refers to a resource of the wrong kind.
    InvalidHandle,
    /// A byte count did not match what the operation needs.
    SizeMismatch {
        /// Bytes the operation required or had room for.
        expected: usize,
        /// Bytes that were provided.
        actual: usize,
    },
    /// A texel region extends past the texture.
    OutOfBounds {
        /// The requested region.
        region: Rectangle,
        /// The size of the texture.
        extent: Extent2D,
    },
    /// The format/data type pair does not describe a valid pixel layout.
    IncompatibleTransfer {
        /// The pixel buffer layout.
        format: ImageFormat,
        /// The pixel buffer component type.
        data_type: ImageDataType,
    },
    /// The driver cannot convert between the pixel layout and the texture format.
    UnsupportedTransfer {
        /// Storage format of the texture.
        texture_format: TextureFormat,
        /// The pixel buffer layout.
        format: ImageFormat,
        /// The pixel buffer component type.
        data_type: ImageDataType,
    },
    /// The driver has no storage for this texture format.
    UnsupportedFormat(TextureFormat),
    /// A texture unit index past the end of the context's units.
    TextureUnitOutOfRange {
        /// The requested unit.
        index: usize,
        /// Number of units in the context.
        count: usize,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::SizeMismatch { expected, actual } => {
                write!(f, "Size mismatch: expected {expected} bytes, got {actual}")
            }
            ResourceError::OutOfBounds { region, extent } => write!(
                f,
                "Region {}x{} at ({}, {}) exceeds texture of {}x{}",
                region.size.width,
                region.size.height,
                region.origin.x,
                region.origin.y,
                extent.width,
                extent.height
            ),
            ResourceError::IncompatibleTransfer { format, data_type } => {
                write!(f, "Invalid pixel layout: {format:?} with {data_type:?}")
            }
            ResourceError::UnsupportedTransfer {
                texture_format,
                format,
                data_type,
            } => write!(
                f,
                "Cannot transfer {format:?}/{data_type:?} pixels to or from a {texture_format:?} texture"
            ),
            ResourceError::UnsupportedFormat(format) => {
                write!(f, "Texture format {format:?} is not supported by this driver")
            }
            ResourceError::TextureUnitOutOfRange { index, count } => {
                write!(f, "Texture unit {index} is out of range (count: {count})")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}
