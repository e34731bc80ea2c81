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

//! Provides the public, backend-agnostic resource layer of the renderer.
//!
//! Callers build value descriptions ([`Texture2DDescription`],
//! [`Texture2DFilter`], [`PixelTransfer`]), ask a [`Device`] for GPU-backed
//! resources and move pixel data through pixel buffers. Each resource owns its
//! driver object and releases it when dropped.

pub mod api;
pub mod error;
pub mod traits;

mod context;
mod device;
mod pixel_buffer;
mod texture;

#[cfg(test)]
pub(crate) mod mock;

pub use self::api::*;
pub use self::context::{Context, TextureUnit, TextureUnits, Window};
pub use self::device::Device;
pub use self::error::ResourceError;
pub use self::pixel_buffer::{ReadPixelBuffer, WritePixelBuffer};
pub use self::texture::Texture2D;
pub use self::traits::GraphicsDriver;
