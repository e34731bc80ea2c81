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

use miniglobe_core::math::{Extent2D, Origin2D};
use miniglobe_core::renderer::{
    GraphicsBackendType, RendererDeviceType, TextureFormat, TextureMagnificationFilter,
    TextureMinificationFilter, TextureWrap,
};

/// A local extension trait to convert our renderer types into WGPU-compatible types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a WGPU-compatible type.
    fn into_wgpu(self) -> T;
}

// --- Dimensions and Origins ---

impl IntoWgpu<wgpu::Extent3d> for Extent2D {
    fn into_wgpu(self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

impl IntoWgpu<wgpu::Origin3d> for Origin2D {
    fn into_wgpu(self) -> wgpu::Origin3d {
        wgpu::Origin3d {
            x: self.x,
            y: self.y,
            z: 0,
        }
    }
}

// --- Sampling ---

impl IntoWgpu<wgpu::FilterMode> for TextureMagnificationFilter {
    fn into_wgpu(self) -> wgpu::FilterMode {
        match self {
            TextureMagnificationFilter::Nearest => wgpu::FilterMode::Nearest,
            TextureMagnificationFilter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Splits into the `(min_filter, mipmap_filter)` pair of a sampler.
impl IntoWgpu<(wgpu::FilterMode, wgpu::FilterMode)> for TextureMinificationFilter {
    fn into_wgpu(self) -> (wgpu::FilterMode, wgpu::FilterMode) {
        use wgpu::FilterMode::{Linear, Nearest};
        match self {
            TextureMinificationFilter::Nearest => (Nearest, Nearest),
            TextureMinificationFilter::Linear => (Linear, Nearest),
            TextureMinificationFilter::NearestMipmapNearest => (Nearest, Nearest),
            TextureMinificationFilter::LinearMipmapNearest => (Linear, Nearest),
            TextureMinificationFilter::NearestMipmapLinear => (Nearest, Linear),
            TextureMinificationFilter::LinearMipmapLinear => (Linear, Linear),
        }
    }
}

impl IntoWgpu<wgpu::AddressMode> for TextureWrap {
    fn into_wgpu(self) -> wgpu::AddressMode {
        match self {
            TextureWrap::Clamp | TextureWrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            TextureWrap::ClampToBorder => wgpu::AddressMode::ClampToBorder,
            TextureWrap::Repeat => wgpu::AddressMode::Repeat,
            TextureWrap::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

// --- Formats ---

/// Maps a texture format onto wgpu. Three-component formats have no wgpu
/// counterpart and yield `None`.
impl IntoWgpu<Option<wgpu::TextureFormat>> for TextureFormat {
    fn into_wgpu(self) -> Option<wgpu::TextureFormat> {
        use wgpu::TextureFormat as W;
        Some(match self {
            TextureFormat::RedGreenBlue8
            | TextureFormat::RedGreenBlue16
            | TextureFormat::SRedGreenBlue8
            | TextureFormat::RedGreenBlue16f
            | TextureFormat::RedGreenBlue32f => return None,
            TextureFormat::RedGreenBlueAlpha8 => W::Rgba8Unorm,
            TextureFormat::RedGreenBlueAlpha16 => W::Rgba16Unorm,
            TextureFormat::SRedGreenBlue8Alpha8 => W::Rgba8UnormSrgb,
            TextureFormat::Red8 => W::R8Unorm,
            TextureFormat::Red16 => W::R16Unorm,
            TextureFormat::RedGreen8 => W::Rg8Unorm,
            TextureFormat::RedGreen16 => W::Rg16Unorm,
            TextureFormat::Red16f => W::R16Float,
            TextureFormat::Red32f => W::R32Float,
            TextureFormat::RedGreen16f => W::Rg16Float,
            TextureFormat::RedGreen32f => W::Rg32Float,
            TextureFormat::RedGreenBlueAlpha16f => W::Rgba16Float,
            TextureFormat::RedGreenBlueAlpha32f => W::Rgba32Float,
            TextureFormat::Red8ui => W::R8Uint,
            TextureFormat::Red16ui => W::R16Uint,
            TextureFormat::Red32ui => W::R32Uint,
            TextureFormat::Red32i => W::R32Sint,
            TextureFormat::RedGreenBlueAlpha8ui => W::Rgba8Uint,
            TextureFormat::RedGreenBlueAlpha32ui => W::Rgba32Uint,
            TextureFormat::Depth16 => W::Depth16Unorm,
            TextureFormat::Depth24 => W::Depth24Plus,
            TextureFormat::Depth32f => W::Depth32Float,
            TextureFormat::Depth24Stencil8 => W::Depth24PlusStencil8,
        })
    }
}

// --- Adapter information ---

/// Converts a wgpu backend into the renderer's backend tag.
pub fn backend_from_wgpu(backend: wgpu::Backend) -> GraphicsBackendType {
    match backend {
        wgpu::Backend::Vulkan => GraphicsBackendType::Vulkan,
        wgpu::Backend::Metal => GraphicsBackendType::Metal,
        wgpu::Backend::Dx12 => GraphicsBackendType::Dx12,
        wgpu::Backend::Gl => GraphicsBackendType::OpenGL,
        wgpu::Backend::BrowserWebGpu => GraphicsBackendType::WebGpu,
        wgpu::Backend::Noop => GraphicsBackendType::Unknown,
    }
}

/// Converts a wgpu device type into the renderer's device type.
pub fn device_type_from_wgpu(device_type: wgpu::DeviceType) -> RendererDeviceType {
    match device_type {
        wgpu::DeviceType::IntegratedGpu => RendererDeviceType::IntegratedGpu,
        wgpu::DeviceType::DiscreteGpu => RendererDeviceType::DiscreteGpu,
        wgpu::DeviceType::VirtualGpu => RendererDeviceType::VirtualGpu,
        wgpu::DeviceType::Cpu => RendererDeviceType::Cpu,
        wgpu::DeviceType::Other => RendererDeviceType::Unknown,
    }
}
