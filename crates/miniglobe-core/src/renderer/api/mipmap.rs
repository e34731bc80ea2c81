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

//! Box-filter mip chain generation on host memory.
//!
//! Drivers that keep texels in (or can read them back to) host memory use
//! these helpers to build levels `1..n` from level `0`. Each destination texel
//! is the average of the 2x2 source block it covers; blocks are clamped at the
//! right and top edges so odd sizes never read out of range.

use super::texture::{mip_extent, TexelComponent, TextureFormat};
use crate::math::Extent2D;
use crate::renderer::error::ResourceError;
use half::f16;

/// Halves `source` (of size `extent`) in each dimension.
pub fn downsample(
    format: TextureFormat,
    source: &[u8],
    extent: Extent2D,
) -> Result<(Vec<u8>, Extent2D), ResourceError> {
    if !format.is_color() {
        return Err(ResourceError::UnsupportedFormat(format));
    }
    let texel_size = format.bytes_per_texel();
    let expected = extent.area() * texel_size;
    if source.len() != expected {
        return Err(ResourceError::SizeMismatch {
            expected,
            actual: source.len(),
        });
    }

    let component = format.component();
    let component_size = component.size_in_bytes();
    let components = format.component_count();
    let target = mip_extent(extent, 1);
    let mut output = vec![0u8; target.area() * texel_size];

    let max_x = extent.width.saturating_sub(1) as usize;
    let max_y = extent.height.saturating_sub(1) as usize;
    for y in 0..target.height as usize {
        for x in 0..target.width as usize {
            let xs = [(2 * x).min(max_x), (2 * x + 1).min(max_x)];
            let ys = [(2 * y).min(max_y), (2 * y + 1).min(max_y)];
            let out_texel = (y * target.width as usize + x) * texel_size;
            for c in 0..components {
                let mut sum = 0.0;
                for sy in ys {
                    for sx in xs {
                        let at = (sy * extent.width as usize + sx) * texel_size + c * component_size;
                        sum += read_component(component, &source[at..at + component_size]);
                    }
                }
                let at = out_texel + c * component_size;
                write_component(component, sum / 4.0, &mut output[at..at + component_size]);
            }
        }
    }
    Ok((output, target))
}

/// Builds levels `1..levels` from `base`. The returned vector holds
/// `levels - 1` entries, smallest last.
pub fn generate_chain(
    format: TextureFormat,
    base: &[u8],
    extent: Extent2D,
    levels: u32,
) -> Result<Vec<Vec<u8>>, ResourceError> {
    let mut chain = Vec::with_capacity(levels.saturating_sub(1) as usize);
    let mut current_extent = extent;
    let mut previous: Option<Vec<u8>> = None;
    for _ in 1..levels {
        let source = previous.as_deref().unwrap_or(base);
        let (level, next_extent) = downsample(format, source, current_extent)?;
        current_extent = next_extent;
        chain.push(level.clone());
        previous = Some(level);
    }
    Ok(chain)
}

fn read_component(component: TexelComponent, bytes: &[u8]) -> f64 {
    match component {
        TexelComponent::U8 => bytes[0] as f64,
        TexelComponent::U16 => bytemuck::pod_read_unaligned::<u16>(bytes) as f64,
        TexelComponent::U32 | TexelComponent::PackedDepthStencil => {
            bytemuck::pod_read_unaligned::<u32>(bytes) as f64
        }
        TexelComponent::I32 => bytemuck::pod_read_unaligned::<i32>(bytes) as f64,
        TexelComponent::F16 => bytemuck::pod_read_unaligned::<f16>(bytes).to_f64(),
        TexelComponent::F32 => bytemuck::pod_read_unaligned::<f32>(bytes) as f64,
    }
}

fn write_component(component: TexelComponent, value: f64, out: &mut [u8]) {
    match component {
        TexelComponent::U8 => out[0] = value.round().clamp(0.0, u8::MAX as f64) as u8,
        TexelComponent::U16 => {
            let v = value.round().clamp(0.0, u16::MAX as f64) as u16;
            out.copy_from_slice(bytemuck::bytes_of(&v));
        }
        TexelComponent::U32 | TexelComponent::PackedDepthStencil => {
            let v = value.round().clamp(0.0, u32::MAX as f64) as u32;
            out.copy_from_slice(bytemuck::bytes_of(&v));
        }
        TexelComponent::I32 => {
            let v = value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
            out.copy_from_slice(bytemuck::bytes_of(&v));
        }
        TexelComponent::F16 => {
            let v = f16::from_f64(value);
            out.copy_from_slice(bytemuck::bytes_of(&v));
        }
        TexelComponent::F32 => {
            let v = value as f32;
            out.copy_from_slice(bytemuck::bytes_of(&v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn float_level_is_the_block_average() {
        let texels: [f32; 4] = [1.0, 2.0, 3.0, 4.0];
        let (level, extent) = downsample(
            TextureFormat::Red32f,
            bytemuck::cast_slice(&texels),
            Extent2D::new(2, 2),
        )
        .unwrap();
        assert_eq!(extent, Extent2D::new(1, 1));
        let value: f32 = bytemuck::pod_read_unaligned(&level);
        assert_relative_eq!(value, 2.5);
    }

    #[test]
    fn odd_sizes_clamp_at_the_edge() {
        // 3x1 RGBA8 halves to one texel; the third column is not sampled.
        let texels: [u8; 12] = [0, 0, 0, 255, 100, 100, 100, 255, 200, 10, 20, 255];
        let (level, extent) =
            downsample(TextureFormat::RedGreenBlueAlpha8, &texels, Extent2D::new(3, 1)).unwrap();
        assert_eq!(extent, Extent2D::new(1, 1));
        assert_eq!(level, vec![50, 50, 50, 255]);
    }

    #[test]
    fn chain_ends_at_one_texel() {
        let texels = vec![8u8; 8 * 4];
        let chain = generate_chain(TextureFormat::Red8, &texels, Extent2D::new(8, 4), 4).unwrap();
        let sizes: Vec<usize> = chain.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![8, 2, 1]);
        assert!(chain.iter().flatten().all(|&t| t == 8));
    }

    #[test]
    fn depth_formats_are_not_filtered() {
        let texels = [0u8; 8];
        assert_eq!(
            downsample(TextureFormat::Depth16, &texels, Extent2D::new(2, 2)),
            Err(ResourceError::UnsupportedFormat(TextureFormat::Depth16))
        );
    }

    #[test]
    fn half_float_round_trips_through_average() {
        let texels = [f16::from_f32(0.5), f16::from_f32(1.5)];
        let (level, _) = downsample(
            TextureFormat::Red16f,
            bytemuck::cast_slice(&texels),
            Extent2D::new(2, 1),
        )
        .unwrap();
        let value: f16 = bytemuck::pod_read_unaligned(&level);
        assert_eq!(value.to_f32(), 1.0);
    }
}
