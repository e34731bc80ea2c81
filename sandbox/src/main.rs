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

// MiniGlobe Sandbox
// Headless walk-through of the resource layer: settings, device, textures,
// pixel buffers, texture units and a small mesh.

use anyhow::{Context as _, Result};
use half::f16;
use miniglobe_core::geometry::{
    Indices, Mesh, VertexAttributeDoubleVector3, VertexAttributeHalfFloatVector2,
};
use miniglobe_core::renderer::{
    BlittableRgba, DeviceSettings, ImageDataType, ImageFormat, Texture2DDescription,
    Texture2DFilter, TextureFormat, WritePixelBufferHint,
};

fn load_settings() -> Result<DeviceSettings> {
    match std::env::args().nth(1) {
        Some(path) => DeviceSettings::from_file(&path)
            .with_context(|| format!("Failed to load device settings from '{path}'")),
        None => Ok(DeviceSettings::default()),
    }
}

fn build_mesh() -> Result<Mesh> {
    let mut mesh = Mesh::new();

    let mut positions = VertexAttributeDoubleVector3::with_capacity("position", 3);
    positions.push([6_378_137.0, 0.0, 0.0]);
    positions.push([0.0, 6_378_137.0, 0.0]);
    positions.push([0.0, 0.0, 6_356_752.3]);

    let mut texture_coordinates = VertexAttributeHalfFloatVector2::with_capacity("textureCoordinates", 3);
    for [u, v] in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
        texture_coordinates.push([f16::from_f32(u), f16::from_f32(v)]);
    }

    mesh.attributes.add(positions)?;
    mesh.attributes.add(texture_coordinates)?;
    mesh.indices = Some(Indices::U16(vec![0, 1, 2]));
    mesh.validate()?;
    Ok(mesh)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let settings = load_settings()?;
    let device = miniglobe_infra::create_device(settings)?;
    let mut window = device.create_window(256, 256)?;

    // --- Texture upload and read back ---
    let pixels = [BlittableRgba::RED, BlittableRgba::GREEN, BlittableRgba::BLUE, BlittableRgba::RED];
    let mut write_buffer = device.create_write_pixel_buffer(
        WritePixelBufferHint::StreamDraw,
        std::mem::size_of_val(&pixels),
    )?;
    write_buffer.copy_from_system_memory(&pixels)?;

    let description = Texture2DDescription::new(2, 2, TextureFormat::RedGreenBlueAlpha8, true);
    let texture = device.create_texture_2d(description)?;
    texture.copy_from_buffer(&write_buffer, BlittableRgba::FORMAT, BlittableRgba::DATA_TYPE)?;

    let read_buffer = texture.copy_to_buffer(BlittableRgba::FORMAT, BlittableRgba::DATA_TYPE)?;
    let read_pixels = read_buffer.copy_to_system_memory::<BlittableRgba>()?;
    log::info!(
        "Round trip of {} bytes through a {}x{} texture ({} mip levels): {}",
        read_buffer.size_in_bytes(),
        description.width(),
        description.height(),
        description.mipmap_levels(),
        if read_pixels == pixels { "identical" } else { "MISMATCH" }
    );

    // --- Height map from raw floats ---
    let heights = device.create_texture_2d_with_data(
        Texture2DDescription::new(2, 2, TextureFormat::Red32f, false),
        &[0.0f32, 8848.0, -10_994.0, 1.0],
        ImageFormat::Red,
        ImageDataType::Float,
    )?;

    // --- Texture units ---
    texture.set_filter(Texture2DFilter::LINEAR_REPEAT);
    heights.set_filter(Texture2DFilter::NEAREST_CLAMP);
    let units = window.context_mut().texture_units_mut();
    units.set(0, Some(texture.clone()))?;
    units.set(1, Some(heights))?;
    let rebound = window.context_mut().bind_texture_units()?;
    log::info!(
        "Bound {rebound} of {} texture unit(s) on a {}x{} window",
        window.context().texture_units().len(),
        window.width(),
        window.height()
    );

    // --- Geometry ---
    let mesh = build_mesh()?;
    for attribute in mesh.attributes.iter() {
        log::info!(
            "Attribute '{}': {:?} x {} ({} bytes)",
            attribute.name(),
            attribute.attribute_type(),
            attribute.len(),
            attribute.as_bytes().len()
        );
    }
    if let Some(positions) = mesh.attributes.get::<[f64; 3]>("position") {
        let (high, low) = positions.split_emulated();
        log::debug!("Emulated double positions: high {high:?}, low {low:?}");
    }

    Ok(())
}
