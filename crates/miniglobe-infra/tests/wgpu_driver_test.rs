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

//! These tests need a physical or software GPU adapter; they are skipped
//! when none can be opened.

use miniglobe_core::renderer::{
    BlittableRgba, DeviceSettings, GraphicsDriver, ImageDataType, ImageFormat, ResourceError,
    Texture2DDescription, Texture2DFilter, TextureFormat,
};
use miniglobe_core::Device;
use miniglobe_infra::graphics::wgpu::WgpuDriver;
use std::sync::Arc;

fn wgpu_device() -> Option<Device> {
    match WgpuDriver::new_headless() {
        Ok(driver) => Some(Device::new(Arc::new(driver), DeviceSettings::default())),
        Err(e) => {
            println!("Skipping wgpu test: {e}");
            None
        }
    }
}

#[test]
fn test_wgpu_rgba_round_trip() {
    let Some(device) = wgpu_device() else {
        return;
    };
    let pixels = [BlittableRgba::RED, BlittableRgba::GREEN, BlittableRgba::BLUE];
    let texture = device
        .create_texture_2d_with_data(
            Texture2DDescription::new(3, 1, TextureFormat::RedGreenBlueAlpha8, false),
            &pixels,
            BlittableRgba::FORMAT,
            BlittableRgba::DATA_TYPE,
        )
        .unwrap();
    let read = texture
        .copy_to_buffer(BlittableRgba::FORMAT, BlittableRgba::DATA_TYPE)
        .unwrap();
    assert_eq!(read.copy_to_system_memory::<BlittableRgba>().unwrap(), pixels);
}

#[test]
fn test_wgpu_sub_image_with_mipmaps() {
    let Some(device) = wgpu_device() else {
        return;
    };
    let texture = device
        .create_texture_2d_with_data(
            Texture2DDescription::new(2, 2, TextureFormat::Red32f, true),
            &[1.0f32, 2.0, 3.0, 4.0],
            ImageFormat::Red,
            ImageDataType::Float,
        )
        .unwrap();
    let mut buffer = device
        .create_write_pixel_buffer(Default::default(), 4)
        .unwrap();
    buffer.copy_from_system_memory(&[9.0f32]).unwrap();
    texture
        .copy_from_buffer_region(&buffer, 1, 1, 1, 1, ImageFormat::Red, ImageDataType::Float)
        .unwrap();

    let read = texture
        .copy_to_buffer(ImageFormat::Red, ImageDataType::Float)
        .unwrap();
    assert_eq!(read.copy_to_system_memory::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 9.0]);
}

#[test]
fn test_wgpu_rejects_three_component_formats() {
    let Some(device) = wgpu_device() else {
        return;
    };
    let result = device.create_texture_2d(Texture2DDescription::new(
        2,
        2,
        TextureFormat::RedGreenBlue8,
        false,
    ));
    assert_eq!(
        result.err(),
        Some(ResourceError::UnsupportedFormat(TextureFormat::RedGreenBlue8))
    );
}

#[test]
fn test_wgpu_binds_texture_units() {
    let Some(device) = wgpu_device() else {
        return;
    };
    assert!(device.driver().max_texture_units() > 0);
    let mut window = device.create_window(16, 16).unwrap();
    let texture = device
        .create_texture_2d(Texture2DDescription::new(4, 4, TextureFormat::RedGreenBlueAlpha8, true))
        .unwrap();
    texture.set_filter(Texture2DFilter::LINEAR_REPEAT);
    window.context_mut().texture_units_mut()[0].set_texture(Some(texture));
    assert_eq!(window.context_mut().bind_texture_units(), Ok(1));
}

#[test]
fn test_wgpu_texture_units_are_kept_per_surface() {
    let driver = match WgpuDriver::new_headless() {
        Ok(driver) => Arc::new(driver),
        Err(e) => {
            println!("Skipping wgpu test: {e}");
            return;
        }
    };
    let device = Device::new(driver.clone(), DeviceSettings::default());
    let mut first = device.create_window(4, 4).unwrap();
    let mut second = device.create_window(4, 4).unwrap();
    let description = Texture2DDescription::new(2, 2, TextureFormat::RedGreenBlueAlpha8, false);
    let a = device.create_texture_2d(description).unwrap();
    let b = device.create_texture_2d(description).unwrap();
    b.set_filter(Texture2DFilter::NEAREST_REPEAT);

    first.context_mut().texture_units_mut().set(0, Some(a.clone())).unwrap();
    second.context_mut().texture_units_mut().set(0, Some(b.clone())).unwrap();
    first.context_mut().bind_texture_units().unwrap();
    second.context_mut().bind_texture_units().unwrap();

    assert_eq!(
        driver.bound_texture(first.surface_id(), 0),
        Some((a.id(), a.filter()))
    );
    assert_eq!(
        driver.bound_texture(second.surface_id(), 0),
        Some((b.id(), Texture2DFilter::NEAREST_REPEAT))
    );
    assert!(driver.bound_resources(first.surface_id(), 0).is_some());
    assert!(driver.bound_resources(first.surface_id(), 1).is_none());
}
