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

use miniglobe_core::math::Rectangle;
use miniglobe_core::renderer::{
    DeviceSettings, ResourceError, Texture2DDescription, Texture2DFilter, TextureFormat,
    TextureMagnificationFilter, TextureMinificationFilter, TextureWrap,
};
use miniglobe_core::Device;
use miniglobe_infra::graphics::software::SoftwareDriver;
use std::sync::Arc;

fn software_device(settings: DeviceSettings) -> (Arc<SoftwareDriver>, Device) {
    let driver = Arc::new(SoftwareDriver::new(settings.software_texture_units));
    let device = Device::new(driver.clone(), settings);
    (driver, device)
}

#[test]
fn test_enumerate_texture_units() {
    let (_driver, device) = software_device(DeviceSettings::default());
    let window = device.create_window(1, 1).unwrap();

    let mut count = 0;
    for unit in window.context().texture_units() {
        assert!(unit.texture().is_none());
        count += 1;
    }
    assert_eq!(count, window.context().texture_units().len());
}

#[test]
fn test_texture_units_assignment_and_filter() {
    // --- 1. ARRANGE ---
    let (driver, device) = software_device(DeviceSettings::default());
    let mut window = device.create_window(1, 1).unwrap();
    let description = Texture2DDescription::new(1, 1, TextureFormat::RedGreenBlueAlpha8, false);
    let texture = device.create_texture_2d(description).unwrap();

    texture.set_filter(Texture2DFilter::LINEAR_REPEAT);
    assert_eq!(texture.filter(), Texture2DFilter::LINEAR_REPEAT);

    // --- 2. ACT ---
    window.context_mut().texture_units_mut()[0].set_texture(Some(texture.clone()));
    window.context_mut().bind_texture_units().unwrap();

    // --- 3. ASSERT ---
    assert_eq!(window.context().texture_units()[0].texture(), Some(&texture));
    assert_eq!(
        driver.bound_texture(window.surface_id(), 0),
        Some((texture.id(), Texture2DFilter::LINEAR_REPEAT))
    );

    // Attach the same texture with a different filter.
    let filter2 = Texture2DFilter::new(
        TextureMinificationFilter::Nearest,
        TextureMagnificationFilter::Nearest,
        TextureWrap::ClampToEdge,
        TextureWrap::ClampToEdge,
        2.0,
    );
    texture.set_filter(filter2);
    window.context_mut().texture_units_mut()[0].set_texture(Some(texture.clone()));
    assert_eq!(window.context().texture_units()[0].texture(), Some(&texture));
    assert_eq!(window.context_mut().bind_texture_units(), Ok(1));
    assert_eq!(
        driver.bound_texture(window.surface_id(), 0),
        Some((texture.id(), filter2))
    );
}

#[test]
fn test_texture_unit_keeps_texture_alive() {
    let (driver, device) = software_device(DeviceSettings::default());
    let mut window = device.create_window(1, 1).unwrap();
    let texture = device
        .create_texture_2d(Texture2DDescription::new(2, 2, TextureFormat::Red8, false))
        .unwrap();

    window
        .context_mut()
        .texture_units_mut()
        .set(3, Some(texture))
        .unwrap();
    assert_eq!(driver.live_textures(), 1);

    window.context_mut().texture_units_mut().set(3, None).unwrap();
    assert_eq!(driver.live_textures(), 0);
    window.context_mut().bind_texture_units().unwrap();
    assert_eq!(driver.bound_texture(window.surface_id(), 3), None);
}

#[test]
fn test_texture_units_are_independent_per_window() {
    // --- 1. ARRANGE ---
    let (driver, device) = software_device(DeviceSettings::default());
    let mut first = device.create_window(1, 1).unwrap();
    let mut second = device.create_window(1, 1).unwrap();
    let description = Texture2DDescription::new(1, 1, TextureFormat::RedGreenBlueAlpha8, false);
    let a = device.create_texture_2d(description).unwrap();
    let b = device.create_texture_2d(description).unwrap();

    // --- 2. ACT ---
    first.context_mut().texture_units_mut().set(0, Some(a.clone())).unwrap();
    assert_eq!(first.context_mut().bind_texture_units(), Ok(1));
    second.context_mut().texture_units_mut().set(0, Some(b.clone())).unwrap();
    assert_eq!(second.context_mut().bind_texture_units(), Ok(1));

    // --- 3. ASSERT ---
    // Binding on the second window leaves the first one untouched.
    assert_eq!(first.context_mut().bind_texture_units(), Ok(0));
    assert_eq!(
        driver.bound_texture(first.surface_id(), 0),
        Some((a.id(), a.filter()))
    );
    assert_eq!(
        driver.bound_texture(second.surface_id(), 0),
        Some((b.id(), b.filter()))
    );

    drop(second);
    assert_eq!(
        driver.bound_texture(first.surface_id(), 0),
        Some((a.id(), a.filter()))
    );
}

#[test]
fn test_texture_unit_limit_from_settings() {
    let settings = DeviceSettings::from_json_str(
        r#"{ "backend": "software", "texture_unit_limit": 4, "software_texture_units": 16 }"#,
    )
    .unwrap();
    let (_driver, device) = software_device(settings);
    let mut window = device.create_window(8, 8).unwrap();

    assert_eq!(window.context().texture_units().len(), 4);
    assert_eq!(
        window.context_mut().texture_units_mut().set(4, None),
        Err(ResourceError::TextureUnitOutOfRange { index: 4, count: 4 })
    );
}

#[test]
fn test_window_viewport_and_surface_lifetime() {
    let (driver, device) = software_device(DeviceSettings::default());
    let mut window = device.create_window(640, 480).unwrap();
    assert_eq!(window.context().viewport(), Rectangle::new(0, 0, 640, 480));

    window.context_mut().set_viewport(Rectangle::new(10, 10, 100, 100));
    assert_eq!(window.context().viewport(), Rectangle::new(10, 10, 100, 100));

    assert_eq!(driver.live_surfaces(), 1);
    drop(window);
    assert_eq!(driver.live_surfaces(), 0);
}
