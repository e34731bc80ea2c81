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

//! Graphics driver implementations and backend selection.

pub mod software;
pub mod wgpu;

use self::software::SoftwareDriver;
use self::wgpu::WgpuDriver;
use anyhow::{Context as _, Result};
use miniglobe_core::renderer::{BackendPreference, DeviceSettings, GraphicsDriver};
use miniglobe_core::Device;
use std::sync::Arc;

/// Instantiates the driver that `settings.backend` asks for.
///
/// `Auto` tries wgpu first and falls back to the software driver when no
/// adapter can be opened; `Wgpu` fails in that case.
pub fn create_driver(settings: &DeviceSettings) -> Result<Arc<dyn GraphicsDriver>> {
    log::info!("Selecting graphics driver ({:?})...", settings.backend);
    let driver: Arc<dyn GraphicsDriver> = match settings.backend {
        BackendPreference::Software => Arc::new(SoftwareDriver::new(settings.software_texture_units)),
        BackendPreference::Wgpu => {
            Arc::new(WgpuDriver::new_headless().context("Failed to initialize the wgpu driver")?)
        }
        BackendPreference::Auto => match WgpuDriver::new_headless() {
            Ok(driver) => Arc::new(driver),
            Err(e) => {
                log::warn!("wgpu unavailable ({e:#}), falling back to the software driver.");
                Arc::new(SoftwareDriver::new(settings.software_texture_units))
            }
        },
    };
    let info = driver.adapter_info();
    log::info!(
        "Selected {:?} driver: \"{}\"",
        info.backend_type,
        info.name
    );
    Ok(driver)
}

/// Creates a [`Device`] on the driver selected by `settings`.
pub fn create_device(settings: DeviceSettings) -> Result<Device> {
    let driver = create_driver(&settings)?;
    Ok(Device::new(driver, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniglobe_core::renderer::GraphicsBackendType;

    #[test]
    fn software_preference_never_touches_wgpu() {
        let settings = DeviceSettings {
            backend: BackendPreference::Software,
            software_texture_units: 8,
            ..Default::default()
        };
        let device = create_device(settings).unwrap();
        assert_eq!(device.adapter_info().backend_type, GraphicsBackendType::Software);
        assert_eq!(device.texture_unit_count(), 8);
    }

    #[test]
    fn auto_preference_always_yields_a_device() {
        let device = create_device(DeviceSettings::default()).unwrap();
        assert!(device.texture_unit_count() > 0);
    }
}
