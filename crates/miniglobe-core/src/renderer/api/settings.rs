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

//! Global settings for device creation.

use super::image::RowAlignment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which driver implementation a device should be created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
    /// Use a GPU adapter when one is available, otherwise the software driver.
    #[default]
    Auto,
    /// Require a GPU adapter through wgpu.
    Wgpu,
    /// Always use the in-process software driver.
    Software,
}

/// A collection of settings that affect device creation and pixel transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Driver selection policy.
    pub backend: BackendPreference,
    /// Caps the number of texture units a context exposes. `None` uses every
    /// unit the driver reports.
    pub texture_unit_limit: Option<usize>,
    /// Row alignment used by transfers that do not specify one.
    pub default_row_alignment: RowAlignment,
    /// Number of texture units the software driver reports.
    pub software_texture_units: usize,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            texture_unit_limit: None,
            default_row_alignment: RowAlignment::One,
            software_texture_units: 32,
        }
    }
}

impl DeviceSettings {
    /// Parses settings from JSON. Missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(SettingsError::Parse)
    }

    /// Reads and parses a JSON settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json_str(&contents)?;
        log::debug!("Loaded device settings from '{}'", path.display());
        Ok(settings)
    }

    /// Number of texture units a context gets on a driver reporting `available`.
    pub fn texture_unit_count(&self, available: usize) -> usize {
        self.texture_unit_limit
            .map_or(available, |limit| limit.min(available))
    }
}

/// An error raised while loading [`DeviceSettings`].
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io {
        /// The file that failed to load.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The settings are not valid JSON for [`DeviceSettings`].
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io { path, source } => {
                write!(f, "Failed to read settings from '{path}': {source}")
            }
            SettingsError::Parse(err) => write!(f, "Invalid device settings: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io { source, .. } => Some(source),
            SettingsError::Parse(err) => Some(err),
        }
    }
}
