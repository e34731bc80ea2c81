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

//! # MiniGlobe Core
//!
//! Foundational crate containing the typed resource layer of the MiniGlobe
//! renderer: vertex attributes, texture descriptions, pixel transfers and the
//! device/context model. Everything that touches the GPU goes through the
//! [`renderer::GraphicsDriver`] trait, implemented in `miniglobe-infra`.

#![warn(missing_docs)]

pub mod geometry;
pub mod math;
pub mod renderer;

pub use renderer::{Context, Device, ReadPixelBuffer, Texture2D, Window, WritePixelBuffer};
