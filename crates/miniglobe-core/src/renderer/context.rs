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

//! Rendering contexts, their texture units, and the windows that own them.

use crate::math::{Extent2D, Rectangle};
use crate::renderer::api::{SurfaceId, Texture2DFilter, TextureId};
use crate::renderer::error::ResourceError;
use crate::renderer::texture::Texture2D;
use crate::renderer::traits::GraphicsDriver;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// One texture binding slot.
#[derive(Debug)]
pub struct TextureUnit {
    index: usize,
    texture: Option<Texture2D>,
    /// What the driver last received for this unit.
    applied: Option<(TextureId, Texture2DFilter)>,
}

impl TextureUnit {
    fn new(index: usize) -> Self {
        Self {
            index,
            texture: None,
            applied: None,
        }
    }

    /// Position of the unit in its context.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The texture assigned to the unit, if any.
    pub fn texture(&self) -> Option<&Texture2D> {
        self.texture.as_ref()
    }

    /// Assigns a texture to the unit, or clears it with `None`. The driver
    /// sees the change on the next [`Context::bind_texture_units`].
    pub fn set_texture(&mut self, texture: Option<Texture2D>) {
        self.texture = texture;
    }

    fn desired(&self) -> Option<(TextureId, Texture2DFilter)> {
        self.texture.as_ref().map(|t| (t.id(), t.filter()))
    }

    /// Returns `true` if the driver state lags behind the assignment or the
    /// assigned texture's filter.
    pub fn is_dirty(&self) -> bool {
        self.desired() != self.applied
    }
}

/// The fixed-size set of texture units of a [`Context`].
#[derive(Debug)]
pub struct TextureUnits {
    units: Vec<TextureUnit>,
}

impl TextureUnits {
    fn new(count: usize) -> Self {
        Self {
            units: (0..count).map(TextureUnit::new).collect(),
        }
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if the context has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The unit at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&TextureUnit> {
        self.units.get(index)
    }

    /// The unit at `index`, if it exists.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut TextureUnit> {
        self.units.get_mut(index)
    }

    /// Assigns `texture` to unit `index`.
    pub fn set(&mut self, index: usize, texture: Option<Texture2D>) -> Result<(), ResourceError> {
        let count = self.units.len();
        let unit = self
            .units
            .get_mut(index)
            .ok_or(ResourceError::TextureUnitOutOfRange { index, count })?;
        unit.set_texture(texture);
        Ok(())
    }

    /// Iterates over the units in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, TextureUnit> {
        self.units.iter()
    }
}

impl Index<usize> for TextureUnits {
    type Output = TextureUnit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.units[index]
    }
}

impl IndexMut<usize> for TextureUnits {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.units[index]
    }
}

impl<'a> IntoIterator for &'a TextureUnits {
    type Item = &'a TextureUnit;
    type IntoIter = std::slice::Iter<'a, TextureUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

/// Render state holder: texture units and viewport.
#[derive(Debug)]
pub struct Context {
    driver: Arc<dyn GraphicsDriver>,
    surface: SurfaceId,
    texture_units: TextureUnits,
    viewport: Rectangle,
}

impl Context {
    pub(crate) fn new(
        driver: Arc<dyn GraphicsDriver>,
        surface: SurfaceId,
        texture_unit_count: usize,
        size: Extent2D,
    ) -> Self {
        Self {
            driver,
            surface,
            texture_units: TextureUnits::new(texture_unit_count),
            viewport: Rectangle::from_extent(size),
        }
    }

    /// The texture units of this context.
    pub fn texture_units(&self) -> &TextureUnits {
        &self.texture_units
    }

    /// Mutable access to the texture units.
    pub fn texture_units_mut(&mut self) -> &mut TextureUnits {
        &mut self.texture_units
    }

    /// The viewport rectangle.
    pub fn viewport(&self) -> Rectangle {
        self.viewport
    }

    /// Sets the viewport rectangle.
    pub fn set_viewport(&mut self, viewport: Rectangle) {
        self.viewport = viewport;
    }

    /// Pushes every dirty texture unit to the driver's bindings for this
    /// context's surface. Called before a draw.
    ///
    /// Returns the number of units that were rebound.
    pub fn bind_texture_units(&mut self) -> Result<usize, ResourceError> {
        let mut rebound = 0;
        for unit in &mut self.texture_units.units {
            let desired = unit.desired();
            if desired == unit.applied {
                continue;
            }
            self.driver
                .bind_texture_unit(self.surface, unit.index, desired)?;
            unit.applied = desired;
            rebound += 1;
        }
        if rebound > 0 {
            log::trace!("Rebound {rebound} texture unit(s)");
        }
        Ok(rebound)
    }
}

/// A render surface and the context that draws into it.
///
/// Surfaces are offscreen; presenting to an OS window is left to the
/// embedding application.
#[derive(Debug)]
pub struct Window {
    surface: SurfaceId,
    size: Extent2D,
    context: Context,
    driver: Arc<dyn GraphicsDriver>,
}

impl Window {
    pub(crate) fn new(
        driver: Arc<dyn GraphicsDriver>,
        size: Extent2D,
        texture_unit_count: usize,
    ) -> Result<Self, ResourceError> {
        let surface = driver.create_surface(size)?;
        log::debug!(
            "Created window surface {surface:?} ({}x{}, {texture_unit_count} texture units)",
            size.width,
            size.height
        );
        Ok(Self {
            surface,
            size,
            context: Context::new(driver.clone(), surface, texture_unit_count, size),
            driver,
        })
    }

    /// Driver handle of the surface.
    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// The window's rendering context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable access to the rendering context.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(e) = self.driver.destroy_surface(self.surface) {
            log::warn!("Failed to release surface {:?}: {e}", self.surface);
        }
    }
}
