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

//! Provides structs for representing extents (sizes), origins (offsets) and
//! rectangles in 2D pixel space.
//!
//! These types use integer (`u32`) components, making them suitable for
//! texel coordinates and surface sizes.

use serde::{Deserialize, Serialize};

/// A two-dimensional extent, typically representing width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// Creates a new extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the number of texels covered by this extent.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A two-dimensional origin, typically representing an (x, y) offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Origin2D {
    /// The x-coordinate of the origin.
    pub x: u32,
    /// The y-coordinate of the origin.
    pub y: u32,
}

impl Origin2D {
    /// The origin at `(0, 0)`.
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

/// An axis-aligned rectangle in texel space, anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rectangle {
    /// Offset of the rectangle.
    pub origin: Origin2D,
    /// Size of the rectangle.
    pub size: Extent2D,
}

impl Rectangle {
    /// Creates a rectangle from its offset and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            origin: Origin2D { x, y },
            size: Extent2D { width, height },
        }
    }

    /// Creates a rectangle covering `extent`, anchored at the origin.
    pub const fn from_extent(extent: Extent2D) -> Self {
        Self {
            origin: Origin2D::ZERO,
            size: extent,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.origin.x as u64 + self.size.width as u64
    }

    /// Exclusive top edge.
    pub fn top(&self) -> u64 {
        self.origin.y as u64 + self.size.height as u64
    }

    /// Returns `true` if the rectangle lies entirely inside `extent`.
    pub fn fits_within(&self, extent: Extent2D) -> bool {
        self.right() <= extent.width as u64 && self.top() <= extent.height as u64
    }

    /// Returns `true` if the rectangle covers no texels.
    pub fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_fits_within_extent() {
        let extent = Extent2D::new(4, 2);
        assert!(Rectangle::from_extent(extent).fits_within(extent));
        assert!(Rectangle::new(3, 1, 1, 1).fits_within(extent));
        assert!(!Rectangle::new(3, 1, 2, 1).fits_within(extent));
        assert!(!Rectangle::new(0, 2, 1, 1).fits_within(extent));
    }

    #[test]
    fn rectangle_edges_do_not_overflow() {
        let rect = Rectangle::new(u32::MAX, u32::MAX, u32::MAX, 1);
        assert_eq!(rect.right(), u32::MAX as u64 * 2);
        assert!(!rect.fits_within(Extent2D::new(u32::MAX, u32::MAX)));
    }
}
