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

//! Typed vertex attribute containers.
//!
//! A [`VertexAttribute`] is a named, growable array of per-vertex values. The
//! element type fixes the [`VertexAttributeType`] tag at compile time, so an
//! attribute can never disagree with the data it carries.

use bytemuck::Pod;
use half::f16;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The element layout of a vertex attribute as seen by a vertex shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexAttributeType {
    /// One unsigned byte.
    UnsignedByte,
    /// One 16-bit float.
    HalfFloat,
    /// Two 16-bit floats.
    HalfFloatVector2,
    /// Three 16-bit floats.
    HalfFloatVector3,
    /// Four 16-bit floats.
    HalfFloatVector4,
    /// One 32-bit float.
    Float,
    /// Two 32-bit floats.
    FloatVector2,
    /// Three 32-bit floats.
    FloatVector3,
    /// Four 32-bit floats.
    FloatVector4,
    /// Three 64-bit floats, sent to the GPU as a high/low pair of `FloatVector3`.
    EmulatedDoubleVector3,
}

impl VertexAttributeType {
    /// Returns the number of scalar components per vertex.
    pub fn component_count(&self) -> usize {
        match self {
            VertexAttributeType::UnsignedByte
            | VertexAttributeType::HalfFloat
            | VertexAttributeType::Float => 1,
            VertexAttributeType::HalfFloatVector2 | VertexAttributeType::FloatVector2 => 2,
            VertexAttributeType::HalfFloatVector3
            | VertexAttributeType::FloatVector3
            | VertexAttributeType::EmulatedDoubleVector3 => 3,
            VertexAttributeType::HalfFloatVector4 | VertexAttributeType::FloatVector4 => 4,
        }
    }

    /// Returns the size in bytes of one vertex worth of data on the CPU side.
    pub fn size_in_bytes(&self) -> usize {
        let component = match self {
            VertexAttributeType::UnsignedByte => 1,
            VertexAttributeType::HalfFloat
            | VertexAttributeType::HalfFloatVector2
            | VertexAttributeType::HalfFloatVector3
            | VertexAttributeType::HalfFloatVector4 => 2,
            VertexAttributeType::Float
            | VertexAttributeType::FloatVector2
            | VertexAttributeType::FloatVector3
            | VertexAttributeType::FloatVector4 => 4,
            VertexAttributeType::EmulatedDoubleVector3 => 8,
        };
        component * self.component_count()
    }
}

/// A plain-old-data type that can be stored in a [`VertexAttribute`].
pub trait VertexAttributeElement: Pod + Debug + PartialEq + Send + Sync + 'static {
    /// The tag describing this element type.
    const ATTRIBUTE_TYPE: VertexAttributeType;
}

macro_rules! vertex_attribute_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl VertexAttributeElement for $ty {
                const ATTRIBUTE_TYPE: VertexAttributeType = VertexAttributeType::$tag;
            }
        )*
    };
}

vertex_attribute_element! {
    u8 => UnsignedByte,
    f16 => HalfFloat,
    [f16; 2] => HalfFloatVector2,
    [f16; 3] => HalfFloatVector3,
    [f16; 4] => HalfFloatVector4,
    f32 => Float,
    [f32; 2] => FloatVector2,
    [f32; 3] => FloatVector3,
    [f32; 4] => FloatVector4,
    [f64; 3] => EmulatedDoubleVector3,
}

/// A named array of per-vertex values.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute<T: VertexAttributeElement> {
    name: String,
    values: Vec<T>,
}

impl<T: VertexAttributeElement> VertexAttribute<T> {
    /// Creates an empty attribute.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Creates an empty attribute with room for `capacity` vertices.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Creates an attribute that takes ownership of existing values.
    pub fn from_values(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The shader-visible name of the attribute.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element type tag.
    pub fn attribute_type(&self) -> VertexAttributeType {
        T::ATTRIBUTE_TYPE
    }

    /// The values, one per vertex.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access to the backing vector.
    pub fn values_mut(&mut self) -> &mut Vec<T> {
        &mut self.values
    }

    /// Appends one vertex worth of data.
    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    /// Number of vertices stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no vertices are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of vertices the attribute can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// The raw bytes of the values, ready to be copied into a vertex buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }
}

impl VertexAttribute<[f64; 3]> {
    /// Splits every double-precision position into a high and a low
    /// single-precision part such that `high + low` approximates the original
    /// value far better than a single `f32` can.
    pub fn split_emulated(&self) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
        self.values
            .iter()
            .map(|v| {
                let high = v.map(|c| c as f32);
                let low = [
                    (v[0] - high[0] as f64) as f32,
                    (v[1] - high[1] as f64) as f32,
                    (v[2] - high[2] as f64) as f32,
                ];
                (high, low)
            })
            .unzip()
    }
}

/// An attribute of single unsigned bytes.
pub type VertexAttributeUnsignedByte = VertexAttribute<u8>;
/// An attribute of single half-precision floats.
pub type VertexAttributeHalfFloat = VertexAttribute<f16>;
/// An attribute of two-component half-precision vectors.
pub type VertexAttributeHalfFloatVector2 = VertexAttribute<[f16; 2]>;
/// An attribute of three-component half-precision vectors.
pub type VertexAttributeHalfFloatVector3 = VertexAttribute<[f16; 3]>;
/// An attribute of four-component half-precision vectors.
pub type VertexAttributeHalfFloatVector4 = VertexAttribute<[f16; 4]>;
/// An attribute of single floats.
pub type VertexAttributeFloat = VertexAttribute<f32>;
/// An attribute of two-component float vectors.
pub type VertexAttributeFloatVector2 = VertexAttribute<[f32; 2]>;
/// An attribute of three-component float vectors.
pub type VertexAttributeFloatVector3 = VertexAttribute<[f32; 3]>;
/// An attribute of four-component float vectors.
pub type VertexAttributeFloatVector4 = VertexAttribute<[f32; 4]>;
/// An attribute of double-precision positions.
pub type VertexAttributeDoubleVector3 = VertexAttribute<[f64; 3]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_float_vector2_attribute_reports_its_type() {
        let mut attribute = VertexAttributeHalfFloatVector2::with_capacity("textureCoordinate", 4);
        assert_eq!(attribute.name(), "textureCoordinate");
        assert_eq!(
            attribute.attribute_type(),
            VertexAttributeType::HalfFloatVector2
        );
        assert!(attribute.capacity() >= 4);
        assert!(attribute.is_empty());

        attribute.push([f16::from_f32(0.5), f16::from_f32(1.0)]);
        assert_eq!(attribute.len(), 1);
        assert_eq!(attribute.values()[0][0].to_f32(), 0.5);
        assert_eq!(attribute.as_bytes().len(), 4);
    }

    #[test]
    fn sizes_match_element_types() {
        assert_eq!(
            VertexAttributeType::HalfFloatVector3.size_in_bytes(),
            std::mem::size_of::<[f16; 3]>()
        );
        assert_eq!(
            VertexAttributeType::FloatVector4.size_in_bytes(),
            std::mem::size_of::<[f32; 4]>()
        );
        assert_eq!(
            VertexAttributeType::EmulatedDoubleVector3.size_in_bytes(),
            std::mem::size_of::<[f64; 3]>()
        );
    }

    #[test]
    fn emulated_double_split_preserves_precision() {
        let position = [6_378_137.123_456_7_f64, -0.25, 1.0e-3];
        let attribute = VertexAttributeDoubleVector3::from_values("position", vec![position]);
        let (high, low) = attribute.split_emulated();

        for axis in 0..3 {
            let rebuilt = high[0][axis] as f64 + low[0][axis] as f64;
            approx::assert_abs_diff_eq!(rebuilt, position[axis], epsilon = 1.0e-7);
        }
        // A single f32 cannot hold the first component to this precision.
        assert!((position[0] as f32 as f64 - position[0]).abs() > 1.0e-3);
    }
}
