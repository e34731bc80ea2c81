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

//! Indexed or non-indexed triangle/line/point geometry.

use super::collection::VertexAttributeCollection;
use super::error::GeometryError;
use serde::{Deserialize, Serialize};

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Independent points.
    Points,
    /// Independent line segments.
    Lines,
    /// A connected, closed line.
    LineLoop,
    /// A connected, open line.
    LineStrip,
    /// Independent triangles.
    #[default]
    Triangles,
    /// Triangles sharing an edge with the previous one.
    TriangleStrip,
    /// Triangles sharing the first vertex.
    TriangleFan,
}

/// The vertex order that defines the front face of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindingOrder {
    /// Clockwise vertices face forward.
    Clockwise,
    /// Counter-clockwise vertices face forward.
    #[default]
    Counterclockwise,
}

/// Index data of a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl Indices {
    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    /// Returns `true` if there are no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The largest index, if any.
    pub fn max_index(&self) -> Option<u32> {
        match self {
            Indices::U16(v) => v.iter().copied().max().map(u32::from),
            Indices::U32(v) => v.iter().copied().max(),
        }
    }

    /// The raw bytes of the indices.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Indices::U16(v) => bytemuck::cast_slice(v),
            Indices::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// A set of vertex attributes with optional indices.
#[derive(Debug, Default)]
pub struct Mesh {
    /// Per-vertex data.
    pub attributes: VertexAttributeCollection,
    /// Index data; `None` draws the vertices in order.
    pub indices: Option<Indices>,
    /// Primitive assembly mode.
    pub primitive_type: PrimitiveType,
    /// Front-face winding.
    pub front_face_winding_order: WindingOrder,
}

impl Mesh {
    /// Creates an empty triangle mesh with counter-clockwise front faces.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of vertices, taken as the shortest attribute.
    pub fn vertex_count(&self) -> usize {
        self.attributes.iter().map(|a| a.len()).min().unwrap_or(0)
    }

    /// Checks that every index refers to an existing vertex.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertex_count = self.vertex_count();
        match self.indices.as_ref().and_then(Indices::max_index) {
            Some(index) if index as usize >= vertex_count => Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            }),
            _ => Ok(()),
        }
    }
}
