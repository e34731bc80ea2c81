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

//! Errors raised while assembling geometry.

use std::fmt;

/// An error related to building a [`VertexAttributeCollection`](super::VertexAttributeCollection)
/// or a [`Mesh`](super::Mesh).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// An attribute with the same name is already part of the collection.
    DuplicateAttribute {
        /// The conflicting attribute name.
        name: String,
    },
    /// An index refers past the end of the vertex data.
    IndexOutOfRange {
        /// The offending index value.
        index: u32,
        /// The number of vertices available.
        vertex_count: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::DuplicateAttribute { name } => {
                write!(f, "Vertex attribute '{name}' is already present")
            }
            GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "Index {index} is out of range for {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}
