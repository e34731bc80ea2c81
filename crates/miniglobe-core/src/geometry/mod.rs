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

//! Per-vertex data containers and the mesh that groups them.

mod collection;
mod error;
mod mesh;
mod vertex_attribute;

pub use self::collection::{AnyVertexAttribute, VertexAttributeCollection};
pub use self::error::GeometryError;
pub use self::mesh::{Indices, Mesh, PrimitiveType, WindingOrder};
pub use self::vertex_attribute::*;
