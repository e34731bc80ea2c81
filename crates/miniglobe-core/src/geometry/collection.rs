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

//! A name-keyed, type-erased set of vertex attributes.

use super::error::GeometryError;
use super::vertex_attribute::{VertexAttribute, VertexAttributeElement, VertexAttributeType};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Object-safe view over a [`VertexAttribute`] of any element type.
pub trait AnyVertexAttribute: Debug + Send + Sync {
    /// The shader-visible name of the attribute.
    fn name(&self) -> &str;
    /// The element type tag.
    fn attribute_type(&self) -> VertexAttributeType;
    /// Number of vertices stored.
    fn len(&self) -> usize;
    /// Returns `true` if no vertices are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// The raw bytes of the values.
    fn as_bytes(&self) -> &[u8];
    /// Upcast used for typed lookups.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast used for typed lookups.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: VertexAttributeElement> AnyVertexAttribute for VertexAttribute<T> {
    fn name(&self) -> &str {
        VertexAttribute::name(self)
    }

    fn attribute_type(&self) -> VertexAttributeType {
        T::ATTRIBUTE_TYPE
    }

    fn len(&self) -> usize {
        VertexAttribute::len(self)
    }

    fn as_bytes(&self) -> &[u8] {
        VertexAttribute::as_bytes(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The vertex attributes of a mesh, keyed by name.
#[derive(Debug, Default)]
pub struct VertexAttributeCollection {
    attributes: BTreeMap<String, Box<dyn AnyVertexAttribute>>,
}

impl VertexAttributeCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute. Names must be unique within the collection.
    pub fn add<T: VertexAttributeElement>(
        &mut self,
        attribute: VertexAttribute<T>,
    ) -> Result<(), GeometryError> {
        let name = attribute.name().to_owned();
        if self.attributes.contains_key(&name) {
            return Err(GeometryError::DuplicateAttribute { name });
        }
        self.attributes.insert(name, Box::new(attribute));
        Ok(())
    }

    /// Removes and returns the attribute named `name`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn AnyVertexAttribute>> {
        self.attributes.remove(name)
    }

    /// Returns `true` if an attribute named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns the attribute named `name` regardless of its element type.
    pub fn get_dyn(&self, name: &str) -> Option<&dyn AnyVertexAttribute> {
        self.attributes.get(name).map(|a| a.as_ref())
    }

    /// Returns the attribute named `name` if its element type is `T`.
    pub fn get<T: VertexAttributeElement>(&self, name: &str) -> Option<&VertexAttribute<T>> {
        self.attributes
            .get(name)
            .and_then(|a| a.as_any().downcast_ref::<VertexAttribute<T>>())
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut<T: VertexAttributeElement>(
        &mut self,
        name: &str,
    ) -> Option<&mut VertexAttribute<T>> {
        self.attributes
            .get_mut(name)
            .and_then(|a| a.as_any_mut().downcast_mut::<VertexAttribute<T>>())
    }

    /// Iterates over the attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn AnyVertexAttribute> {
        self.attributes.values().map(|a| a.as_ref())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the collection holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
