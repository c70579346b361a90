// Copyright 2025 The gridcore Authors
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

//! The component grid: aggregate owner of every vector for one world.
//!
//! One type-erased [`ComponentVector`] per registered record type, plus one
//! [`TagVector`] per tag id. The grid serializes self-describingly: the tag
//! map as one homogeneous collection, then each vector keyed by its
//! human-readable class name, so both encodings can be repopulated into a
//! grid whose vectors were pre-registered by the caller.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::class_id::ClassId;
use crate::component_vector::ComponentVector;
use crate::entity::{EntityId, TagId};
use crate::error::{GridError, Result};
use crate::record::Record;
use crate::tag_vector::TagVector;

/// Version of the grid payload layout itself, independent of any record's
/// declared version.
const GRID_FORMAT_VERSION: u32 = 1;

/// Narrow capability set a grid needs from a vector whose payload type has
/// been erased: identity, reindexing, and per-format in-place load. Checked
/// downcasts recover the concrete type; encoding flows through `erased_serde`.
pub trait ErasedVector: erased_serde::Serialize + Any {
    /// Id of the stored record type.
    fn class_id(&self) -> ClassId;

    /// Human-readable name of the stored record type; the key under which
    /// this vector appears in grid payloads.
    fn class_name(&self) -> &'static str;

    /// Declared schema version of the stored record type.
    fn version(&self) -> u32;

    /// Number of held slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild the entity-to-position index from the dense arrays.
    fn post_load(&mut self);

    /// Replace contents from a canonical-binary body, index rebuilt.
    fn load_binary(&mut self, bytes: &[u8]) -> Result<()>;

    /// Replace contents from a JSON body, index rebuilt.
    fn load_json(&mut self, value: serde_json::Value) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

erased_serde::serialize_trait_object!(ErasedVector);

impl<T: Record> ErasedVector for ComponentVector<T> {
    fn class_id(&self) -> ClassId {
        T::CLASS_ID
    }

    fn class_name(&self) -> &'static str {
        T::CLASS_NAME
    }

    fn version(&self) -> u32 {
        T::VERSION
    }

    fn len(&self) -> usize {
        ComponentVector::len(self)
    }

    fn post_load(&mut self) {
        ComponentVector::post_load(self);
    }

    fn load_binary(&mut self, bytes: &[u8]) -> Result<()> {
        *self = ComponentVector::from_binary(bytes)?;
        Ok(())
    }

    fn load_json(&mut self, value: serde_json::Value) -> Result<()> {
        let mut loaded: ComponentVector<T> = serde_json::from_value(value)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;
        ComponentVector::post_load(&mut loaded);
        *self = loaded;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Serialized shape of a grid. `BTreeMap` keys pin a stable iteration order
/// in both encoders, which the byte-compare equality contract depends on.
#[derive(Serialize)]
struct GridPayloadRef<'a, V: Serialize> {
    version: u32,
    tags: &'a BTreeMap<TagId, TagVector>,
    vectors: BTreeMap<&'a str, V>,
}

#[derive(Deserialize)]
struct GridPayload<V> {
    #[allow(dead_code)]
    version: u32,
    tags: BTreeMap<TagId, TagVector>,
    vectors: BTreeMap<String, V>,
}

/// Aggregate owner of all component and tag vectors for one world.
///
/// Vectors are exclusively owned and never shared between grids. There is no
/// intrinsic deep copy: callers copy a grid by registering the same types in
/// a second grid and copying each vector's contents.
#[derive(Default)]
pub struct ComponentGrid {
    tags: BTreeMap<TagId, TagVector>,
    vectors: BTreeMap<ClassId, Box<dyn ErasedVector>>,
}

impl ComponentGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, empty [`ComponentVector<T>`] under `T::CLASS_ID`.
    ///
    /// Must happen before any component of type `T` can be added or loaded.
    /// Fails without side effects when a vector for `T` already exists.
    pub fn add_vector_for<T: Record>(&mut self) -> Result<()> {
        if self.vectors.contains_key(&T::CLASS_ID) {
            warn!(class = T::CLASS_NAME, "add_vector_for: already registered");
            return Err(GridError::VectorAlreadyRegistered(T::CLASS_NAME));
        }
        self.vectors
            .insert(T::CLASS_ID, Box::new(ComponentVector::<T>::new()));
        Ok(())
    }

    /// Resolve the type-erased entry for `T` and downcast it.
    ///
    /// Empty (with a diagnostic) when `T` was never registered via
    /// [`ComponentGrid::add_vector_for`].
    pub fn get_vector_for<T: Record>(&self) -> Option<&ComponentVector<T>> {
        match self.vectors.get(&T::CLASS_ID) {
            Some(vector) => vector.as_any().downcast_ref::<ComponentVector<T>>(),
            None => {
                warn!(class = T::CLASS_NAME, "get_vector_for: not registered");
                None
            }
        }
    }

    /// Mutable form of [`ComponentGrid::get_vector_for`].
    pub fn get_vector_for_mut<T: Record>(&mut self) -> Option<&mut ComponentVector<T>> {
        match self.vectors.get_mut(&T::CLASS_ID) {
            Some(vector) => vector.as_any_mut().downcast_mut::<ComponentVector<T>>(),
            None => {
                warn!(class = T::CLASS_NAME, "get_vector_for_mut: not registered");
                None
            }
        }
    }

    /// Forward to the right vector and append a default `T` for `id`.
    ///
    /// Empty when `T`'s vector was never registered.
    pub fn add_component<T: Record>(&mut self, id: EntityId) -> Option<&mut T> {
        Some(self.get_vector_for_mut::<T>()?.add_entity(id))
    }

    /// Forward to the right vector and look up `id`'s payload.
    pub fn get_component<T: Record>(&self, id: EntityId) -> Option<&T> {
        self.get_vector_for::<T>()?.get(id)
    }

    /// Mutable form of [`ComponentGrid::get_component`].
    pub fn get_component_mut<T: Record>(&mut self, id: EntityId) -> Option<&mut T> {
        self.get_vector_for_mut::<T>()?.get_mut(id)
    }

    /// Get-or-create: tag vectors need no prior registration.
    pub fn tag_vector(&mut self, tag: TagId) -> &mut TagVector {
        self.tags.entry(tag).or_default()
    }

    /// Read-only view of all tag vectors.
    pub fn tags(&self) -> &BTreeMap<TagId, TagVector> {
        &self.tags
    }

    /// Number of registered component vectors.
    pub fn vector_count(&self) -> usize {
        self.vectors.len()
    }

    /// Canonical binary form: format version, tag map, then each vector's
    /// binary body keyed by class name.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut vectors = BTreeMap::new();
        for vector in self.vectors.values() {
            vectors.insert(vector.class_name(), bincode::serialize(vector)?);
        }
        let payload = GridPayloadRef {
            version: GRID_FORMAT_VERSION,
            tags: &self.tags,
            vectors,
        };
        Ok(bincode::serialize(&payload)?)
    }

    /// Pretty text form with the same self-describing layout.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        let mut vectors = BTreeMap::new();
        for vector in self.vectors.values() {
            vectors.insert(vector.class_name(), serde_json::to_value(vector)?);
        }
        let payload = GridPayloadRef {
            version: GRID_FORMAT_VERSION,
            tags: &self.tags,
            vectors,
        };
        Ok(serde_json::to_vec_pretty(&payload)?)
    }

    /// Repopulate from the canonical binary form.
    ///
    /// Component vectors must have been pre-registered; payload sections
    /// naming an unregistered class are skipped with a diagnostic. Vectors
    /// registered here but absent from the payload are left untouched. Every
    /// loaded tag and vector gets its index rebuilt.
    pub fn load_binary(&mut self, bytes: &[u8]) -> Result<()> {
        let payload: GridPayload<Vec<u8>> = bincode::deserialize(bytes)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;

        self.tags = payload.tags;
        for tag_vector in self.tags.values_mut() {
            tag_vector.post_load();
        }

        for (name, body) in payload.vectors {
            match self.vectors.get_mut(&ClassId::of(&name)) {
                Some(vector) => vector.load_binary(&body)?,
                None => warn!(class = %name, "load_binary: vector not registered, skipped"),
            }
        }
        Ok(())
    }

    /// Repopulate from the text form; same contract as
    /// [`ComponentGrid::load_binary`].
    pub fn load_json(&mut self, bytes: &[u8]) -> Result<()> {
        let payload: GridPayload<serde_json::Value> = serde_json::from_slice(bytes)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;

        self.tags = payload.tags;
        for tag_vector in self.tags.values_mut() {
            tag_vector.post_load();
        }

        for (name, value) in payload.vectors {
            match self.vectors.get_mut(&ClassId::of(&name)) {
                Some(vector) => vector.load_json(value)?,
                None => warn!(class = %name, "load_json: vector not registered, skipped"),
            }
        }
        Ok(())
    }

    /// Equality as a derived property of the serialization contract: both
    /// grids encode to the canonical binary form and the bytes are compared.
    pub fn canonical_eq(&self, other: &Self) -> bool {
        match (self.to_binary(), other.to_binary()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for ComponentGrid {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_eq(other)
    }
}

// Hand-written: the erased vectors can't derive Debug, but their identity
// and sizes are enough to see what a grid holds.
impl fmt::Debug for ComponentGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentGrid")
            .field("tags", &self.tags)
            .field(
                "vectors",
                &self
                    .vectors
                    .values()
                    .map(|v| (v.class_name(), v.len()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .finish()
    }
}
