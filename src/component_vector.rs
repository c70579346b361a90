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

//! Dense, entity-indexed storage of one record type.
//!
//! Two correlated arrays: `entities[i]` names the owner of payload `comps[i]`.
//! Whole-type scans walk `comps` as one contiguous array, which is the
//! intended cache-friendly traversal; point lookups go through a side index.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::{GridError, Result};
use crate::record::Record;

/// Dense storage of `T` payloads keyed by entity id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentVector<T> {
    entities: Vec<EntityId>,
    comps: Vec<T>,

    /// Exact inverse of `entities` over the held set. Not serialized;
    /// rebuilt by [`ComponentVector::post_load`].
    #[serde(skip)]
    index: AHashMap<EntityId, usize>,
}

impl<T> Default for ComponentVector<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            comps: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<T: Record> ComponentVector<T> {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` with a default payload and return a borrow of that payload.
    ///
    /// Unguarded: adding an id twice produces two dense slots, with the index
    /// pointing at the later one. The returned borrow ends at the next
    /// structural mutation of this vector, which the borrow checker enforces.
    pub fn add_entity(&mut self, id: EntityId) -> &mut T {
        let position = self.entities.len();
        self.index.insert(id, position);
        self.entities.push(id);
        self.comps.push(T::default());
        &mut self.comps[position]
    }

    /// O(1) payload lookup by entity id.
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.index.get(&id).map(|&position| &self.comps[position])
    }

    /// O(1) mutable payload lookup by entity id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&position) => Some(&mut self.comps[position]),
            None => None,
        }
    }

    /// O(1) membership check.
    pub fn has_entity(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Payload at dense position `i`. Out-of-range is a programmer error and
    /// panics like slice indexing.
    pub fn at(&self, i: usize) -> &T {
        &self.comps[i]
    }

    /// Mutable payload at dense position `i`.
    pub fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self.comps[i]
    }

    /// Owner of the payload at dense position `i`.
    pub fn entity_at(&self, i: usize) -> EntityId {
        self.entities[i]
    }

    /// Number of held slots.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.entities.len(), self.comps.len());
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in the exact order they were added.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Payloads in dense insertion order, parallel to [`Self::entities`].
    pub fn components(&self) -> &[T] {
        &self.comps
    }

    /// Dense in-order iteration over `(owner, payload)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entities.iter().copied().zip(self.comps.iter())
    }

    /// Rebuild the id-to-position index from the dense arrays.
    ///
    /// Mandatory after any load; the index is never part of the payload.
    pub fn post_load(&mut self) {
        self.index.clear();
        self.index.reserve(self.entities.len());
        for (position, id) in self.entities.iter().enumerate() {
            self.index.insert(*id, position);
        }
    }

    /// Canonical binary form, the basis of the equality contract.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Pretty text form.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode from the canonical binary form, index rebuilt.
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        let mut vector: Self = bincode::deserialize(bytes)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;
        vector.post_load();
        Ok(vector)
    }

    /// Decode from the text form, index rebuilt.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let mut vector: Self = serde_json::from_slice(bytes)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;
        vector.post_load();
        Ok(vector)
    }

    /// Equality as a derived property of the serialization contract: both
    /// sides encode to the canonical binary form and the bytes are compared.
    /// An encode failure on either side compares unequal.
    pub fn canonical_eq(&self, other: &Self) -> bool {
        match (self.to_binary(), other.to_binary()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Record> PartialEq for ComponentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_eq(other)
    }
}
