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

//! Dense membership tracking with no payload.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::Result;

/// Tracks which entities belong to one tag group.
///
/// Entities are stored in insertion order in a dense array, with a side map
/// from id to position for O(1) membership checks. The side map is never
/// persisted; [`TagVector::post_load`] rebuilds it after any deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagVector {
    entities: Vec<EntityId>,

    /// Exact inverse of `entities` over the held set. Not serialized.
    #[serde(skip)]
    index: AHashMap<EntityId, usize>,
}

impl TagVector {
    /// Create an empty tag vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to the membership set.
    ///
    /// Unguarded: adding an id twice produces two dense slots, with the index
    /// pointing at the later one. Callers own deduplication.
    pub fn add_entity_id(&mut self, id: EntityId) {
        self.index.insert(id, self.entities.len());
        self.entities.push(id);
    }

    /// O(1) membership check.
    pub fn has_entity(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Entities in the exact order they were added.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Number of held slots.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Rebuild the id-to-position index from the dense array.
    ///
    /// Mandatory after any load; the index is never part of the payload.
    pub fn post_load(&mut self) {
        self.index.clear();
        self.index.reserve(self.entities.len());
        for (position, id) in self.entities.iter().enumerate() {
            self.index.insert(*id, position);
        }
    }

    /// Canonical binary form.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Pretty text form.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode from the canonical binary form, index rebuilt.
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        let mut vector: TagVector = bincode::deserialize(bytes)
            .map_err(|e| crate::error::GridError::DeserializationError(e.to_string()))?;
        vector.post_load();
        Ok(vector)
    }

    /// Decode from the text form, index rebuilt.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let mut vector: TagVector = serde_json::from_slice(bytes)
            .map_err(|e| crate::error::GridError::DeserializationError(e.to_string()))?;
        vector.post_load();
        Ok(vector)
    }
}
