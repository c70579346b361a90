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

//! Entity and tag identifiers.

use serde::{Deserialize, Serialize};

/// Opaque caller-assigned 64-bit identifier naming one logical entity.
///
/// The engine never allocates, reuses, or garbage-collects ids; callers own
/// the numbering scheme entirely.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        EntityId(raw)
    }
}

/// Opaque 64-bit discriminant naming one tag group.
///
/// Independent of [`ClassId`](crate::class_id::ClassId): tags carry no payload
/// type, so they need no type identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TagId(pub u64);

impl From<u64> for TagId {
    fn from(raw: u64) -> Self {
        TagId(raw)
    }
}
