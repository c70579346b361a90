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

//! gridcore - Dense entity-component storage with generic serialization
//!
//! Heterogeneous, statically-typed records attach to opaque numeric entity
//! identifiers, iterate in cache-friendly dense order, look up in O(1), and
//! round-trip losslessly through a binary or JSON encoding. A process-wide
//! registry keyed by a content hash of each type's name recovers the correct
//! concrete type from an untyped byte stream.
//!
//! Single-threaded by contract: every operation runs to completion on the
//! caller's thread.

pub mod class_id;
pub mod component_vector;
pub mod entity;
pub mod error;
pub mod grid;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod storage;
pub mod tag_vector;

pub use class_id::*;
pub use component_vector::*;
pub use entity::*;
pub use error::*;
pub use grid::*;
pub use record::*;
pub use storage::*;
pub use tag_vector::*;
