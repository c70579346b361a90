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

//! Content-hash type identity.
//!
//! A [`ClassId`] is a 64-bit FNV-1a hash of a record type's stable name.
//! Because the hash is derived from the name alone, two processes (or two
//! builds) that agree on the name agree on the id — the hash itself is the
//! schema key, no shared schema file required.

use serde::{Deserialize, Serialize};
use std::fmt;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit content hash identifying a record type across processes and versions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u64);

impl ClassId {
    /// Hash a stable type name into its id.
    ///
    /// `const fn`, so `ClassId::of("Position")` is evaluated at compile time
    /// when used in a constant context.
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        ClassId(hash)
    }

    /// Little-endian wire form, used as the typed-payload prefix.
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Inverse of [`ClassId::to_le_bytes`].
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        ClassId(u64::from_le_bytes(bytes))
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({:#018x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fnv_vectors() {
        // Reference vectors for 64-bit FNV-1a.
        assert_eq!(ClassId::of("").0, 0xcbf2_9ce4_8422_2325);
        assert_eq!(ClassId::of("a").0, 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_stable_across_calls() {
        assert_eq!(ClassId::of("Position"), ClassId::of("Position"));
        assert_ne!(ClassId::of("Position"), ClassId::of("Velocity"));
    }

    #[test]
    fn test_wire_form_roundtrip() {
        let id = ClassId::of("Health");
        assert_eq!(ClassId::from_le_bytes(id.to_le_bytes()), id);
    }

    #[test]
    fn test_const_evaluation() {
        const ID: ClassId = ClassId::of("ConstRecord");
        assert_eq!(ID, ClassId::of("ConstRecord"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = ClassId::of("Health");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.0.to_string());
        let back: ClassId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
