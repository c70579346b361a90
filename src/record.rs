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

//! Record traits: the capability a type needs to be stored and serialized.
//!
//! [`Record`] is the statically-resolved side: class name, version, and the
//! derived [`ClassId`]. [`ErasedRecord`] is the minimal dynamic-dispatch
//! surface needed to reconstruct a value of unknown concrete type from a byte
//! stream: report the runtime id and deserialize in place. Everything else
//! (encode, equality, naming) stays monomorphic.

use std::any::Any;

use crate::class_id::ClassId;
use crate::error::{GridError, Result};

/// A storable, serializable record type.
///
/// Records are plain values: scalars, strings, nested records, and collections
/// of the same, with no ownership edges to other records. `Default` is the
/// zero-argument factory the registry uses to materialize an instance before
/// decoding into it.
pub trait Record:
    Default + serde::Serialize + for<'de> serde::Deserialize<'de> + 'static
{
    /// Stable name hashed into [`Record::CLASS_ID`]. Renaming a type changes
    /// its identity and orphans previously written payloads.
    const CLASS_NAME: &'static str;

    /// Schema version handed to the encoder; reconciliation of old versions
    /// is the encoder's concern, not this crate's.
    const VERSION: u32;

    /// Content-hash identity, derived from [`Record::CLASS_NAME`].
    const CLASS_ID: ClassId = ClassId::of(Self::CLASS_NAME);
}

/// Object-safe surface of a [`Record`].
///
/// Kept deliberately narrow: a `Box<dyn ErasedRecord>` can report what it is
/// and overwrite itself from an encoded body, nothing more. Serialization of
/// the erased object flows through `erased_serde`, so a `&dyn ErasedRecord`
/// still encodes exactly like the concrete value.
pub trait ErasedRecord: erased_serde::Serialize + Any {
    /// Runtime id of the concrete type.
    fn class_id(&self) -> ClassId;

    /// Human-readable name of the concrete type.
    fn class_name(&self) -> &'static str;

    /// Declared schema version of the concrete type.
    fn version(&self) -> u32;

    /// Overwrite `self` from a canonical-binary body.
    fn load_binary(&mut self, bytes: &[u8]) -> Result<()>;

    /// Overwrite `self` from a JSON body.
    fn load_json(&mut self, bytes: &[u8]) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

erased_serde::serialize_trait_object!(ErasedRecord);

impl<T: Record> ErasedRecord for T {
    fn class_id(&self) -> ClassId {
        T::CLASS_ID
    }

    fn class_name(&self) -> &'static str {
        T::CLASS_NAME
    }

    fn version(&self) -> u32 {
        T::VERSION
    }

    fn load_binary(&mut self, bytes: &[u8]) -> Result<()> {
        *self = bincode::deserialize(bytes)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;
        Ok(())
    }

    fn load_json(&mut self, bytes: &[u8]) -> Result<()> {
        *self = serde_json::from_slice(bytes)
            .map_err(|e| GridError::DeserializationError(e.to_string()))?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn ErasedRecord {
    /// Checked downcast to the concrete record type.
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Checked mutable downcast to the concrete record type.
    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Implement [`Record`] for a struct.
///
/// ```
/// use gridcore::record_type;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// record_type!(Position);
/// ```
#[macro_export]
macro_rules! record_type {
    ($t:ty) => {
        $crate::record_type!($t, version: 1);
    };

    ($t:ty, version: $v:expr) => {
        impl $crate::record::Record for $t {
            const CLASS_NAME: &'static str = stringify!($t);
            const VERSION: u32 = $v;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    struct Sample {
        value: i32,
        name: String,
    }

    record_type!(Sample, version: 3);

    #[test]
    fn test_class_id_derived_from_name() {
        assert_eq!(Sample::CLASS_ID, ClassId::of("Sample"));
        assert_eq!(Sample::VERSION, 3);
    }

    #[test]
    fn test_erased_reports_concrete_identity() {
        let sample = Sample {
            value: 7,
            name: "seven".to_string(),
        };
        let erased: &dyn ErasedRecord = &sample;
        assert_eq!(erased.class_id(), Sample::CLASS_ID);
        assert_eq!(erased.class_name(), "Sample");
        assert_eq!(erased.version(), 3);
    }

    #[test]
    fn test_load_binary_in_place() {
        let original = Sample {
            value: 56,
            name: "hi".to_string(),
        };
        let bytes = bincode::serialize(&original).unwrap();

        let mut blank: Box<dyn ErasedRecord> = Box::new(Sample::default());
        blank.load_binary(&bytes).unwrap();

        let recovered = blank.downcast_ref::<Sample>().unwrap();
        assert_eq!(*recovered, original);
    }

    #[test]
    fn test_load_json_in_place() {
        let original = Sample {
            value: -4,
            name: "neg".to_string(),
        };
        let bytes = serde_json::to_vec_pretty(&original).unwrap();

        let mut blank = Sample::default();
        ErasedRecord::load_json(&mut blank, &bytes).unwrap();
        assert_eq!(blank, original);
    }

    #[test]
    fn test_erased_serialize_matches_concrete() {
        let sample = Sample {
            value: 1,
            name: "x".to_string(),
        };
        let erased: &dyn ErasedRecord = &sample;
        assert_eq!(
            bincode::serialize(erased).unwrap(),
            bincode::serialize(&sample).unwrap()
        );
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut blank = Sample::default();
        assert!(ErasedRecord::load_json(&mut blank, b"not json").is_err());
    }
}
