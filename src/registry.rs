//! Process-wide record type registry.
//!
//! Maps a [`ClassId`] to the factory that materializes a default instance of
//! the matching concrete type. This is what lets an untyped byte stream (file,
//! peer, replay) be decoded with no compile-time knowledge of its shape: the
//! leading 8 bytes name the type, the registry builds it, the instance decodes
//! itself in place.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::warn;

use crate::class_id::ClassId;
use crate::error::{GridError, Result};
use crate::record::{ErasedRecord, Record};
use crate::storage::SerializationFormat;

/// One registered record type.
struct RecordEntry {
    name: &'static str,
    version: u32,
    factory: fn() -> Box<dyn ErasedRecord>,
}

static REGISTRY: RwLock<BTreeMap<ClassId, RecordEntry>> = RwLock::new(BTreeMap::new());

/// Register `T`'s factory under `T::CLASS_ID`.
///
/// Re-registering the same type overwrites its previous entry and is harmless.
/// Two *different* names hashing to the same id would silently corrupt
/// dispatch, so that case is rejected instead.
pub fn register_record<T: Record>() -> Result<()> {
    let mut registry = REGISTRY.write();
    if let Some(existing) = registry.get(&T::CLASS_ID) {
        if existing.name != T::CLASS_NAME {
            warn!(
                id = ?T::CLASS_ID,
                existing = existing.name,
                incoming = T::CLASS_NAME,
                "class id collision rejected"
            );
            return Err(GridError::ClassIdCollision {
                id: T::CLASS_ID,
                existing: existing.name,
                incoming: T::CLASS_NAME,
            });
        }
    }
    registry.insert(
        T::CLASS_ID,
        RecordEntry {
            name: T::CLASS_NAME,
            version: T::VERSION,
            factory: || Box::new(T::default()),
        },
    );
    Ok(())
}

/// Whether a factory is registered for `id`.
pub fn is_registered(id: ClassId) -> bool {
    REGISTRY.read().contains_key(&id)
}

/// Human-readable name of the type registered under `id`.
pub fn registered_name(id: ClassId) -> Option<&'static str> {
    REGISTRY.read().get(&id).map(|entry| entry.name)
}

/// Declared schema version of the type registered under `id`.
pub fn registered_version(id: ClassId) -> Option<u32> {
    REGISTRY.read().get(&id).map(|entry| entry.version)
}

/// Build a default-constructed instance of the type registered under `id`.
///
/// Returns `None` (with a diagnostic) when `id` is unknown; never panics.
pub fn create_by_class_id(id: ClassId) -> Option<Box<dyn ErasedRecord>> {
    let registry = REGISTRY.read();
    match registry.get(&id) {
        Some(entry) => Some((entry.factory)()),
        None => {
            warn!(?id, "create_by_class_id: no factory registered");
            None
        }
    }
}

/// Encode `record` prefixed with its 8-byte little-endian ClassId, so an
/// untyped reader can recover the concrete type before decoding the body.
pub fn serialize_typed(
    record: &dyn ErasedRecord,
    format: SerializationFormat,
) -> Result<Vec<u8>> {
    let body = match format {
        SerializationFormat::Binary => bincode::serialize(record)?,
        SerializationFormat::Json => serde_json::to_vec_pretty(record)?,
    };
    let mut payload = Vec::with_capacity(8 + body.len());
    payload.extend_from_slice(&record.class_id().to_le_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Inverse of [`serialize_typed`]: read the ClassId prefix, resolve the
/// factory, and let the fresh instance decode the body in place.
///
/// Reports why recovery failed: [`GridError::TruncatedPayload`] when the
/// prefix itself is incomplete, [`GridError::UnknownClassId`] when no factory
/// is registered, or a deserialization error from the body decode.
pub fn try_deserialize_untyped(
    bytes: &[u8],
    format: SerializationFormat,
) -> Result<Box<dyn ErasedRecord>> {
    if bytes.len() < 8 {
        return Err(GridError::TruncatedPayload);
    }
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&bytes[..8]);
    let id = ClassId::from_le_bytes(prefix);

    let mut record = {
        let registry = REGISTRY.read();
        match registry.get(&id) {
            Some(entry) => (entry.factory)(),
            None => return Err(GridError::UnknownClassId(id)),
        }
    };
    let body = &bytes[8..];
    match format {
        SerializationFormat::Binary => record.load_binary(body)?,
        SerializationFormat::Json => record.load_json(body)?,
    }
    Ok(record)
}

/// Option form of [`try_deserialize_untyped`]: callers that only care
/// whether a value came back get `None` plus a diagnostic; never panics.
pub fn deserialize_untyped(
    bytes: &[u8],
    format: SerializationFormat,
) -> Option<Box<dyn ErasedRecord>> {
    match try_deserialize_untyped(bytes, format) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(%err, "deserialize_untyped failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_type;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    struct RegistryProbe {
        ticks: u64,
        label: String,
    }

    record_type!(RegistryProbe, version: 2);

    #[test]
    fn test_create_by_class_id_reports_own_identity() {
        register_record::<RegistryProbe>().unwrap();

        let instance = create_by_class_id(RegistryProbe::CLASS_ID).unwrap();
        assert_eq!(instance.class_id(), RegistryProbe::CLASS_ID);
        assert_eq!(instance.class_name(), "RegistryProbe");
        assert!(instance.downcast_ref::<RegistryProbe>().is_some());
    }

    #[test]
    fn test_unknown_class_id_is_empty_not_fatal() {
        assert!(create_by_class_id(ClassId::of("NeverRegistered")).is_none());
    }

    #[test]
    fn test_is_registered_tracks_registration() {
        assert!(!is_registered(ClassId::of("NeverRegistered")));
        register_record::<RegistryProbe>().unwrap();
        assert!(is_registered(RegistryProbe::CLASS_ID));
    }

    #[test]
    fn test_try_deserialize_reports_failure_shape() {
        // Prefix shorter than 8 bytes.
        assert!(matches!(
            try_deserialize_untyped(&[1, 2, 3], SerializationFormat::Binary),
            Err(GridError::TruncatedPayload)
        ));

        // Well-formed prefix naming a type nobody registered.
        let unknown = ClassId::of("NeverRegisteredShape");
        let payload = unknown.to_le_bytes().to_vec();
        let err = try_deserialize_untyped(&payload, SerializationFormat::Binary)
            .err()
            .unwrap();
        match err {
            GridError::UnknownClassId(id) => assert_eq!(id, unknown),
            other => panic!("expected UnknownClassId, got {other:?}"),
        }

        // Known prefix, garbage body.
        register_record::<RegistryProbe>().unwrap();
        let mut payload = RegistryProbe::CLASS_ID.to_le_bytes().to_vec();
        payload.extend_from_slice(b"{ not json");
        assert!(matches!(
            try_deserialize_untyped(&payload, SerializationFormat::Json),
            Err(GridError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_reregistration_is_harmless() {
        register_record::<RegistryProbe>().unwrap();
        register_record::<RegistryProbe>().unwrap();
        assert_eq!(registered_version(RegistryProbe::CLASS_ID), Some(2));
        assert_eq!(registered_name(RegistryProbe::CLASS_ID), Some("RegistryProbe"));
    }

    #[test]
    fn test_typed_roundtrip_binary() {
        register_record::<RegistryProbe>().unwrap();

        let original = RegistryProbe {
            ticks: 99,
            label: "save".to_string(),
        };
        let payload = serialize_typed(&original, SerializationFormat::Binary).unwrap();
        let recovered = deserialize_untyped(&payload, SerializationFormat::Binary).unwrap();

        assert_eq!(
            recovered.downcast_ref::<RegistryProbe>().unwrap(),
            &original
        );
    }

    #[test]
    fn test_typed_roundtrip_json() {
        register_record::<RegistryProbe>().unwrap();

        let original = RegistryProbe {
            ticks: 7,
            label: "pretty".to_string(),
        };
        let payload = serialize_typed(&original, SerializationFormat::Json).unwrap();

        // Body after the 8-byte prefix is readable JSON.
        let body = std::str::from_utf8(&payload[8..]).unwrap();
        assert!(body.contains("\"label\""));

        let recovered = deserialize_untyped(&payload, SerializationFormat::Json).unwrap();
        assert_eq!(
            recovered.downcast_ref::<RegistryProbe>().unwrap(),
            &original
        );
    }

    #[test]
    fn test_truncated_payload_is_empty() {
        assert!(deserialize_untyped(&[1, 2, 3], SerializationFormat::Binary).is_none());
    }

    #[test]
    fn test_garbage_body_is_empty() {
        register_record::<RegistryProbe>().unwrap();
        let mut payload = RegistryProbe::CLASS_ID.to_le_bytes().to_vec();
        payload.extend_from_slice(b"{ not json");
        assert!(deserialize_untyped(&payload, SerializationFormat::Json).is_none());
    }
}
