//! Recovering concrete types from untyped byte streams via the process-wide
//! registry.

use gridcore::registry::{
    create_by_class_id, deserialize_untyped, register_record, serialize_typed,
};
use gridcore::{record_type, ClassId, Record, SerializationFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Loadout {
    items: Vec<String>,
    capacity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Morale {
    value: f64,
}

record_type!(Loadout, version: 4);
record_type!(Morale);

#[test]
fn created_instance_reports_its_own_class_id() {
    register_record::<Loadout>().unwrap();

    let instance = create_by_class_id(Loadout::CLASS_ID).unwrap();
    assert_eq!(instance.class_id(), Loadout::CLASS_ID);
    assert_eq!(instance.version(), 4);
}

#[test]
fn unknown_class_id_returns_empty() {
    assert!(create_by_class_id(ClassId::of("NoSuchRecordAnywhere")).is_none());
}

#[test]
fn untyped_binary_roundtrip_recovers_concrete_type() {
    register_record::<Loadout>().unwrap();
    register_record::<Morale>().unwrap();

    let original = Loadout {
        items: vec!["sword".to_string(), "shield".to_string()],
        capacity: 10,
    };

    let payload = serialize_typed(&original, SerializationFormat::Binary).unwrap();
    let recovered = deserialize_untyped(&payload, SerializationFormat::Binary).unwrap();

    // Correct concrete type, equal under the canonical byte compare.
    assert_eq!(recovered.class_id(), Loadout::CLASS_ID);
    assert!(recovered.downcast_ref::<Morale>().is_none());
    assert_eq!(recovered.downcast_ref::<Loadout>().unwrap(), &original);
    assert_eq!(
        bincode::serialize(&*recovered).unwrap(),
        bincode::serialize(&original).unwrap()
    );
}

#[test]
fn untyped_json_roundtrip_recovers_concrete_type() {
    register_record::<Morale>().unwrap();

    let original = Morale { value: 0.25 };
    let payload = serialize_typed(&original, SerializationFormat::Json).unwrap();
    let recovered = deserialize_untyped(&payload, SerializationFormat::Json).unwrap();

    assert_eq!(recovered.downcast_ref::<Morale>().unwrap(), &original);
}

#[test]
fn mixed_stream_dispatches_each_payload() {
    register_record::<Loadout>().unwrap();
    register_record::<Morale>().unwrap();

    let payloads = vec![
        serialize_typed(&Morale { value: 1.0 }, SerializationFormat::Binary).unwrap(),
        serialize_typed(
            &Loadout {
                items: vec!["rope".to_string()],
                capacity: 3,
            },
            SerializationFormat::Binary,
        )
        .unwrap(),
    ];

    let recovered: Vec<_> = payloads
        .iter()
        .map(|bytes| deserialize_untyped(bytes, SerializationFormat::Binary).unwrap())
        .collect();

    assert_eq!(recovered[0].class_name(), "Morale");
    assert_eq!(recovered[1].class_name(), "Loadout");
    assert_eq!(recovered[1].downcast_ref::<Loadout>().unwrap().capacity, 3);
}

#[test]
fn payload_with_unregistered_prefix_is_empty() {
    let mut payload = ClassId::of("NeverRegisteredPrefix").to_le_bytes().to_vec();
    payload.extend_from_slice(&bincode::serialize(&Morale { value: 2.0 }).unwrap());
    assert!(deserialize_untyped(&payload, SerializationFormat::Binary).is_none());
}
