//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use gridcore::prelude::*;
//! ```

pub use crate::class_id::ClassId;
pub use crate::component_vector::ComponentVector;
pub use crate::entity::{EntityId, TagId};
pub use crate::error::{GridError, Result};
pub use crate::grid::ComponentGrid;
pub use crate::record::{ErasedRecord, Record};
pub use crate::record_type;
pub use crate::registry::{
    create_by_class_id, deserialize_untyped, register_record, serialize_typed,
    try_deserialize_untyped,
};
pub use crate::storage::{GridStorage, SerializationFormat};
pub use crate::tag_vector::TagVector;
