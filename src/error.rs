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

//! Error types

use crate::class_id::ClassId;
use std::fmt;

/// Grid error type
#[derive(Debug, Clone)]
pub enum GridError {
    /// No factory registered for this ClassId
    UnknownClassId(ClassId),

    /// Two distinct type names hash to the same ClassId
    ClassIdCollision {
        id: ClassId,
        existing: &'static str,
        incoming: &'static str,
    },

    /// A component vector for this type already exists in the grid
    VectorAlreadyRegistered(&'static str),

    /// Typed payload too short to carry its ClassId prefix
    TruncatedPayload,

    /// Serialization error
    SerializationError(String),

    /// Deserialization error
    DeserializationError(String),

    /// IO error (file operations, etc.)
    IoError(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnknownClassId(id) => write!(f, "Unknown class id: {id:?}"),
            GridError::ClassIdCollision {
                id,
                existing,
                incoming,
            } => write!(
                f,
                "Class id collision: {id:?} claimed by both {existing:?} and {incoming:?}"
            ),
            GridError::VectorAlreadyRegistered(name) => {
                write!(f, "Component vector already registered: {name}")
            }
            GridError::TruncatedPayload => {
                write!(f, "Typed payload shorter than its 8-byte class id prefix")
            }
            GridError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            GridError::DeserializationError(msg) => write!(f, "Deserialization error: {msg}"),
            GridError::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for GridError {
    fn from(err: bincode::Error) -> Self {
        GridError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::SerializationError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GridError>;
