//! File-backed save and load.
//!
//! Paths are given *without* extension; the format appends `.bin` or `.json`
//! and the encoded payload is written verbatim. Writes are not transactional:
//! a failed write may leave a truncated file behind.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GridError, Result};
use crate::grid::ComponentGrid;
use crate::record::ErasedRecord;
use crate::registry;

/// Format for serialization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerializationFormat {
    Json,
    Binary,
}

impl SerializationFormat {
    /// File extension appended to extension-less paths.
    pub fn extension(self) -> &'static str {
        match self {
            SerializationFormat::Json => "json",
            SerializationFormat::Binary => "bin",
        }
    }
}

fn with_extension(path_without_extension: &Path, format: SerializationFormat) -> PathBuf {
    let mut full = OsString::from(path_without_extension.as_os_str());
    full.push(".");
    full.push(format.extension());
    PathBuf::from(full)
}

/// File storage for grids and typed records
pub struct GridStorage;

impl GridStorage {
    /// Save a whole grid, blocking until the write completes.
    pub fn save_grid(
        grid: &ComponentGrid,
        path_without_extension: &Path,
        format: SerializationFormat,
    ) -> Result<()> {
        let data = match format {
            SerializationFormat::Json => grid.to_json_pretty()?,
            SerializationFormat::Binary => grid.to_binary()?,
        };
        fs::write(with_extension(path_without_extension, format), data)
            .map_err(|e| GridError::IoError(format!("Failed to write save file: {e}")))
    }

    /// Repopulate a pre-registered grid from a file written by
    /// [`GridStorage::save_grid`].
    pub fn load_grid(
        grid: &mut ComponentGrid,
        path_without_extension: &Path,
        format: SerializationFormat,
    ) -> Result<()> {
        let data = fs::read(with_extension(path_without_extension, format))
            .map_err(|e| GridError::IoError(format!("Failed to read save file: {e}")))?;
        match format {
            SerializationFormat::Json => grid.load_json(&data),
            SerializationFormat::Binary => grid.load_binary(&data),
        }
    }

    /// Save one record with its 8-byte ClassId prefix, so an untyped reader
    /// can recover the concrete type.
    pub fn save_record(
        record: &dyn ErasedRecord,
        path_without_extension: &Path,
        format: SerializationFormat,
    ) -> Result<()> {
        let data = registry::serialize_typed(record, format)?;
        fs::write(with_extension(path_without_extension, format), data)
            .map_err(|e| GridError::IoError(format!("Failed to write record file: {e}")))
    }

    /// Inverse of [`GridStorage::save_record`]: the concrete type comes from
    /// the file's ClassId prefix and the process-wide registry. Failures keep
    /// their shape: truncated prefix, unknown id, or body decode error.
    pub fn load_record(
        path_without_extension: &Path,
        format: SerializationFormat,
    ) -> Result<Box<dyn ErasedRecord>> {
        let path = with_extension(path_without_extension, format);
        let data = fs::read(&path)
            .map_err(|e| GridError::IoError(format!("Failed to read record file: {e}")))?;
        registry::try_deserialize_untyped(&data, format)
    }

    /// Write any serde value, extension appended per format.
    pub fn write_to_file<T: serde::Serialize>(
        value: &T,
        path_without_extension: &Path,
        format: SerializationFormat,
    ) -> Result<()> {
        let data = match format {
            SerializationFormat::Json => serde_json::to_vec_pretty(value)?,
            SerializationFormat::Binary => bincode::serialize(value)?,
        };
        fs::write(with_extension(path_without_extension, format), data)
            .map_err(|e| GridError::IoError(format!("Failed to write file: {e}")))
    }

    /// Exact inverse of [`GridStorage::write_to_file`].
    pub fn read_from_file<T: for<'de> serde::Deserialize<'de>>(
        path_without_extension: &Path,
        format: SerializationFormat,
    ) -> Result<T> {
        let data = fs::read(with_extension(path_without_extension, format))
            .map_err(|e| GridError::IoError(format!("Failed to read file: {e}")))?;
        match format {
            SerializationFormat::Json => serde_json::from_slice(&data)
                .map_err(|e| GridError::DeserializationError(e.to_string())),
            SerializationFormat::Binary => bincode::deserialize(&data)
                .map_err(|e| GridError::DeserializationError(e.to_string())),
        }
    }
}
