//! FFI file metadata inspection.

use std::ffi::c_char;
use std::ptr;

use super::error::run_read;
use super::memory::{free_raw_string, from_raw_slice, into_raw_slice, into_raw_string, path_arg};
use crate::reader::{self, FileMetadata};

/// A key/value annotation.
#[repr(C)]
#[derive(Debug)]
pub struct CKeyValue {
    /// Key text.
    pub key: *mut c_char,
    /// Value text; empty when the file stores no value.
    pub value: *mut c_char,
}

impl Drop for CKeyValue {
    fn drop(&mut self) {
        // SAFETY: both strings are owned by this pair
        unsafe {
            free_raw_string(self.key);
            free_raw_string(self.value);
        }
    }
}

/// File-level statistics.
#[repr(C)]
#[derive(Debug)]
pub struct CFileMetadata {
    /// Size of the file in bytes.
    pub file_size: usize,
    /// Total number of rows.
    pub total_records: i64,
    /// Number of top-level fields.
    pub total_fields: usize,
    /// Parquet row groups, or IPC record batches for Arrow files.
    pub total_row_groups: usize,
    /// Parquet format version; `0` for Arrow files.
    pub version: i32,
    /// Writer annotation, or null.
    pub created_by: *mut c_char,
    /// `key_value_count` pairs, or null when there are none.
    pub key_value_metadata: *mut CKeyValue,
    /// Number of key/value pairs.
    pub key_value_count: usize,
}

impl CFileMetadata {
    pub(crate) fn from_metadata(meta: &FileMetadata) -> Self {
        let pairs = meta
            .key_value_metadata
            .iter()
            .map(|(k, v)| CKeyValue {
                key: into_raw_string(k),
                value: into_raw_string(v),
            })
            .collect();
        let (key_value_metadata, key_value_count) = into_raw_slice(pairs);

        Self {
            file_size: usize::try_from(meta.file_size).unwrap_or(usize::MAX),
            total_records: meta.total_records,
            total_fields: meta.total_fields,
            total_row_groups: meta.total_row_groups,
            version: meta.version,
            created_by: meta
                .created_by
                .as_deref()
                .map_or(ptr::null_mut(), into_raw_string),
            key_value_metadata,
            key_value_count,
        }
    }
}

impl Drop for CFileMetadata {
    fn drop(&mut self) {
        // SAFETY: created_by and the pair array are owned by this struct
        unsafe {
            free_raw_string(self.created_by);
            drop(from_raw_slice(self.key_value_metadata, self.key_value_count));
        }
    }
}

/// Read file-level metadata of a Parquet or Arrow file.
///
/// # Arguments
///
/// * `file_path` - Null-terminated path
///
/// # Returns
///
/// Metadata the caller releases with `parquet_viewer_free_metadata`, or null
/// on error (see `parquet_viewer_get_last_error`).
///
/// # Safety
///
/// `file_path` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_read_metadata(
    file_path: *const c_char,
) -> *mut CFileMetadata {
    run_read("read_metadata", || {
        // SAFETY: forwarded caller contract
        let path = unsafe { path_arg(file_path) }?;
        let meta = reader::read_metadata(&path)?;
        Ok(CFileMetadata::from_metadata(&meta))
    })
}

/// Release metadata and everything it owns.
///
/// # Safety
///
/// `metadata` must be null or a pointer returned by
/// `parquet_viewer_read_metadata` that has not been released.
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_free_metadata(metadata: *mut CFileMetadata) {
    if !metadata.is_null() {
        // SAFETY: metadata is non-null and was allocated by Box::into_raw
        drop(unsafe { Box::from_raw(metadata) });
    }
}
