//! FFI schema inspection.

use std::ffi::c_char;

use arrow::datatypes::{Field, Schema};

use super::error::run_read;
use super::memory::{free_raw_string, from_raw_slice, into_raw_slice, into_raw_string, path_arg};
use crate::reader;

/// One top-level field of a file schema.
#[repr(C)]
#[derive(Debug)]
pub struct CField {
    /// Field name.
    pub name: *mut c_char,
    /// Arrow data type rendered with `Debug`, e.g. `Int64` or `Utf8`.
    pub data_type: *mut c_char,
    /// Whether the field may hold nulls.
    pub nullable: bool,
}

impl CField {
    fn from_field(field: &Field) -> Self {
        Self {
            name: into_raw_string(field.name()),
            data_type: into_raw_string(&format!("{:?}", field.data_type())),
            nullable: field.is_nullable(),
        }
    }
}

impl Drop for CField {
    fn drop(&mut self) {
        // SAFETY: both strings were created by into_raw_string and are owned
        // exclusively by this field.
        unsafe {
            free_raw_string(self.name);
            free_raw_string(self.data_type);
        }
    }
}

/// Schema of a file, fields in column order.
#[repr(C)]
#[derive(Debug)]
pub struct CSchema {
    /// `num_fields` fields, or null when there are none.
    pub fields: *mut CField,
    /// Number of fields.
    pub num_fields: usize,
}

impl CSchema {
    pub(crate) fn from_schema(schema: &Schema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|f| CField::from_field(f.as_ref()))
            .collect();
        let (fields, num_fields) = into_raw_slice(fields);
        Self { fields, num_fields }
    }
}

impl Drop for CSchema {
    fn drop(&mut self) {
        // SAFETY: fields/num_fields came from into_raw_slice in from_schema.
        drop(unsafe { from_raw_slice(self.fields, self.num_fields) });
    }
}

/// Read the schema of a Parquet or Arrow file.
///
/// # Arguments
///
/// * `file_path` - Null-terminated path
///
/// # Returns
///
/// A schema the caller releases with `parquet_viewer_free_schema`, or null on
/// error (see `parquet_viewer_get_last_error`).
///
/// # Safety
///
/// `file_path` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_read_schema(file_path: *const c_char) -> *mut CSchema {
    run_read("read_schema", || {
        // SAFETY: forwarded caller contract
        let path = unsafe { path_arg(file_path) }?;
        let schema = reader::read_schema(&path)?;
        Ok(CSchema::from_schema(&schema))
    })
}

/// Release a schema and everything it owns.
///
/// # Safety
///
/// `schema` must be null or a pointer returned by
/// `parquet_viewer_read_schema` that has not been released.
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_free_schema(schema: *mut CSchema) {
    if !schema.is_null() {
        // SAFETY: schema is non-null and was allocated by Box::into_raw
        drop(unsafe { Box::from_raw(schema) });
    }
}
