//! FFI row data functions.
//!
//! Rows cross the boundary as JSON text, one payload per record batch.

use std::ffi::c_char;

use arrow::array::RecordBatch;

use super::error::run_read;
use super::memory::{free_raw_string, from_raw_slice, into_raw_slice, into_raw_string, path_arg};
use crate::error::{Result, ViewerError};
use crate::json::batch_to_json;
use crate::reader;

/// One record batch rendered as JSON.
#[repr(C)]
#[derive(Debug)]
pub struct CRecordBatch {
    /// JSON array of `num_rows` row objects with `num_columns` keys each.
    pub json: *mut c_char,
    /// Rows in this batch.
    pub num_rows: usize,
    /// Columns in this batch.
    pub num_columns: usize,
}

impl CRecordBatch {
    fn from_batch(batch: &RecordBatch) -> Result<Self> {
        let json = batch_to_json(batch)?;
        Ok(Self {
            json: into_raw_string(&json),
            num_rows: batch.num_rows(),
            num_columns: batch.num_columns(),
        })
    }
}

impl Drop for CRecordBatch {
    fn drop(&mut self) {
        // SAFETY: json is owned by this batch
        unsafe { free_raw_string(self.json) };
    }
}

/// Ordered batches of a read. Never null on success, even when empty.
#[repr(C)]
#[derive(Debug)]
pub struct CRecordBatchArray {
    /// `count` batches, or null when there are none.
    pub batches: *mut CRecordBatch,
    /// Number of batches.
    pub count: usize,
}

impl CRecordBatchArray {
    pub(crate) fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        // A failed conversion drops the batches already built.
        let converted = batches
            .iter()
            .map(CRecordBatch::from_batch)
            .collect::<Result<Vec<_>>>()?;
        let (batches, count) = into_raw_slice(converted);
        Ok(Self { batches, count })
    }
}

impl Drop for CRecordBatchArray {
    fn drop(&mut self) {
        // SAFETY: batches/count came from into_raw_slice in from_batches
        drop(unsafe { from_raw_slice(self.batches, self.count) });
    }
}

fn non_zero(n: usize) -> Option<usize> {
    (n > 0).then_some(n)
}

/// Read all columns of a Parquet or Arrow file.
///
/// # Arguments
///
/// * `file_path` - Null-terminated path
/// * `batch_size` - Rows per batch, `0` for the default (1024)
/// * `limit` - Maximum rows overall, `0` for no limit
///
/// # Returns
///
/// Batches the caller releases with `parquet_viewer_free_data`, or null on
/// error (see `parquet_viewer_get_last_error`).
///
/// # Safety
///
/// `file_path` must be null or a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_read_data(
    file_path: *const c_char,
    batch_size: usize,
    limit: usize,
) -> *mut CRecordBatchArray {
    run_read("read_data", || {
        // SAFETY: forwarded caller contract
        let path = unsafe { path_arg(file_path) }?;
        let batches = reader::read_data(&path, non_zero(batch_size), non_zero(limit))?;
        CRecordBatchArray::from_batches(&batches)
    })
}

/// Read selected columns of a Parquet or Arrow file.
///
/// Columns come back in the order of `column_indices`, repeats included.
///
/// # Arguments
///
/// * `file_path` - Null-terminated path
/// * `column_indices` - `column_count` zero-based column positions
/// * `column_count` - Number of entries in `column_indices`
/// * `batch_size` - Rows per batch, `0` for the default (1024)
/// * `limit` - Maximum rows overall, `0` for no limit
///
/// # Returns
///
/// Batches the caller releases with `parquet_viewer_free_data`, or null on
/// error (see `parquet_viewer_get_last_error`).
///
/// # Safety
///
/// * `file_path` must be null or a valid null-terminated string
/// * `column_indices` must be null or point to `column_count` readable values
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_read_data_with_projection(
    file_path: *const c_char,
    column_indices: *const usize,
    column_count: usize,
    batch_size: usize,
    limit: usize,
) -> *mut CRecordBatchArray {
    run_read("read_data_with_projection", || {
        // SAFETY: forwarded caller contract
        let path = unsafe { path_arg(file_path) }?;

        let indices: &[usize] = if column_count == 0 {
            &[]
        } else if column_indices.is_null() {
            return Err(ViewerError::InvalidArgument(
                "column indices are null".to_string(),
            ));
        } else {
            // SAFETY: non-null and holds column_count values per the caller contract
            unsafe { std::slice::from_raw_parts(column_indices, column_count) }
        };

        let batches = reader::read_data_with_projection(
            &path,
            indices,
            non_zero(batch_size),
            non_zero(limit),
        )?;
        CRecordBatchArray::from_batches(&batches)
    })
}

/// Release a batch array and everything it owns.
///
/// # Safety
///
/// `data` must be null or a pointer returned by `parquet_viewer_read_data` or
/// `parquet_viewer_read_data_with_projection` that has not been released.
#[no_mangle]
pub unsafe extern "C" fn parquet_viewer_free_data(data: *mut CRecordBatchArray) {
    if !data.is_null() {
        // SAFETY: data is non-null and was allocated by Box::into_raw
        drop(unsafe { Box::from_raw(data) });
    }
}
