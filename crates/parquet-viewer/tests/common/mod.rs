//! Shared fixtures for the C boundary tests.

#![allow(dead_code)]

use std::ffi::{c_char, CStr, CString};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::ipc::writer::{FileWriter, StreamWriter};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use serde_json::Value;

use parquet_viewer::ffi::{
    parquet_viewer_get_last_error, CField, CKeyValue, CRecordBatch, CRecordBatchArray,
};

pub fn test_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("price", DataType::Float64, false),
    ]))
}

/// `rows` rows with ids from `start`; names of multiples of 3 are null.
pub fn make_batch(start: i64, rows: usize) -> RecordBatch {
    let ids: Vec<i64> = (start..).take(rows).collect();
    let names: Vec<Option<String>> = ids
        .iter()
        .map(|id| (id % 3 != 0).then(|| format!("item-{id}")))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let prices: Vec<f64> = ids.iter().map(|id| *id as f64 + 0.25).collect();

    RecordBatch::try_new(
        test_schema(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(names)),
            Arc::new(Float64Array::from(prices)),
        ],
    )
    .unwrap()
}

pub fn write_parquet(
    path: &Path,
    batches: &[RecordBatch],
    row_group_size: usize,
    key_value: Option<Vec<KeyValue>>,
) {
    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size)
        .set_key_value_metadata(key_value)
        .build();
    let mut writer =
        ArrowWriter::try_new(File::create(path).unwrap(), test_schema(), Some(props)).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
}

pub fn write_arrow_file(path: &Path, batches: &[RecordBatch]) {
    let mut writer = FileWriter::try_new(File::create(path).unwrap(), &test_schema()).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.finish().unwrap();
}

pub fn write_arrow_stream(path: &Path, batches: &[RecordBatch]) {
    let mut writer = StreamWriter::try_new(File::create(path).unwrap(), &test_schema()).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.finish().unwrap();
}

/// Ten rows written as 3 + 3 + 4 source batches.
pub fn ten_rows() -> Vec<RecordBatch> {
    vec![make_batch(0, 3), make_batch(3, 3), make_batch(6, 4)]
}

pub fn c_path(path: &Path) -> CString {
    CString::new(path.to_str().unwrap()).unwrap()
}

/// Copy a library-owned C string.
///
/// # Safety
///
/// `ptr` must be a valid NUL-terminated string.
pub unsafe fn text(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned()
}

pub fn last_error() -> Option<String> {
    let ptr = parquet_viewer_get_last_error();
    if ptr.is_null() {
        None
    } else {
        // SAFETY: the slot holds a valid C string until the next read
        Some(unsafe { text(ptr) })
    }
}

/// A batch copied out of the boundary structures.
#[derive(Debug)]
pub struct BatchView {
    pub num_rows: usize,
    pub num_columns: usize,
    pub rows: Vec<serde_json::Map<String, Value>>,
}

/// Copy every batch of `data` without releasing it.
///
/// # Safety
///
/// `data` must be a live result of a `parquet_viewer_read_data*` call.
pub unsafe fn batches(data: *const CRecordBatchArray) -> Vec<BatchView> {
    let data = unsafe { &*data };
    let raw: &[CRecordBatch] = if data.batches.is_null() {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(data.batches, data.count) }
    };
    raw.iter()
        .map(|b| {
            let json: Value = serde_json::from_str(&unsafe { text(b.json) }).unwrap();
            BatchView {
                num_rows: b.num_rows,
                num_columns: b.num_columns,
                rows: json
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|r| r.as_object().unwrap().clone())
                    .collect(),
            }
        })
        .collect()
}

/// # Safety
///
/// `fields` must hold `len` entries, or be null with `len == 0`.
pub unsafe fn fields<'a>(fields: *const CField, len: usize) -> &'a [CField] {
    if fields.is_null() {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(fields, len) }
    }
}

/// # Safety
///
/// `pairs` must hold `len` entries, or be null with `len == 0`.
pub unsafe fn pairs(pairs: *const CKeyValue, len: usize) -> Vec<(String, String)> {
    if pairs.is_null() {
        return Vec::new();
    }
    unsafe { std::slice::from_raw_parts(pairs, len) }
        .iter()
        .map(|kv| unsafe { (text(kv.key), text(kv.value)) })
        .collect()
}
