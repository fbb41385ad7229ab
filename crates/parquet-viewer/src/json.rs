//! JSON rendering of record batches.
//!
//! A batch becomes a JSON array with one object per row. Every object holds
//! every column, nulls included, so a parsed payload always has `num_rows`
//! records of `num_columns` fields each.

use std::collections::HashSet;

use arrow::array::cast::AsArray;
use arrow::array::{Array, RecordBatch};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::{Map, Number, Value};

use crate::error::Result;

/// Render `batch` as a JSON array of row objects.
///
/// # Errors
///
/// Returns an error if a column cannot be formatted or serialization fails.
pub fn batch_to_json(batch: &RecordBatch) -> Result<String> {
    let schema = batch.schema();
    let keys = unique_column_keys(&schema);
    let options = FormatOptions::default();
    let formatters = batch
        .columns()
        .iter()
        .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut obj = Map::with_capacity(keys.len());
        for ((key, col), fmt) in keys.iter().zip(batch.columns()).zip(&formatters) {
            obj.insert(key.clone(), cell_value(col.as_ref(), fmt, row)?);
        }
        rows.push(Value::Object(obj));
    }

    Ok(serde_json::to_string(&rows)?)
}

/// Field names with repeats suffixed (`_1`, `_2`, ...) until unique.
pub(crate) fn unique_column_keys(schema: &Schema) -> Vec<String> {
    let mut seen = HashSet::with_capacity(schema.fields().len());
    schema
        .fields()
        .iter()
        .map(|field| {
            let base = field.name();
            let mut key = base.clone();
            let mut n = 1;
            while !seen.insert(key.clone()) {
                key = format!("{base}_{n}");
                n += 1;
            }
            key
        })
        .collect()
}

fn cell_value(array: &dyn Array, fmt: &ArrayFormatter<'_>, row: usize) -> Result<Value> {
    if array.logical_nulls().is_some_and(|nulls| nulls.is_null(row)) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Boolean => Value::Bool(array.as_boolean().value(row)),
        DataType::Int8 => Value::from(array.as_primitive::<Int8Type>().value(row)),
        DataType::Int16 => Value::from(array.as_primitive::<Int16Type>().value(row)),
        DataType::Int32 => Value::from(array.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => Value::from(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::from(array.as_primitive::<UInt8Type>().value(row)),
        DataType::UInt16 => Value::from(array.as_primitive::<UInt16Type>().value(row)),
        DataType::UInt32 => Value::from(array.as_primitive::<UInt32Type>().value(row)),
        DataType::UInt64 => Value::from(array.as_primitive::<UInt64Type>().value(row)),
        DataType::Float32 => {
            float_value(f64::from(array.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => float_value(array.as_primitive::<Float64Type>().value(row)),
        _ => Value::String(fmt.value(row).try_to_string()?),
    };
    Ok(value)
}

// JSON has no NaN or infinity; those travel as strings.
fn float_value(v: f64) -> Value {
    Number::from_f64(v).map_or_else(|| Value::String(v.to_string()), Value::Number)
}
