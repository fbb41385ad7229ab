//! # Parquet Viewer
//!
//! Read-only inspection of Parquet and Arrow IPC files, usable from Rust and,
//! through the [`ffi`] module, from any language that can call C.
//!
//! Three views are offered for a file:
//!
//! - its schema ([`ColumnarFile::schema`])
//! - file-level metadata ([`ColumnarFile::metadata`])
//! - its rows as fixed-size record batches, optionally projected and limited
//!   ([`ColumnarFile::scan`]), which [`batch_to_json`] renders as JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use parquet_viewer::{batch_to_json, ColumnarFile, ScanOptions};
//!
//! let file = ColumnarFile::open("trades.parquet")?;
//! println!("{} columns", file.schema()?.fields().len());
//!
//! let options = ScanOptions::new().with_projection(vec![2, 0]).with_limit(10);
//! for batch in file.scan(&options)? {
//!     println!("{}", batch_to_json(&batch)?);
//! }
//! # Ok::<(), parquet_viewer::ViewerError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod format;
pub mod json;
pub mod reader;

mod rebatch;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(test)]
mod test_util;

pub use config::{ReaderConfig, DEFAULT_BATCH_SIZE};
pub use error::{Result, ViewerError};
pub use format::FileFormat;
pub use json::batch_to_json;
pub use reader::{
    read_data, read_data_with_projection, read_metadata, read_schema, ColumnarFile, FileMetadata,
    ScanOptions,
};
