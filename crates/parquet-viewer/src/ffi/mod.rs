//! C FFI layer for the columnar file viewer.
//!
//! This module provides `extern "C"` functions for inspecting Parquet and
//! Arrow IPC files from C and any language with C FFI support (Swift, Python,
//! and others).
//!
//! # Design
//!
//! - **Owned result graphs**: each read returns one heap structure; a single
//!   `parquet_viewer_free_*` call releases it and everything it points to
//! - **Null on failure**: reads return null and record a message
//! - **Thread-local errors**: `parquet_viewer_get_last_error()` returns the
//!   message of the last failed read on the calling thread
//! - **JSON rows**: row data crosses the boundary as one JSON array per batch
//!
//! # Example (C)
//!
//! ```c
//! #include "parquet_viewer.h"
//!
//! int main() {
//!     CRecordBatchArray* data = parquet_viewer_read_data("trades.parquet", 0, 100);
//!     if (data == NULL) {
//!         printf("Error: %s\n", parquet_viewer_get_last_error());
//!         return 1;
//!     }
//!
//!     for (size_t i = 0; i < data->count; i++) {
//!         printf("%s\n", data->batches[i].json);
//!     }
//!     parquet_viewer_free_data(data);
//!     return 0;
//! }
//! ```

mod data;
mod error;
mod memory;
mod metadata;
mod schema;

pub use data::*;
pub use error::*;
pub use memory::*;
pub use metadata::*;
pub use schema::*;
