//! Thread-local error storage for FFI.
//!
//! Read functions return null on failure; this module keeps the failure's
//! message so callers can fetch it with `parquet_viewer_get_last_error()`.

use std::any::Any;
use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use tracing::warn;

use super::memory::to_c_string;
use crate::error::{Result, ViewerError};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error for later retrieval on this thread.
pub(crate) fn set_last_error(err: &ViewerError) {
    let message = to_c_string(&err.to_string());
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(message));
}

/// Clear the last error.
pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

/// Run one read operation at the C boundary.
///
/// Clears the slot, runs `op` with panics caught, and either boxes the value
/// for the caller or records the error and returns null.
pub(crate) fn run_read<T, F>(operation: &'static str, op: F) -> *mut T
where
    F: FnOnce() -> Result<T>,
{
    clear_last_error();

    let outcome = panic::catch_unwind(AssertUnwindSafe(op))
        .unwrap_or_else(|payload| Err(ViewerError::Internal(panic_message(payload.as_ref()))));

    match outcome {
        Ok(value) => Box::into_raw(Box::new(value)),
        Err(err) => {
            warn!(operation, error = %err, "read failed at C boundary");
            set_last_error(&err);
            ptr::null_mut()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Get the last error message.
///
/// Returns a pointer to a null-terminated string, or null if the most recent
/// read on this thread succeeded (or none has run yet).
///
/// # Safety
///
/// The returned pointer is owned by the library. It stays valid until the next
/// `parquet_viewer_read_*` or `parquet_viewer_clear_error` call on this thread
/// and must not be freed.
#[no_mangle]
pub extern "C" fn parquet_viewer_get_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(message) => message.as_ptr(),
        None => ptr::null(),
    })
}

/// Clear the last error.
#[no_mangle]
pub extern "C" fn parquet_viewer_clear_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    fn last_error() -> Option<String> {
        let ptr = parquet_viewer_get_last_error();
        if ptr.is_null() {
            return None;
        }
        // SAFETY: ptr points into the thread-local slot, untouched since.
        Some(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned())
    }

    #[test]
    fn test_no_error_returns_null() {
        clear_last_error();
        assert!(parquet_viewer_get_last_error().is_null());
    }

    #[test]
    fn test_set_and_get_error() {
        set_last_error(&ViewerError::FileNotFound("/tmp/missing.parquet".into()));
        let message = last_error().unwrap();
        assert!(message.contains("missing.parquet"));
        assert!(message.starts_with("File not found"));
    }

    #[test]
    fn test_clear_error() {
        set_last_error(&ViewerError::Internal("boom".into()));
        assert!(last_error().is_some());

        parquet_viewer_clear_error();
        assert!(last_error().is_none());
    }

    #[test]
    fn test_reading_does_not_consume() {
        set_last_error(&ViewerError::Internal("sticky".into()));
        assert_eq!(last_error(), last_error());
    }

    #[test]
    fn test_run_read_success_clears_previous_error() {
        set_last_error(&ViewerError::Internal("old".into()));
        let ptr = run_read("test", || Ok(42_u32));
        assert!(!ptr.is_null());
        assert!(last_error().is_none());
        // SAFETY: ptr came from Box::into_raw in run_read.
        let value = unsafe { Box::from_raw(ptr) };
        assert_eq!(*value, 42);
    }

    #[test]
    fn test_run_read_failure_sets_error() {
        let ptr = run_read::<u32, _>("test", || {
            Err(ViewerError::InvalidArgument("file path is null".into()))
        });
        assert!(ptr.is_null());
        assert_eq!(
            last_error().as_deref(),
            Some("Invalid argument: file path is null")
        );
    }

    #[test]
    fn test_run_read_catches_panic() {
        let ptr = run_read::<u32, _>("test", || panic!("decoder exploded"));
        assert!(ptr.is_null());
        let message = last_error().unwrap();
        assert!(message.starts_with("Internal error"));
        assert!(message.contains("decoder exploded"));
    }

    #[test]
    fn test_error_is_thread_local() {
        set_last_error(&ViewerError::Internal("main thread".into()));
        let other = std::thread::spawn(|| parquet_viewer_get_last_error().is_null())
            .join()
            .unwrap();
        assert!(other);
        assert!(last_error().is_some());
    }
}
