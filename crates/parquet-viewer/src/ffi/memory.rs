//! FFI memory management helpers.
//!
//! Everything handed to C is allocated here and reclaimed by the `Drop`
//! impls of the boundary structs.

use std::ffi::{c_char, CStr, CString};
use std::path::PathBuf;
use std::ptr;

use crate::error::{Result, ViewerError};

/// Build a `CString`, dropping interior NUL bytes.
pub(crate) fn to_c_string(s: &str) -> CString {
    let bytes: Vec<u8> = s.bytes().filter(|&b| b != 0).collect();
    // SAFETY: interior NUL bytes were removed above.
    unsafe { CString::from_vec_unchecked(bytes) }
}

/// Transfer ownership of `s` to C as a NUL-terminated string.
///
/// Released with [`free_raw_string`].
pub(crate) fn into_raw_string(s: &str) -> *mut c_char {
    to_c_string(s).into_raw()
}

/// Release a string produced by [`into_raw_string`]. Null is a no-op.
///
/// # Safety
///
/// `s` must be null or come from [`into_raw_string`], and not be released
/// twice.
pub(crate) unsafe fn free_raw_string(s: *mut c_char) {
    if !s.is_null() {
        // SAFETY: s is non-null and was allocated by CString::into_raw
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Transfer ownership of `items` to C as a pointer/length pair.
///
/// An empty vector becomes `(null, 0)`.
pub(crate) fn into_raw_slice<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed).cast::<T>(), len)
}

/// Take back a slice produced by [`into_raw_slice`].
///
/// # Safety
///
/// `(data, len)` must be a pair returned by [`into_raw_slice`] that has not
/// been reclaimed yet.
pub(crate) unsafe fn from_raw_slice<T>(data: *mut T, len: usize) -> Box<[T]> {
    if data.is_null() {
        return Box::default();
    }
    // SAFETY: data/len describe a boxed slice leaked by into_raw_slice
    unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)) }
}

/// Decode a C path argument.
///
/// On Unix the bytes are taken as-is; elsewhere they must be UTF-8.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn path_arg(path: *const c_char) -> Result<PathBuf> {
    if path.is_null() {
        return Err(ViewerError::InvalidArgument("file path is null".to_string()));
    }
    // SAFETY: path is non-null and NUL-terminated per the caller contract
    let raw = unsafe { CStr::from_ptr(path) };

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Ok(PathBuf::from(std::ffi::OsStr::from_bytes(raw.to_bytes())))
    }

    #[cfg(not(unix))]
    {
        raw.to_str().map(PathBuf::from).map_err(|e| {
            ViewerError::InvalidArgument(format!("file path is not valid UTF-8: {e}"))
        })
    }
}

/// Get the library version.
///
/// # Returns
///
/// A pointer to a null-terminated version string. This is a static string
/// and should NOT be freed.
#[no_mangle]
pub extern "C" fn parquet_viewer_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr().cast()
}
