//! Integer-handle bridge for managed runtimes.
//!
//! Mirrors the pointer-based API with `i64` handles (0 is the null
//! handle) and `i32` status codes, for callers that cannot hold raw
//! pointers. Counts arrive signed and are re-validated non-negative, and
//! caller buffer capacities are re-checked against the requested count
//! before any native memory is touched.

use crate::types::{DmMatrix, DmStatus};
use crate::{dm_delete, dm_mul, dm_new, dm_read, dm_write};

fn from_handle(handle: i64) -> *mut DmMatrix {
    handle as usize as *mut DmMatrix
}

fn to_handle(ptr: *mut DmMatrix) -> i64 {
    ptr as usize as i64
}

fn to_raw_status(status: DmStatus) -> i32 {
    status as i32
}

/// Allocate a matrix and return its handle, or 0 on failure or negative
/// dimensions.
#[no_mangle]
pub extern "C" fn dm_bridge_new(row_count: i64, col_count: i64) -> i64 {
    if row_count < 0 || col_count < 0 {
        return 0;
    }
    to_handle(dm_new(row_count as usize, col_count as usize))
}

/// Release the matrix behind `handle`; 0 is a no-op.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_delete(handle: i64) {
    dm_delete(from_handle(handle));
}

/// Number of rows, or 0 for the null handle.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_rows(handle: i64) -> i64 {
    crate::dm_rows(from_handle(handle)) as i64
}

/// Number of columns, or 0 for the null handle.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_cols(handle: i64) -> i64 {
    crate::dm_cols(from_handle(handle)) as i64
}

/// Element count, or 0 for the null handle.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_size(handle: i64) -> i64 {
    crate::dm_size(from_handle(handle)) as i64
}

/// Copy `value_count` entries from the caller's buffer into the matrix.
///
/// `src_len` is the capacity of `src`; it must cover `value_count`.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_write(
    handle: i64,
    src: *const f64,
    src_len: i64,
    value_count: i64,
) -> i32 {
    if value_count < 0 {
        return to_raw_status(DmStatus::BadSize);
    }
    let ptr = from_handle(handle);
    let count = value_count as usize;
    if count == 0 {
        return to_raw_status(dm_write(ptr, std::ptr::null(), 0));
    }
    if src.is_null() {
        return to_raw_status(DmStatus::Null);
    }
    if src_len < value_count {
        return to_raw_status(DmStatus::BadSize);
    }
    to_raw_status(dm_write(ptr, src, count))
}

/// Copy the matrix into the caller's buffer.
///
/// `dst_len` is the capacity of `dst`; it must cover `value_count`.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_read(
    handle: i64,
    dst: *mut f64,
    dst_len: i64,
    value_count: i64,
) -> i32 {
    if value_count < 0 {
        return to_raw_status(DmStatus::BadSize);
    }
    let ptr = from_handle(handle);
    let count = value_count as usize;
    if count == 0 {
        return to_raw_status(dm_read(ptr, std::ptr::null_mut(), 0));
    }
    if dst.is_null() {
        return to_raw_status(DmStatus::Null);
    }
    if dst_len < value_count {
        return to_raw_status(DmStatus::BadSize);
    }
    to_raw_status(dm_read(ptr, dst, count))
}

/// Multiply the matrices behind `lhs` and `rhs`, storing the new handle
/// in `out_handle`.
#[no_mangle]
pub unsafe extern "C" fn dm_bridge_mul(lhs: i64, rhs: i64, out_handle: *mut i64) -> i32 {
    if out_handle.is_null() {
        return to_raw_status(DmStatus::Null);
    }
    let mut out: *mut DmMatrix = std::ptr::null_mut();
    let status = dm_mul(from_handle(lhs), from_handle(rhs), &mut out);
    *out_handle = to_handle(out);
    to_raw_status(status)
}
