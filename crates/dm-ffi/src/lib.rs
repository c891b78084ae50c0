//! `dm-ffi` - C ABI boundary for the dense matrix library.
//!
//! Exposes `Matrix<f64>` behind opaque heap-allocated handles with
//! integer status codes, plus an integer-handle bridge for managed
//! runtimes that cannot hold raw pointers. Every entry point catches
//! panics and surfaces them as `DmStatus::Internal`; no failure crosses
//! the boundary as an unwind.

mod error;
mod handle;
mod types;

pub use handle::*;
pub use types::*;

use std::os::raw::c_char;

use dm_core::{Matrix, MulAlgo};

use crate::error::{set_last_error, take_last_error};

/// Execute a closure that returns a `DmStatus`, catching any panics
/// and converting them into `DmStatus::Internal`.
fn catch_panic<F: FnOnce() -> DmStatus + std::panic::UnwindSafe>(f: F) -> DmStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            DmStatus::Internal
        }
    }
}

/// Invoke a getter against a possibly-null handle, normalising the null
/// case to zero so callers see consistent behaviour without duplicating
/// null checks.
fn safe_call(getter: fn(&Matrix<f64>) -> usize, obj: *const DmMatrix) -> usize {
    if obj.is_null() {
        return 0;
    }
    let obj = unsafe { &*obj };
    getter(&obj.inner)
}

fn boxed(inner: Matrix<f64>) -> *mut DmMatrix {
    Box::into_raw(Box::new(DmMatrix { inner }))
}

/// Allocate an empty 0x0 matrix used as a sentinel handle.
///
/// Returns null on allocation failure. The caller must later release the
/// handle with `dm_delete`.
#[no_mangle]
pub extern "C" fn dm_new_empty() -> *mut DmMatrix {
    match std::panic::catch_unwind(|| boxed(Matrix::new())) {
        Ok(ptr) => ptr,
        Err(_) => std::ptr::null_mut(),
    }
}

/// Allocate a matrix with the requested shape, zero-filled.
///
/// Returns null if the element count overflows, storage cannot be
/// reserved, or anything panics; `dm_last_error` carries the detail.
#[no_mangle]
pub extern "C" fn dm_new(row_count: usize, col_count: usize) -> *mut DmMatrix {
    match std::panic::catch_unwind(|| Matrix::with_shape(row_count, col_count)) {
        Ok(Ok(inner)) => boxed(inner),
        Ok(Err(e)) => {
            set_last_error(e.to_string());
            std::ptr::null_mut()
        }
        Err(_) => {
            set_last_error("internal panic".to_string());
            std::ptr::null_mut()
        }
    }
}

/// Destroy a handle created by `dm_new`, `dm_new_empty`, or `dm_mul`.
///
/// Passing null is a no-op.
#[no_mangle]
pub unsafe extern "C" fn dm_delete(obj: *mut DmMatrix) {
    if !obj.is_null() {
        drop(Box::from_raw(obj));
    }
}

/// Number of rows in the referenced matrix, or zero for null.
#[no_mangle]
pub unsafe extern "C" fn dm_rows(obj: *const DmMatrix) -> usize {
    safe_call(Matrix::rows, obj)
}

/// Number of columns in the referenced matrix, or zero for null.
#[no_mangle]
pub unsafe extern "C" fn dm_cols(obj: *const DmMatrix) -> usize {
    safe_call(Matrix::cols, obj)
}

/// Element count of the referenced matrix, or zero for null.
#[no_mangle]
pub unsafe extern "C" fn dm_size(obj: *const DmMatrix) -> usize {
    safe_call(Matrix::size, obj)
}

/// Copy `value_count` entries from `src` into the matrix buffer.
///
/// `value_count` must equal the matrix's element count exactly. A null
/// `src` is accepted only when `value_count` is zero.
#[no_mangle]
pub unsafe extern "C" fn dm_write(
    obj: *mut DmMatrix,
    src: *const f64,
    value_count: usize,
) -> DmStatus {
    catch_panic(|| {
        if obj.is_null() {
            set_last_error("matrix handle is null".to_string());
            return DmStatus::Null;
        }
        if src.is_null() && value_count != 0 {
            set_last_error("source buffer is null".to_string());
            return DmStatus::Null;
        }
        let matrix = unsafe { &mut (*obj).inner };
        if matrix.size() != value_count {
            set_last_error(format!(
                "value count {} does not match matrix size {}",
                value_count,
                matrix.size()
            ));
            return DmStatus::BadSize;
        }
        if value_count != 0 {
            let values = unsafe { std::slice::from_raw_parts(src, value_count) };
            matrix.data_mut().copy_from_slice(values);
        }
        DmStatus::Ok
    })
}

/// Copy the matrix buffer into `dst`.
///
/// Same count and null rules as `dm_write`.
#[no_mangle]
pub unsafe extern "C" fn dm_read(
    obj: *const DmMatrix,
    dst: *mut f64,
    value_count: usize,
) -> DmStatus {
    catch_panic(|| {
        if obj.is_null() {
            set_last_error("matrix handle is null".to_string());
            return DmStatus::Null;
        }
        if dst.is_null() && value_count != 0 {
            set_last_error("destination buffer is null".to_string());
            return DmStatus::Null;
        }
        let matrix = unsafe { &(*obj).inner };
        if matrix.size() != value_count {
            set_last_error(format!(
                "value count {} does not match matrix size {}",
                value_count,
                matrix.size()
            ));
            return DmStatus::BadSize;
        }
        if value_count != 0 {
            let values = unsafe { std::slice::from_raw_parts_mut(dst, value_count) };
            values.copy_from_slice(matrix.data());
        }
        DmStatus::Ok
    })
}

/// Multiply two matrices, writing a new owned handle into `out_obj`.
///
/// Uses the native kernel. `out_obj` is set to null before any
/// validation, so it never dangles on failure.
#[no_mangle]
pub unsafe extern "C" fn dm_mul(
    lhs: *const DmMatrix,
    rhs: *const DmMatrix,
    out_obj: *mut *mut DmMatrix,
) -> DmStatus {
    mul_impl(lhs, rhs, MulAlgo::Native, 0, out_obj)
}

/// Multiply with an explicit algorithm and tile size.
///
/// `algo` follows the `MulAlgo` numbering (0 = native, 1 = transpose,
/// 2 = block-ijp, 3 = block-ipj); an unrecognized value fails with
/// `DmStatus::BadSize`. `tile = 0` lets tiling kernels pick a size.
#[no_mangle]
pub unsafe extern "C" fn dm_mul_algo(
    lhs: *const DmMatrix,
    rhs: *const DmMatrix,
    algo: u32,
    tile: usize,
    out_obj: *mut *mut DmMatrix,
) -> DmStatus {
    let Some(algo) = MulAlgo::from_raw(algo) else {
        set_last_error(format!("unrecognized multiplication algorithm {algo}"));
        return DmStatus::BadSize;
    };
    mul_impl(lhs, rhs, algo, tile, out_obj)
}

fn mul_impl(
    lhs: *const DmMatrix,
    rhs: *const DmMatrix,
    algo: MulAlgo,
    tile: usize,
    out_obj: *mut *mut DmMatrix,
) -> DmStatus {
    catch_panic(|| {
        if out_obj.is_null() {
            set_last_error("output handle is null".to_string());
            return DmStatus::Null;
        }
        unsafe {
            *out_obj = std::ptr::null_mut();
        }
        if lhs.is_null() || rhs.is_null() {
            set_last_error("matrix handle is null".to_string());
            return DmStatus::Null;
        }
        let left = unsafe { &(*lhs).inner };
        let right = unsafe { &(*rhs).inner };
        match Matrix::multiply(left, right, algo, tile) {
            Ok(product) => {
                unsafe {
                    *out_obj = boxed(product);
                }
                DmStatus::Ok
            }
            Err(e) => {
                let status = DmStatus::from(&e);
                set_last_error(e.to_string());
                status
            }
        }
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned
/// string with `dm_free_string`.
#[no_mangle]
pub extern "C" fn dm_last_error() -> *const c_char {
    match take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `dm_last_error`.
#[no_mangle]
pub unsafe extern "C" fn dm_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(std::ffi::CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_last_error() -> Option<String> {
        let ptr = dm_last_error();
        if ptr.is_null() {
            return None;
        }
        let msg = unsafe { std::ffi::CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned();
        unsafe { dm_free_string(ptr as *mut c_char) };
        Some(msg)
    }

    #[test]
    fn test_create_empty() {
        let obj = dm_new_empty();
        assert!(!obj.is_null());
        unsafe {
            assert_eq!(dm_rows(obj), 0);
            assert_eq!(dm_cols(obj), 0);
            assert_eq!(dm_size(obj), 0);
            dm_delete(obj);
        }
    }

    #[test]
    fn test_null_handle_accessors() {
        unsafe {
            assert_eq!(dm_rows(std::ptr::null()), 0);
            assert_eq!(dm_cols(std::ptr::null()), 0);
            assert_eq!(dm_size(std::ptr::null()), 0);
            // destroying null is a no-op
            dm_delete(std::ptr::null_mut());
        }
    }

    #[test]
    fn test_new_overflow_returns_null() {
        drain_last_error();
        let obj = dm_new(usize::MAX, 2);
        assert!(obj.is_null());
        let msg = drain_last_error().expect("overflow should record an error");
        assert!(msg.contains("overflows"));
    }

    #[test]
    fn test_write_read_round_trip() {
        let obj = dm_new(2, 3);
        assert!(!obj.is_null());
        let written = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut read_back = [0.0f64; 6];
        unsafe {
            assert_eq!(dm_write(obj, written.as_ptr(), 6), DmStatus::Ok);
            assert_eq!(dm_read(obj, read_back.as_mut_ptr(), 6), DmStatus::Ok);
            dm_delete(obj);
        }
        assert_eq!(read_back, written);
    }

    #[test]
    fn test_write_count_mismatch() {
        let obj = dm_new(2, 3);
        let data = [0.0f64; 4];
        unsafe {
            assert_eq!(dm_write(obj, data.as_ptr(), 4), DmStatus::BadSize);
            dm_delete(obj);
        }
    }

    #[test]
    fn test_null_buffer_rules() {
        let obj = dm_new(2, 3);
        let empty = dm_new(0, 0);
        unsafe {
            assert_eq!(dm_write(obj, std::ptr::null(), 6), DmStatus::Null);
            assert_eq!(dm_read(obj, std::ptr::null_mut(), 6), DmStatus::Null);
            // null buffer with zero required count is valid
            assert_eq!(dm_write(empty, std::ptr::null(), 0), DmStatus::Ok);
            assert_eq!(dm_read(empty, std::ptr::null_mut(), 0), DmStatus::Ok);
            assert_eq!(
                dm_write(std::ptr::null_mut(), std::ptr::null(), 0),
                DmStatus::Null
            );
            dm_delete(obj);
            dm_delete(empty);
        }
    }

    #[test]
    fn test_mul_produces_new_handle() {
        let a = dm_new(2, 3);
        let b = dm_new(3, 2);
        let a_data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b_data = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut out: *mut DmMatrix = std::ptr::null_mut();
        let mut product = [0.0f64; 4];
        unsafe {
            assert_eq!(dm_write(a, a_data.as_ptr(), 6), DmStatus::Ok);
            assert_eq!(dm_write(b, b_data.as_ptr(), 6), DmStatus::Ok);
            assert_eq!(dm_mul(a, b, &mut out), DmStatus::Ok);
            assert!(!out.is_null());
            assert_eq!(dm_rows(out), 2);
            assert_eq!(dm_cols(out), 2);
            assert_eq!(dm_read(out, product.as_mut_ptr(), 4), DmStatus::Ok);
            dm_delete(a);
            dm_delete(b);
            dm_delete(out);
        }
        assert_eq!(product, [58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_mul_shape_mismatch() {
        let a = dm_new(2, 3);
        let b = dm_new(4, 2);
        let mut out: *mut DmMatrix = std::ptr::null_mut();
        unsafe {
            assert_eq!(dm_mul(a, b, &mut out), DmStatus::BadSize);
            assert!(out.is_null());
            dm_delete(a);
            dm_delete(b);
        }
    }

    #[test]
    fn test_mul_null_arguments() {
        let a = dm_new(2, 2);
        let mut out: *mut DmMatrix = std::ptr::null_mut();
        unsafe {
            assert_eq!(dm_mul(std::ptr::null(), a, &mut out), DmStatus::Null);
            assert_eq!(dm_mul(a, std::ptr::null(), &mut out), DmStatus::Null);
            assert_eq!(dm_mul(a, a, std::ptr::null_mut()), DmStatus::Null);
            dm_delete(a);
        }
    }

    #[test]
    fn test_mul_algo_selection() {
        let a = dm_new(2, 2);
        let b = dm_new(2, 2);
        let a_data = [1.0, 2.0, 3.0, 4.0];
        let b_data = [5.0, 6.0, 7.0, 8.0];
        unsafe {
            assert_eq!(dm_write(a, a_data.as_ptr(), 4), DmStatus::Ok);
            assert_eq!(dm_write(b, b_data.as_ptr(), 4), DmStatus::Ok);
            for algo in 0..4u32 {
                let mut out: *mut DmMatrix = std::ptr::null_mut();
                let mut product = [0.0f64; 4];
                assert_eq!(dm_mul_algo(a, b, algo, 0, &mut out), DmStatus::Ok);
                assert_eq!(dm_read(out, product.as_mut_ptr(), 4), DmStatus::Ok);
                assert_eq!(product, [19.0, 22.0, 43.0, 50.0], "algo={algo}");
                dm_delete(out);
            }
            // closed set: unknown values are rejected
            let mut out: *mut DmMatrix = std::ptr::null_mut();
            assert_eq!(dm_mul_algo(a, b, 4, 0, &mut out), DmStatus::BadSize);
            dm_delete(a);
            dm_delete(b);
        }
    }
}
