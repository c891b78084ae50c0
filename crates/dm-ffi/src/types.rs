use dm_core::{Matrix, MatrixError};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmStatus {
    Ok = 0,
    Null = 1,
    BadSize = 2,
    BadAlloc = 3,
    Internal = 4,
}

impl From<&MatrixError> for DmStatus {
    fn from(e: &MatrixError) -> DmStatus {
        match e {
            MatrixError::AllocFailed { .. } => DmStatus::BadAlloc,
            MatrixError::SizeOverflow { .. }
            | MatrixError::LengthMismatch { .. }
            | MatrixError::ShapeMismatch { .. }
            | MatrixError::MulMismatch { .. } => DmStatus::BadSize,
            MatrixError::OutOfRange { .. } => DmStatus::Internal,
        }
    }
}

/// Opaque handle owning one double-precision matrix on the heap.
pub struct DmMatrix {
    pub(crate) inner: Matrix<f64>,
}
