use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("element count overflows usize: {rows} x {cols}")]
    SizeOverflow { rows: usize, cols: usize },
    #[error("data length {got} does not match {rows}x{cols} shape ({expected} elements)")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },
    #[error("shape mismatch: {a_rows}x{a_cols} + {b_rows}x{b_cols}")]
    ShapeMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("multiply dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    MulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("failed to allocate storage for {count} elements")]
    AllocFailed { count: usize },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
