mod blocked;
mod native;
mod tile;
mod transpose;

pub use tile::optimal_tile;

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Selects a dense matrix multiplication strategy.
///
/// The variants trade locality, tiling, and instruction-level parallelism
/// differently; all produce identical results for exact scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MulAlgo {
    /// Reference triple loop in i-p-j order.
    Native,
    /// Transposes the right operand, then computes contiguous dot products.
    Transpose,
    /// Tiles all three dimensions, tile loops ordered i, j, p.
    BlockIjp,
    /// Tiles all three dimensions, tile loops ordered i, p, j.
    BlockIpj,
}

impl MulAlgo {
    /// Converts a raw integer (as used by the boundary layers) to an
    /// algorithm, or `None` for an unrecognized value.
    pub fn from_raw(raw: u32) -> Option<MulAlgo> {
        match raw {
            0 => Some(MulAlgo::Native),
            1 => Some(MulAlgo::Transpose),
            2 => Some(MulAlgo::BlockIjp),
            3 => Some(MulAlgo::BlockIpj),
            _ => None,
        }
    }
}

/// Multiplication dispatcher.
///
/// Validates shape compatibility once, allocates the default-initialised
/// result, and delegates to the selected kernel. A result with zero
/// elements is returned as-is without entering a kernel.
pub(crate) fn multiply<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    algo: MulAlgo,
    tile: usize,
) -> Result<Matrix<T>> {
    if a.cols() != b.rows() {
        return Err(MatrixError::MulMismatch {
            m: a.rows(),
            k: a.cols(),
            k2: b.rows(),
            n: b.cols(),
        });
    }
    let mut c = Matrix::with_shape(a.rows(), b.cols())?;
    if c.is_empty() {
        return Ok(c);
    }
    match algo {
        MulAlgo::Native => native::multiply(a, b, &mut c),
        MulAlgo::Transpose => transpose::multiply(a, b, &mut c, tile),
        MulAlgo::BlockIjp => blocked::multiply_ijp(a, b, &mut c, tile),
        MulAlgo::BlockIpj => blocked::multiply_ipj(a, b, &mut c, tile),
    }
    Ok(c)
}
