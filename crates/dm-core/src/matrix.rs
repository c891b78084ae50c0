use std::ops::{Add, AddAssign, Index, IndexMut, Mul};

use crate::error::{MatrixError, Result};
use crate::kernels::{self, optimal_tile, MulAlgo};
use crate::scalar::Scalar;

/// Dense matrix over contiguous row-major storage.
///
/// Element `(r, c)` lives at flat offset `r * cols + c`. The buffer length
/// equals `rows * cols` after every constructor and every mutating
/// operation. Copying duplicates the buffer; moving transfers ownership and
/// leaves the source logically empty.
///
/// Multiplication is dispatched through [`Matrix::multiply`] to one of the
/// kernels in [`MulAlgo`]. Because `Matrix<T>` itself satisfies [`Scalar`],
/// a block matrix (`Matrix<Matrix<U>>`) runs through the same kernels, with
/// element `+` and `*` being matrix addition and multiplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix<T> {
    row_count: usize,
    col_count: usize,
    values: Vec<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Computes `rows * cols`, failing if the product overflows `usize`.
    ///
    /// Every dimensioned constructor routes through this check before
    /// touching the allocator.
    pub(crate) fn checked_len(rows: usize, cols: usize) -> Result<usize> {
        rows.checked_mul(cols)
            .ok_or(MatrixError::SizeOverflow { rows, cols })
    }

    /// Reserves a buffer for `count` elements, reporting allocation failure
    /// instead of aborting.
    fn reserve_values(count: usize) -> Result<Vec<T>> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(count)
            .map_err(|_| MatrixError::AllocFailed { count })?;
        Ok(values)
    }

    /// Internal constructor for buffers whose length is already correct.
    pub(crate) fn from_parts(rows: usize, cols: usize, values: Vec<T>) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        Matrix {
            row_count: rows,
            col_count: cols,
            values,
        }
    }

    /// Creates an empty 0x0 matrix.
    pub fn new() -> Self {
        Matrix::default()
    }

    /// Creates a matrix with the given shape, default-initialising cells.
    pub fn with_shape(rows: usize, cols: usize) -> Result<Self> {
        let count = Self::checked_len(rows, cols)?;
        let mut values = Self::reserve_values(count)?;
        values.resize(count, T::default());
        Ok(Self::from_parts(rows, cols, values))
    }

    /// Creates a matrix by copying row-major data from a slice.
    ///
    /// The slice length must equal `rows * cols` exactly.
    pub fn from_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        let count = Self::checked_len(rows, cols)?;
        if data.len() != count {
            return Err(MatrixError::LengthMismatch {
                rows,
                cols,
                expected: count,
                got: data.len(),
            });
        }
        let mut values = Self::reserve_values(count)?;
        values.extend_from_slice(data);
        Ok(Self::from_parts(rows, cols, values))
    }

    /// Creates a matrix taking ownership of row-major data.
    ///
    /// The vector length must equal `rows * cols` exactly.
    pub fn from_vec(rows: usize, cols: usize, values: Vec<T>) -> Result<Self> {
        let count = Self::checked_len(rows, cols)?;
        if values.len() != count {
            return Err(MatrixError::LengthMismatch {
                rows,
                cols,
                expected: count,
                got: values.len(),
            });
        }
        Ok(Self::from_parts(rows, cols, values))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.col_count
    }

    /// Total number of stored elements.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the matrix stores no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the contiguous row-major buffer.
    pub fn data(&self) -> &[T] {
        &self.values
    }

    /// Returns the contiguous row-major buffer mutably.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    fn in_bounds(&self, r: usize, c: usize) -> bool {
        r < self.row_count && c < self.col_count
    }

    fn index_of(&self, r: usize, c: usize) -> usize {
        r * self.col_count + c
    }

    /// Bounds-checked element access.
    pub fn at(&self, r: usize, c: usize) -> Result<&T> {
        if !self.in_bounds(r, c) {
            return Err(MatrixError::OutOfRange {
                row: r,
                col: c,
                rows: self.row_count,
                cols: self.col_count,
            });
        }
        Ok(&self.values[self.index_of(r, c)])
    }

    /// Bounds-checked mutable element access.
    pub fn at_mut(&mut self, r: usize, c: usize) -> Result<&mut T> {
        if !self.in_bounds(r, c) {
            return Err(MatrixError::OutOfRange {
                row: r,
                col: c,
                rows: self.row_count,
                cols: self.col_count,
            });
        }
        let idx = self.index_of(r, c);
        Ok(&mut self.values[idx])
    }

    /// Adds two matrices of identical shape.
    pub fn add(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        if a.row_count != b.row_count || a.col_count != b.col_count {
            return Err(MatrixError::ShapeMismatch {
                a_rows: a.row_count,
                a_cols: a.col_count,
                b_rows: b.row_count,
                b_cols: b.col_count,
            });
        }
        let mut values = Self::reserve_values(a.values.len())?;
        values.extend(
            a.values
                .iter()
                .zip(b.values.iter())
                .map(|(x, y)| x.clone() + y.clone()),
        );
        Ok(Self::from_parts(a.row_count, a.col_count, values))
    }

    /// Multiplies two matrices using a selectable kernel.
    ///
    /// Validates `a.cols() == b.rows()`; the result shape is always
    /// `a.rows() x b.cols()`. `tile = 0` lets tiling kernels pick a size via
    /// [`optimal_tile`]; a nonzero tile is used verbatim.
    pub fn multiply(
        a: &Matrix<T>,
        b: &Matrix<T>,
        algo: MulAlgo,
        tile: usize,
    ) -> Result<Matrix<T>> {
        kernels::multiply(a, b, algo, tile)
    }

    /// Multiplies `self` by `other` with the blocked i-j-p kernel, which
    /// balances cache friendliness and performance for common shapes.
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        kernels::multiply(self, other, MulAlgo::BlockIjp, 0)
    }

    /// Naive transpose, returning a new matrix of swapped dimensions.
    pub fn transpose(&self) -> Matrix<T> {
        let rows = self.row_count;
        let cols = self.col_count;
        let mut values = vec![T::default(); self.values.len()];
        for r in 0..rows {
            for c in 0..cols {
                values[c * rows + r] = self.values[r * cols + c].clone();
            }
        }
        Self::from_parts(cols, rows, values)
    }

    /// Cache-tiled transpose that copies in `tile`-sized blocks.
    ///
    /// `tile = 0` selects a heuristic size. A row or column vector is a
    /// straight buffer copy, so it skips the blocked walk entirely.
    pub fn transpose_tiled(&self, tile: usize) -> Matrix<T> {
        let rows = self.row_count;
        let cols = self.col_count;
        if rows <= 1 || cols <= 1 {
            return Self::from_parts(cols, rows, self.values.clone());
        }
        let tile = if tile == 0 {
            optimal_tile::<T>(rows, cols, 0)
        } else {
            tile
        };
        let mut values = vec![T::default(); self.values.len()];
        for rb in (0..rows).step_by(tile) {
            let r_end = (rb + tile).min(rows);
            for cb in (0..cols).step_by(tile) {
                let c_end = (cb + tile).min(cols);
                for r in rb..r_end {
                    for c in cb..c_end {
                        values[c * rows + r] = self.values[r * cols + c].clone();
                    }
                }
            }
        }
        Self::from_parts(cols, rows, values)
    }
}

/// Unchecked element access over the flat buffer.
///
/// Indices are not validated against the matrix shape; callers must have
/// validated them separately. Used on internal, already-validated paths.
impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.values[r * self.col_count + c]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        let idx = r * self.col_count + c;
        &mut self.values[idx]
    }
}

impl<T: Scalar> Add for Matrix<T> {
    type Output = Matrix<T>;

    /// # Panics
    /// Panics if the shapes differ. Use [`Matrix::add`] for a fallible
    /// version.
    fn add(self, rhs: Matrix<T>) -> Matrix<T> {
        match Matrix::add(&self, &rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("matrix addition failed: {e}"),
        }
    }
}

impl<T: Scalar> AddAssign for Matrix<T> {
    /// In-place addition with the absorbing-empty policy: an empty `rhs` is
    /// a no-op, and an empty `self` adopts `rhs`'s shape and contents. This
    /// is what lets the kernels accumulate products into default-initialised
    /// (empty) cells of a block matrix.
    ///
    /// # Panics
    /// Panics if both operands are non-empty and the shapes differ.
    fn add_assign(&mut self, rhs: Matrix<T>) {
        if rhs.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = rhs;
            return;
        }
        if self.row_count != rhs.row_count || self.col_count != rhs.col_count {
            let e = MatrixError::ShapeMismatch {
                a_rows: self.row_count,
                a_cols: self.col_count,
                b_rows: rhs.row_count,
                b_cols: rhs.col_count,
            };
            panic!("matrix addition failed: {e}");
        }
        for (dst, src) in self.values.iter_mut().zip(rhs.values) {
            *dst += src;
        }
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Matrix<T>;

    /// # Panics
    /// Panics if `self.cols() != rhs.rows()`. Use [`Matrix::multiply`] or
    /// [`Matrix::matmul`] for a fallible version.
    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        match self.matmul(&rhs) {
            Ok(product) => product,
            Err(e) => panic!("matrix multiplication failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_construct() {
        let m: Matrix<f64> = Matrix::new();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
        assert_eq!(m.size(), 0);
        assert!(m.is_empty());
        assert_eq!(m, Matrix::with_shape(0, 0).unwrap());
    }

    #[test]
    fn test_with_shape_default_fills() {
        let m: Matrix<i32> = Matrix::with_shape(2, 3).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.size(), 6);
        assert_eq!(m.data(), &[0; 6]);
    }

    #[test]
    fn test_from_slice_and_from_vec_agree() {
        let m1 = Matrix::from_slice(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
        let m2 = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m1, m2);
        assert_eq!(*m1.at(0, 0).unwrap(), 1);
        assert_eq!(*m1.at(1, 2).unwrap(), 6);
    }

    #[test]
    fn test_length_mismatch() {
        let err = Matrix::from_vec(2, 2, vec![1, 2, 3, 4, 5, 6]).unwrap_err();
        assert!(matches!(err, MatrixError::LengthMismatch { expected: 4, got: 6, .. }));
        let err = Matrix::from_slice(2, 2, &[1.0; 6]).unwrap_err();
        assert!(matches!(err, MatrixError::LengthMismatch { .. }));
    }

    #[test]
    fn test_size_overflow_guard() {
        let err = Matrix::<f64>::with_shape(usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            MatrixError::SizeOverflow {
                rows: usize::MAX,
                cols: 2
            }
        );
    }

    #[test]
    fn test_at_out_of_range() {
        let mut m = Matrix::from_vec(2, 3, vec![0i64; 6]).unwrap();
        assert!(m.at(2, 0).is_err());
        assert!(m.at(0, 3).is_err());
        assert!(m.at(2, 3).is_err());
        assert!(m.at_mut(2, 0).is_err());
        assert!(m.at(1, 2).is_ok());
    }

    #[test]
    fn test_unchecked_index_and_at_agree() {
        let mut m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        m[(0, 1)] = 42;
        assert_eq!(*m.at(0, 1).unwrap(), 42);
        assert_eq!(m[(1, 2)], 6);
    }

    #[test]
    fn test_data_round_trip() {
        let mut m: Matrix<f64> = Matrix::with_shape(3, 2).unwrap();
        let written: Vec<f64> = (1..=6).map(f64::from).collect();
        m.data_mut().copy_from_slice(&written);
        assert_eq!(m.data(), written.as_slice());
        assert_eq!(m[(2, 1)], 6.0);
    }

    #[test]
    fn test_copy_and_move_value_semantics() {
        let m1 = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let m2 = m1.clone();
        assert_eq!(m1, m2);
        let m3 = m1;
        assert_eq!(m2, m3);
    }

    #[test]
    fn test_add_matched_shapes() {
        let a = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![10, 20, 30, 40]).unwrap();
        let sum = Matrix::add(&a, &b).unwrap();
        assert_eq!(sum.data(), &[11, 22, 33, 44]);
        assert_eq!(a.clone() + b, sum);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a: Matrix<i32> = Matrix::with_shape(2, 3).unwrap();
        let b: Matrix<i32> = Matrix::with_shape(3, 2).unwrap();
        assert!(matches!(
            Matrix::add(&a, &b).unwrap_err(),
            MatrixError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_add_assign_absorbs_empty() {
        let filled = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();

        // empty rhs: no-op
        let mut lhs = filled.clone();
        lhs += Matrix::new();
        assert_eq!(lhs, filled);

        // empty lhs adopts rhs
        let mut lhs: Matrix<i32> = Matrix::new();
        lhs += filled.clone();
        assert_eq!(lhs, filled);

        // zero-element non-0x0 shapes absorb too
        let mut lhs: Matrix<i32> = Matrix::with_shape(0, 5).unwrap();
        lhs += filled.clone();
        assert_eq!(lhs, filled);
    }

    #[test]
    fn test_add_assign_accumulates() {
        let mut acc = Matrix::from_vec(1, 2, vec![1, 2]).unwrap();
        acc += Matrix::from_vec(1, 2, vec![10, 20]).unwrap();
        assert_eq!(acc.data(), &[11, 22]);
    }

    #[test]
    #[should_panic(expected = "matrix addition failed")]
    fn test_add_assign_mismatch_panics() {
        let mut a = Matrix::from_vec(1, 2, vec![1, 2]).unwrap();
        a += Matrix::from_vec(2, 1, vec![1, 2]).unwrap();
    }

    #[test]
    fn test_equality_is_shape_and_values() {
        let m1: Matrix<f64> = Matrix::with_shape(2, 3).unwrap();
        let m2: Matrix<f64> = Matrix::with_shape(4, 2).unwrap();
        let m3: Matrix<f64> = Matrix::with_shape(4, 3).unwrap();
        let mut m4: Matrix<f64> = Matrix::with_shape(2, 3).unwrap();
        m4[(1, 2)] = 1.0;
        assert_ne!(m1, m2);
        assert_ne!(m2, m3);
        assert_ne!(m1, m3);
        assert_ne!(m1, m4);
    }

    #[test]
    fn test_transpose_naive() {
        let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.data(), &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_transpose_tiled_matches_naive() {
        let m = Matrix::from_vec(4, 5, (0..20).collect()).unwrap();
        for tile in [0, 1, 2, 3, 8] {
            assert_eq!(m.transpose_tiled(tile), m.transpose(), "tile={tile}");
        }
    }

    #[test]
    fn test_transpose_tiled_vector_copy() {
        let row = Matrix::from_vec(1, 4, vec![1, 2, 3, 4]).unwrap();
        let col = row.transpose_tiled(8);
        assert_eq!(col.rows(), 4);
        assert_eq!(col.cols(), 1);
        assert_eq!(col.data(), row.data());

        let empty: Matrix<i32> = Matrix::new();
        assert!(empty.transpose_tiled(4).is_empty());
    }
}
