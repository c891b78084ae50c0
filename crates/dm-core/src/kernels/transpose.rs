use std::mem;

use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Multiplication via a transposed right operand.
///
/// Transposes `b` up front so every output element becomes a dot product
/// of two contiguous rows, which is friendly to vectorisation at the cost
/// of the extra transpose pass. A nonzero `tile` routes the transpose
/// through the cache-tiled variant; zero uses the naive transpose.
pub(crate) fn multiply<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>, tile: usize) {
    let bt = if tile == 0 {
        b.transpose()
    } else {
        b.transpose_tiled(tile)
    };

    let m = a.rows();
    let k = a.cols();
    let n = bt.rows();
    let av = a.data();
    let btv = bt.data();
    let cv = c.data_mut();

    for i in 0..m {
        for j in 0..n {
            let mut acc = mem::take(&mut cv[i * n + j]);
            for p in 0..k {
                acc += av[i * k + p].clone() * btv[j * k + p].clone();
            }
            cv[i * n + j] = acc;
        }
    }
}
