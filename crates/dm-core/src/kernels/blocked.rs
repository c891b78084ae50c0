use std::mem;

use super::tile::optimal_tile;
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Blocked multiplication with tile loops ordered i, j, p.
///
/// All three dimensions are tiled. The innermost accumulation over `p` is
/// unrolled by four with a scalar tail, trading code size for reduced loop
/// overhead and better auto-vectorisation.
pub(crate) fn multiply_ijp<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
    tile: usize,
) {
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    let tile = if tile == 0 { optimal_tile::<T>(m, n, k) } else { tile };
    let av = a.data();
    let bv = b.data();
    let cv = c.data_mut();

    for ib in (0..m).step_by(tile) {
        let i_end = (ib + tile).min(m);
        for jb in (0..n).step_by(tile) {
            let j_end = (jb + tile).min(n);
            for pb in (0..k).step_by(tile) {
                let p_end = (pb + tile).min(k);
                for i in ib..i_end {
                    for j in jb..j_end {
                        let mut acc = mem::take(&mut cv[i * n + j]);
                        let mut p = pb;
                        while p + 4 <= p_end {
                            acc += av[i * k + p].clone() * bv[p * n + j].clone();
                            acc += av[i * k + p + 1].clone() * bv[(p + 1) * n + j].clone();
                            acc += av[i * k + p + 2].clone() * bv[(p + 2) * n + j].clone();
                            acc += av[i * k + p + 3].clone() * bv[(p + 3) * n + j].clone();
                            p += 4;
                        }
                        while p < p_end {
                            acc += av[i * k + p].clone() * bv[p * n + j].clone();
                            p += 1;
                        }
                        cv[i * n + j] = acc;
                    }
                }
            }
        }
    }
}

/// Blocked multiplication with tile loops ordered i, p, j.
///
/// Same tiling as [`multiply_ijp`] with the p and j tile loops swapped, so
/// the innermost loop walks row `p` of `b` and row `i` of `c` sequentially.
/// The per-element loop over `j` is unrolled by four with a scalar tail.
pub(crate) fn multiply_ipj<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
    tile: usize,
) {
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    let tile = if tile == 0 { optimal_tile::<T>(m, n, k) } else { tile };
    let av = a.data();
    let bv = b.data();
    let cv = c.data_mut();

    for ib in (0..m).step_by(tile) {
        let i_end = (ib + tile).min(m);
        for pb in (0..k).step_by(tile) {
            let p_end = (pb + tile).min(k);
            for jb in (0..n).step_by(tile) {
                let j_end = (jb + tile).min(n);
                for i in ib..i_end {
                    for p in pb..p_end {
                        let aip = av[i * k + p].clone();
                        let mut j = jb;
                        while j + 4 <= j_end {
                            cv[i * n + j] += aip.clone() * bv[p * n + j].clone();
                            cv[i * n + j + 1] += aip.clone() * bv[p * n + j + 1].clone();
                            cv[i * n + j + 2] += aip.clone() * bv[p * n + j + 2].clone();
                            cv[i * n + j + 3] += aip.clone() * bv[p * n + j + 3].clone();
                            j += 4;
                        }
                        while j < j_end {
                            cv[i * n + j] += aip.clone() * bv[p * n + j].clone();
                            j += 1;
                        }
                    }
                }
            }
        }
    }
}
