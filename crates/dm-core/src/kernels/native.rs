use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Reference triple-loop multiplication in i-p-j order.
///
/// The i-p-j nesting (rather than the textbook i-j-p) keeps the innermost
/// loop walking row `p` of `b` and row `i` of `c` sequentially, avoiding
/// the strided access to `b` that i-j-p incurs on row-major storage.
pub(crate) fn multiply<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, c: &mut Matrix<T>) {
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    let av = a.data();
    let bv = b.data();
    let cv = c.data_mut();

    for i in 0..m {
        for p in 0..k {
            let aip = av[i * k + p].clone();
            for j in 0..n {
                cv[i * n + j] += aip.clone() * bv[p * n + j].clone();
            }
        }
    }
}
