use std::ops::{Add, AddAssign, Mul};

/// Element types that can participate in matrix arithmetic.
///
/// A scalar must be default-constructible, cloneable, and support `+`,
/// `*`, and `==`. `AddAssign` is the accumulate form of `+` that every
/// multiplication kernel uses when summing partial products into the
/// result buffer.
///
/// The bound is satisfied by the ordinary numeric types (`f32`, `f64`,
/// the integer types, `half::f16`) and by [`Matrix<T>`](crate::Matrix)
/// itself, so a matrix of matrices multiplies with exactly the same
/// kernels as a matrix of numbers.
pub trait Scalar:
    Default + Clone + PartialEq + Add<Output = Self> + AddAssign + Mul<Output = Self>
{
}

impl<T> Scalar for T where
    T: Default + Clone + PartialEq + Add<Output = Self> + AddAssign + Mul<Output = Self>
{
}
