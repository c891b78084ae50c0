//! `dm-core` - Dense row-major matrix type with selectable multiplication kernels.
//!
//! This crate provides:
//! - A generic [`Matrix<T>`] value type over flat row-major storage
//! - Four multiplication kernels ([`MulAlgo`]) trading locality, tiling,
//!   and instruction-level parallelism differently
//! - A cache-aware tile-size heuristic ([`optimal_tile`])
//! - A [`Scalar`] bound that `Matrix<T>` itself satisfies, so block
//!   matrices (matrices of matrices) multiply with the same kernels

pub mod error;
pub mod kernels;
pub mod matrix;
pub mod scalar;

// Re-export primary types at the crate root for convenience.
pub use error::{MatrixError, Result};
pub use kernels::{optimal_tile, MulAlgo};
pub use matrix::Matrix;
pub use scalar::Scalar;
