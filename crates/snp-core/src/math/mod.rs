//! Mathematical functions module
//!
//! Scalar conversions, complex linear algebra, batched network-parameter
//! transforms and phase kernels.

pub mod conversions;
pub mod linalg;
pub mod phase;
pub mod transforms;

pub use conversions::*;
pub use transforms::*;
