//! Numerical constants for RF calculations
//!
//! Provides the tolerance values and parse-boundary defaults shared by the
//! parser, the converters and the Smith chart geometry.

/// Tolerance for detecting near-zero values in division and singularity checks.
/// A matrix whose determinant magnitude falls below this is treated as singular.
pub const NEAR_ZERO: f64 = 1e-15;

/// Tolerance for detecting tangency between a grid circle and the unit circle.
pub const TANGENT_TOL: f64 = 1e-12;

/// Magnitude floor applied before taking a logarithm for dB traces.
pub const MIN_MAGNITUDE: f64 = 1e-12;

/// Reference impedance assumed when a Touchstone option line omits `R <value>`.
///
/// Only the parser applies this default. Every conversion takes its reference
/// impedance explicitly.
pub const DEFAULT_Z0: f64 = 50.0;

/// Largest port count accepted from a `.sNp` extension or `[Number of Ports]`.
pub const MAX_PORTS: usize = 99;

/// Number of non-empty lines inspected when looking for a `[Version]` keyword.
pub const VERSION_SCAN_LINES: usize = 10;
