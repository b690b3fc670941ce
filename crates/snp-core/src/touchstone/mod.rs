//! Touchstone file input
//!
//! Reads version 1 and version 2 Touchstone (.sNp) files into S-parameter
//! networks.

pub mod options;
pub mod parser;

pub use options::{DataFormat, MatrixFormat, TouchstoneHeader, TouchstoneKeywords, TwoPortOrder};
pub use parser::{Touchstone, TouchstoneError, TouchstoneMetadata, TouchstoneVersion};
