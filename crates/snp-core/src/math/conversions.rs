//! Unit conversion functions
//!
//! Conversions between the complex representations found in Touchstone
//! data (real/imaginary, magnitude/angle, dB/angle) and the scalar traces
//! derived from them.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::constants::MIN_MAGNITUDE;

/// Convert complex number to magnitude
pub fn complex_2_magnitude(z: Complex64) -> f64 {
    z.norm()
}

/// Convert complex number to dB (20*log10(|z|)) with the magnitude floored
/// at [`MIN_MAGNITUDE`], so an exact zero maps to -240 dB instead of -inf
pub fn complex_2_db(z: Complex64) -> f64 {
    magnitude_2_db(z.norm().max(MIN_MAGNITUDE))
}

/// Convert complex number to phase in radians
pub fn complex_2_radian(z: Complex64) -> f64 {
    z.arg()
}

/// Convert complex number to phase in degrees
pub fn complex_2_degree(z: Complex64) -> f64 {
    radian_2_degree(z.arg())
}

/// Convert magnitude to dB (20*log10(mag))
pub fn magnitude_2_db(mag: f64) -> f64 {
    20.0 * mag.log10()
}

/// Convert dB to magnitude (10^(dB/20))
pub fn db_2_magnitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert (real, imaginary) to complex
pub fn reim_2_reim(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Convert (magnitude, degree) to complex
pub fn magdeg_2_reim(mag: f64, deg: f64) -> Complex64 {
    Complex64::from_polar(mag, degree_2_radian(deg))
}

/// Convert (dB, degree) to complex
pub fn dbdeg_2_reim(db: f64, deg: f64) -> Complex64 {
    magdeg_2_reim(db_2_magnitude(db), deg)
}

/// Convert radians to degrees
pub fn radian_2_degree(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Convert degrees to radians
pub fn degree_2_radian(deg: f64) -> f64 {
    deg * PI / 180.0
}
