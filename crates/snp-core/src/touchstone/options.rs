//! Touchstone option line and version 2 keywords
//!
//! The option line has the strict form `# <unit> <param> <format> R [<z0>]`.
//! Version 2 keywords may be written as `[Keyword] Value` or `[Keyword Value]`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::parser::{strip_inline_comment, TouchstoneError};
use crate::constants::{DEFAULT_Z0, MAX_PORTS};
use crate::frequency::FrequencyUnit;
use crate::math::conversions::{dbdeg_2_reim, magdeg_2_reim, reim_2_reim};

/// Network data pair format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataFormat {
    #[default]
    RI, // Real-Imaginary
    MA, // Magnitude-Angle (degrees)
    DB, // dB-Angle (degrees)
}

impl DataFormat {
    pub fn from_token(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RI" => Some(DataFormat::RI),
            "MA" => Some(DataFormat::MA),
            "DB" => Some(DataFormat::DB),
            _ => None,
        }
    }

    /// Combine a value pair into a complex number
    pub fn to_complex(self, a: f64, b: f64) -> Complex64 {
        match self {
            DataFormat::RI => reim_2_reim(a, b),
            DataFormat::MA => magdeg_2_reim(a, b),
            DataFormat::DB => dbdeg_2_reim(a, b),
        }
    }
}

/// Layout of each network data matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatrixFormat {
    #[default]
    Full,
    Lower,
    Upper,
}

impl MatrixFormat {
    pub fn from_token(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(MatrixFormat::Full),
            "lower" => Some(MatrixFormat::Lower),
            "upper" => Some(MatrixFormat::Upper),
            _ => None,
        }
    }

    /// Number of complex entries written per frequency point
    pub fn entries(self, nports: usize) -> usize {
        match self {
            MatrixFormat::Full => nports * nports,
            MatrixFormat::Lower | MatrixFormat::Upper => nports * (nports + 1) / 2,
        }
    }
}

/// Order of the off-diagonal pairs in 2-port data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TwoPortOrder {
    /// S11 S21 S12 S22
    #[default]
    S21First,
    /// S11 S12 S21 S22
    S12First,
}

/// Parsed option line
#[derive(Debug, Clone, PartialEq)]
pub struct TouchstoneHeader {
    pub frequency_unit: FrequencyUnit,
    pub parameter: String,
    pub data_format: DataFormat,
    pub reference_impedance: f64,
}

impl TouchstoneHeader {
    /// Parse an option line such as `# GHz S MA R 50`
    pub fn parse(line: &str) -> Result<Self, TouchstoneError> {
        let malformed = |reason: String| TouchstoneError::MalformedHeader {
            line: line.trim().to_string(),
            reason,
        };

        let body = line
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| malformed("option line must start with `#`".to_string()))?;
        let body = body.find('!').map_or(body, |idx| &body[..idx]);
        let parts: Vec<&str> = body.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(malformed(format!(
                "expected `# <unit> <param> <format> R [<impedance>]`, found {} fields",
                parts.len()
            )));
        }

        let frequency_unit = FrequencyUnit::from_token(parts[0])
            .ok_or_else(|| TouchstoneError::InvalidFrequencyUnit(parts[0].to_string()))?;

        if !parts[1].eq_ignore_ascii_case("S") {
            return Err(TouchstoneError::UnsupportedParameter(parts[1].to_string()));
        }

        let data_format = DataFormat::from_token(parts[2])
            .ok_or_else(|| TouchstoneError::InvalidDataFormat(parts[2].to_string()))?;

        if !parts[3].eq_ignore_ascii_case("R") {
            return Err(malformed(format!(
                "expected `R` before the reference impedance, found `{}`",
                parts[3]
            )));
        }

        let reference_impedance = match parts.get(4) {
            None => DEFAULT_Z0,
            Some(token) => parse_impedance(token)?,
        };

        Ok(Self {
            frequency_unit,
            parameter: parts[1].to_uppercase(),
            data_format,
            reference_impedance,
        })
    }
}

fn parse_impedance(token: &str) -> Result<f64, TouchstoneError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|z| z.is_finite() && *z > 0.0)
        .ok_or_else(|| TouchstoneError::InvalidImpedance(token.to_string()))
}

/// Version 2 keywords that affect parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchstoneKeywords {
    pub version: Option<String>,
    pub number_of_ports: Option<usize>,
    pub reference: Option<f64>,
    pub matrix_format: Option<MatrixFormat>,
    pub two_port_order: Option<TwoPortOrder>,
}

const KNOWN_KEYWORDS: [&str; 5] = [
    "version",
    "number of ports",
    "reference",
    "matrix format",
    "two-port data order",
];

/// Split a bracketed line into a normalized keyword and its value
///
/// Handles `[Keyword] Value` as well as `[Keyword Value]`. Returns `None`
/// for lines that are not keywords.
fn split_keyword(line: &str) -> Option<(String, String)> {
    let line = strip_inline_comment(line).trim();
    let inner_start = line.strip_prefix('[')?;
    let close = inner_start.find(']')?;
    let inner = inner_start[..close].split_whitespace().collect::<Vec<_>>().join(" ");
    let rest = inner_start[close + 1..].trim();
    let inner_lower = inner.to_lowercase();

    if !rest.is_empty() {
        return Some((inner_lower, rest.to_string()));
    }

    for key in KNOWN_KEYWORDS {
        if let Some(value) = inner_lower.strip_prefix(key) {
            if value.starts_with(' ') {
                let value = inner.get(key.len()..).unwrap_or("").trim().to_string();
                return Some((key.to_string(), value));
            }
        }
    }
    Some((inner_lower, String::new()))
}

impl TouchstoneKeywords {
    /// Scan all lines for recognized keywords
    ///
    /// A `[Reference]` keyword with no value on its line takes its value from
    /// the next non-empty line.
    pub fn scan(lines: &[&str]) -> Result<Self, TouchstoneError> {
        let mut keywords = Self::default();
        let invalid = |keyword: &str, value: &str| TouchstoneError::InvalidKeyword {
            keyword: keyword.to_string(),
            value: value.to_string(),
        };

        for (idx, raw) in lines.iter().enumerate() {
            let Some((key, value)) = split_keyword(raw) else {
                continue;
            };

            match key.as_str() {
                "version" => {
                    keywords.version = value.split_whitespace().next().map(str::to_string);
                }
                "number of ports" => {
                    let n = value
                        .parse::<usize>()
                        .map_err(|_| invalid("Number of Ports", &value))?;
                    if n == 0 || n > MAX_PORTS {
                        return Err(TouchstoneError::InvalidPortCount(n));
                    }
                    keywords.number_of_ports = Some(n);
                }
                "reference" => {
                    let value = if value.is_empty() {
                        lines[idx + 1..]
                            .iter()
                            .map(|l| strip_inline_comment(l).trim())
                            .find(|l| !l.is_empty())
                            .unwrap_or("")
                            .to_string()
                    } else {
                        value
                    };
                    keywords.reference = Some(Self::parse_reference(&value)?);
                }
                "matrix format" => {
                    let format = MatrixFormat::from_token(&value)
                        .ok_or_else(|| invalid("Matrix Format", &value))?;
                    keywords.matrix_format = Some(format);
                }
                "two-port data order" => {
                    let order = match value.as_str() {
                        "12_21" => TwoPortOrder::S12First,
                        "21_12" => TwoPortOrder::S21First,
                        _ => return Err(invalid("Two-Port Data Order", &value)),
                    };
                    keywords.two_port_order = Some(order);
                }
                _ => {}
            }
        }

        Ok(keywords)
    }

    /// Take the first reference impedance; per-port references are not modelled
    fn parse_reference(value: &str) -> Result<f64, TouchstoneError> {
        let mut tokens = value.split_whitespace();
        let first = tokens.next().ok_or_else(|| TouchstoneError::InvalidKeyword {
            keyword: "Reference".to_string(),
            value: value.to_string(),
        })?;
        let z0 = parse_impedance(first)?;

        let differing = tokens
            .filter_map(|t| t.parse::<f64>().ok())
            .any(|z| (z - z0).abs() > f64::EPSILON * z0.abs());
        if differing {
            tracing::warn!(
                reference = value,
                z0,
                "per-port reference impedances are not supported, using the first value"
            );
        }
        Ok(z0)
    }
}
