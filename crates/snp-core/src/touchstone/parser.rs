//! Touchstone file parser
//!
//! Implements parsing of Touchstone v1 and v2 network data into an S-family
//! [`Network`]. Parsing is all-or-nothing: any malformed token, header or
//! count fails the whole file.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array3;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::{MatrixFormat, TouchstoneHeader, TouchstoneKeywords, TwoPortOrder};
use crate::constants::{DEFAULT_Z0, MAX_PORTS, VERSION_SCAN_LINES};
use crate::frequency::{Frequency, FrequencyError};
use crate::network::{Network, NetworkError, ParameterFamily};

/// Touchstone parsing errors
#[derive(Error, Debug)]
pub enum TouchstoneError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file extension `{0}`: expected .sNp or .sN with N in 1..=99")]
    InvalidExtension(String),

    #[error("port count unknown: version 1 data needs a .sNp extension")]
    UnknownPortCount,

    #[error("invalid port count {0}: expected 1..=99")]
    InvalidPortCount(usize),

    #[error("file extension implies {extension} ports but [Number of Ports] is {declared}")]
    PortCountMismatch { extension: usize, declared: usize },

    #[error("file is empty")]
    Empty,

    #[error("option line (# ...) not found")]
    MissingHeader,

    #[error("malformed option line `{line}`: {reason}")]
    MalformedHeader { line: String, reason: String },

    #[error("invalid frequency unit `{0}`: expected one of HZ, KHZ, MHZ, GHZ, THZ")]
    InvalidFrequencyUnit(String),

    #[error("unsupported parameter type `{0}`: only S-parameters are supported")]
    UnsupportedParameter(String),

    #[error("invalid data format `{0}`: expected one of DB, MA, RI")]
    InvalidDataFormat(String),

    #[error("invalid reference impedance `{0}`: must be a positive number")]
    InvalidImpedance(String),

    #[error("required keyword [{0}] is missing")]
    MissingKeyword(&'static str),

    #[error("invalid value `{value}` for keyword [{keyword}]")]
    InvalidKeyword { keyword: String, value: String },

    #[error("no numeric data found")]
    NoData,

    #[error(
        "insufficient values for a {nports}-port network: expected {expected} per frequency point, got {got}"
    )]
    InsufficientValues {
        nports: usize,
        expected: usize,
        got: usize,
    },

    #[error(
        "data columns don't match a {nports}-port network: {got} values is not a multiple of {expected}"
    )]
    ColumnCountMismatch {
        nports: usize,
        expected: usize,
        got: usize,
    },

    #[error("non-numeric token `{token}` at line {line}")]
    NonNumericToken { token: String, line: usize },

    #[error("non-finite value `{token}` at line {line}")]
    NonFiniteValue { token: String, line: usize },

    #[error("entry ({row}, {col}) of frequency point {index} at line {line} is not finite")]
    NonFiniteEntry {
        index: usize,
        row: usize,
        col: usize,
        line: usize,
    },

    #[error(
        "frequencies must be strictly increasing: point {index} ({current} Hz) follows {previous} Hz"
    )]
    NonMonotonicFrequency {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("invalid network data: {0}")]
    InvalidNetwork(#[from] NetworkError),
}

/// Touchstone format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchstoneVersion {
    V1,
    V2,
}

/// Everything read from a file besides the network data itself
#[derive(Debug, Clone)]
pub struct TouchstoneMetadata {
    pub version: TouchstoneVersion,
    pub header: TouchstoneHeader,
    /// Option line as written in the file
    pub header_line: String,
    /// Present for version 2 files only
    pub keywords: Option<TouchstoneKeywords>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    /// `!` comment lines with the marker stripped
    pub comments: Vec<String>,
}

/// A parsed Touchstone file
#[derive(Debug, Clone)]
pub struct Touchstone {
    /// S-parameter network
    pub network: Network,
    pub metadata: TouchstoneMetadata,
}

/// Cut a data line at its inline comment
///
/// The comment starts at `!`. Only when the line has no `!` does a `#` start
/// the comment.
pub fn strip_inline_comment(line: &str) -> &str {
    match line.find('!').or_else(|| line.find('#')) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Look for `[Version]` in the first few non-empty lines
pub fn detect_version(lines: &[&str]) -> TouchstoneVersion {
    let is_v2 = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .take(VERSION_SCAN_LINES)
        .any(|l| l.to_lowercase().starts_with("[version]"));

    if is_v2 {
        TouchstoneVersion::V2
    } else {
        TouchstoneVersion::V1
    }
}

/// Decode file bytes as UTF-8, falling back to Latin-1
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("file is not valid UTF-8, decoding as Latin-1");
            err.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    }
}

impl Touchstone {
    /// Parse a Touchstone file
    ///
    /// The port count comes from a `.sNp` / `.sN` extension. A `.ts` file
    /// must be version 2 and declare `[Number of Ports]`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TouchstoneError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TouchstoneError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let nports = Self::parse_extension(ext)?;

        let bytes = fs::read(path)?;
        let file_size = bytes.len() as u64;
        let content = decode(bytes);

        let mut ts = Self::parse(&content, nports, ext.eq_ignore_ascii_case("ts"))?;
        ts.metadata.file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        ts.metadata.file_size = Some(file_size);
        if let Some(stem) = path.file_stem() {
            ts.network = ts.network.with_name(stem.to_string_lossy());
        }
        Ok(ts)
    }

    /// Parse from string content
    ///
    /// `nports` plays the role of the file extension. It is required for
    /// version 1 content and must agree with `[Number of Ports]` for
    /// version 2 content when given.
    ///
    /// # Example
    /// ```
    /// use snp_core::touchstone::Touchstone;
    /// let content = "# GHz S RI R 50\n1.0 0.1 0.0 0.9 0.0 0.9 0.0 0.1 0.0";
    /// let ts = Touchstone::from_content(content, Some(2)).unwrap();
    /// assert_eq!(ts.network.nports(), 2);
    /// ```
    pub fn from_content(content: &str, nports: Option<usize>) -> Result<Self, TouchstoneError> {
        Self::parse(content, nports, false)
    }

    /// Parse extension to get number of ports
    ///
    /// Returns `None` for `.ts`, whose port count comes from the file body.
    fn parse_extension(ext: &str) -> Result<Option<usize>, TouchstoneError> {
        let ext_lower = ext.to_lowercase();
        if ext_lower == "ts" {
            return Ok(None);
        }

        let invalid = || TouchstoneError::InvalidExtension(ext.to_string());
        let digits = ext_lower.strip_prefix('s').ok_or_else(invalid)?;
        let digits = digits.strip_suffix('p').unwrap_or(digits);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        match digits.parse::<usize>() {
            Ok(n) if (1..=MAX_PORTS).contains(&n) => Ok(Some(n)),
            _ => Err(invalid()),
        }
    }

    fn parse(
        content: &str,
        nports_hint: Option<usize>,
        requires_v2: bool,
    ) -> Result<Self, TouchstoneError> {
        if content.trim().is_empty() {
            return Err(TouchstoneError::Empty);
        }

        let lines: Vec<&str> = content.lines().collect();
        let version = detect_version(&lines);

        let (nports, keywords) = match version {
            TouchstoneVersion::V1 if requires_v2 => {
                return Err(TouchstoneError::InvalidExtension("ts".to_string()))
            }
            TouchstoneVersion::V1 => {
                let nports = nports_hint.ok_or(TouchstoneError::UnknownPortCount)?;
                (nports, None)
            }
            TouchstoneVersion::V2 => {
                let keywords = TouchstoneKeywords::scan(&lines)?;
                let declared = keywords
                    .number_of_ports
                    .ok_or(TouchstoneError::MissingKeyword("Number of Ports"))?;
                if let Some(extension) = nports_hint {
                    if extension != declared {
                        return Err(TouchstoneError::PortCountMismatch {
                            extension,
                            declared,
                        });
                    }
                }
                (declared, Some(keywords))
            }
        };

        let header_idx = lines
            .iter()
            .position(|l| l.trim_start().starts_with('#'))
            .ok_or(TouchstoneError::MissingHeader)?;
        let header_line = lines[header_idx].trim().to_string();
        let header = TouchstoneHeader::parse(&header_line)?;

        let z0 = match keywords.as_ref().and_then(|k| k.reference) {
            Some(reference) if header.reference_impedance != DEFAULT_Z0 => {
                tracing::warn!(
                    reference,
                    header = header.reference_impedance,
                    "option line reference impedance overrides [Reference]"
                );
                header.reference_impedance
            }
            Some(reference) => reference,
            None => header.reference_impedance,
        };

        let comments = lines
            .iter()
            .filter_map(|l| l.trim().strip_prefix('!'))
            .map(|c| c.trim().to_string())
            .collect();

        let layout = DataLayout {
            nports,
            matrix_format: keywords
                .as_ref()
                .and_then(|k| k.matrix_format)
                .unwrap_or_default(),
            two_port_order: keywords
                .as_ref()
                .and_then(|k| k.two_port_order)
                .unwrap_or_default(),
        };

        let tokens = collect_tokens(&lines[header_idx + 1..], header_idx + 2, version, nports);
        let values = layout.check_and_parse(&tokens)?;
        let (freqs, params) = layout.assemble(&values, &tokens, &header)?;

        let frequency = Frequency::try_from_hz(freqs, header.frequency_unit).map_err(|e| match e {
            FrequencyError::NotIncreasing {
                index,
                previous,
                current,
            } => TouchstoneError::NonMonotonicFrequency {
                index,
                previous,
                current,
            },
            other => TouchstoneError::InvalidNetwork(other.into()),
        })?;

        let network = Network::new(frequency, params, z0, ParameterFamily::S)?;

        tracing::debug!(
            ?version,
            nports,
            npoints = network.nfreq(),
            format = ?header.data_format,
            z0,
            "parsed touchstone data"
        );

        Ok(Self {
            network,
            metadata: TouchstoneMetadata {
                version,
                header,
                header_line,
                keywords,
                file_name: None,
                file_size: None,
                comments,
            },
        })
    }

    /// Number of ports
    pub fn nports(&self) -> usize {
        self.network.nports()
    }

    /// Get the number of frequency points
    pub fn nfreq(&self) -> usize {
        self.network.nfreq()
    }
}

/// A whitespace-separated token with its 1-based line number
struct Token<'a> {
    text: &'a str,
    line: usize,
}

/// Gather data tokens from the lines after the option line
///
/// Version 2 keyword lines are skipped, as are `[Begin Information]` blocks
/// and the lines a `[Reference]` keyword continues onto. Reading stops at
/// `[Noise Data]` or `[End]`.
fn collect_tokens<'a>(
    lines: &[&'a str],
    first_line_no: usize,
    version: TouchstoneVersion,
    nports: usize,
) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut in_information = false;
    // reference values still expected on following lines
    let mut reference_pending = 0usize;

    for (offset, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }

        if version == TouchstoneVersion::V2 && trimmed.starts_with('[') {
            let lower = strip_inline_comment(trimmed).trim_end().to_lowercase();
            if lower.starts_with("[noise data]") || lower.starts_with("[end]") {
                break;
            }
            if lower.starts_with("[begin information]") {
                in_information = true;
            } else if lower.starts_with("[end information]") {
                in_information = false;
            }
            reference_pending = match lower.strip_prefix("[reference]") {
                Some(rest) => nports.saturating_sub(rest.split_whitespace().count()),
                None => 0,
            };
            continue;
        }
        if in_information {
            continue;
        }
        if reference_pending > 0 {
            let count = strip_inline_comment(trimmed).split_whitespace().count();
            reference_pending = reference_pending.saturating_sub(count);
            continue;
        }

        let line = first_line_no + offset;
        tokens.extend(
            strip_inline_comment(trimmed)
                .split_whitespace()
                .map(|text| Token { text, line }),
        );
    }

    tokens
}

/// How values are arranged for one frequency point
struct DataLayout {
    nports: usize,
    matrix_format: MatrixFormat,
    two_port_order: TwoPortOrder,
}

impl DataLayout {
    /// Values per frequency point: the frequency plus two per complex entry
    fn values_per_point(&self) -> usize {
        1 + 2 * self.matrix_format.entries(self.nports)
    }

    fn check_and_parse(&self, tokens: &[Token<'_>]) -> Result<Vec<f64>, TouchstoneError> {
        if tokens.is_empty() {
            return Err(TouchstoneError::NoData);
        }

        let expected = self.values_per_point();
        let got = tokens.len();
        if got % expected != 0 {
            return Err(if got < expected {
                TouchstoneError::InsufficientValues {
                    nports: self.nports,
                    expected,
                    got,
                }
            } else {
                TouchstoneError::ColumnCountMismatch {
                    nports: self.nports,
                    expected,
                    got,
                }
            });
        }

        tokens
            .iter()
            .map(|t| {
                let value = t
                    .text
                    .parse::<f64>()
                    .map_err(|_| TouchstoneError::NonNumericToken {
                        token: t.text.to_string(),
                        line: t.line,
                    })?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(TouchstoneError::NonFiniteValue {
                        token: t.text.to_string(),
                        line: t.line,
                    })
                }
            })
            .collect()
    }

    /// (row, col) of each complex entry in file order
    fn positions(&self) -> Vec<(usize, usize)> {
        let n = self.nports;
        match self.matrix_format {
            MatrixFormat::Full if n == 2 && self.two_port_order == TwoPortOrder::S12First => {
                vec![(0, 0), (0, 1), (1, 0), (1, 1)]
            }
            // column-major: S11 S21 ... Sn1 S12 ...
            MatrixFormat::Full => (0..n)
                .flat_map(|col| (0..n).map(move |row| (row, col)))
                .collect(),
            MatrixFormat::Lower => (0..n).flat_map(|i| (0..=i).map(move |j| (i, j))).collect(),
            MatrixFormat::Upper => (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect(),
        }
    }

    /// Split values into frequencies (Hz) and complex matrices
    ///
    /// Finite pairs can still overflow in conversion (a huge dB magnitude),
    /// so every entry is checked and reported at the line of its first value.
    fn assemble(
        &self,
        values: &[f64],
        tokens: &[Token<'_>],
        header: &TouchstoneHeader,
    ) -> Result<(Vec<f64>, Array3<Complex64>), TouchstoneError> {
        let n = self.nports;
        let per_point = self.values_per_point();
        let npoints = values.len() / per_point;
        let positions = self.positions();
        let mult = header.frequency_unit.multiplier();
        let symmetric = self.matrix_format != MatrixFormat::Full;

        let mut freqs = Vec::with_capacity(npoints);
        let mut params = Array3::<Complex64>::zeros((npoints, n, n));

        for (f, point) in values.chunks_exact(per_point).enumerate() {
            freqs.push(point[0] * mult);
            for (k, (&(row, col), pair)) in positions
                .iter()
                .zip(point[1..].chunks_exact(2))
                .enumerate()
            {
                let v = header.data_format.to_complex(pair[0], pair[1]);
                if !v.is_finite() {
                    return Err(TouchstoneError::NonFiniteEntry {
                        index: f,
                        row,
                        col,
                        line: tokens[f * per_point + 1 + 2 * k].line,
                    });
                }
                params[[f, row, col]] = v;
                if symmetric {
                    params[[f, col, row]] = v;
                }
            }
        }

        Ok((freqs, params))
    }
}
