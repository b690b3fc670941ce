//! Touchstone parsing tests
//!
//! Reads the fixtures under tests/data and checks values, metadata and
//! error reporting.

use std::io::Write;

use approx::assert_relative_eq;
use num_complex::Complex64;
use snp_core::network::Network;
use snp_core::touchstone::{
    DataFormat, MatrixFormat, Touchstone, TouchstoneError, TouchstoneVersion, TwoPortOrder,
};

const TEST_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/data");

fn data_path(name: &str) -> String {
    format!("{}/{}", TEST_DATA_DIR, name)
}

/// Write `content` to a temporary file with the given extension
fn temp_touchstone(content: &str, extension: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("dut")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

fn assert_complex_eq(actual: Complex64, expected: Complex64) {
    assert_relative_eq!(actual.re, expected.re, epsilon = 1e-10);
    assert_relative_eq!(actual.im, expected.im, epsilon = 1e-10);
}

#[allow(clippy::needless_range_loop)]
#[test]
fn test_read_simple_two_port() {
    let ts = Touchstone::from_file(data_path("simple_touchstone.s2p")).expect("Failed to load file");

    assert_eq!(ts.nports(), 2);
    assert_eq!(ts.nfreq(), 3);
    assert_eq!(ts.network.f(), &[1.0e9, 2.0e9, 3.0e9]);
    assert_eq!(ts.network.z0(), 50.0);
    assert_eq!(ts.network.name(), Some("simple_touchstone"));

    // column-major pairs: S11 S21 S12 S22
    let s = ts.network.params();
    assert_complex_eq(s[[0, 0, 0]], Complex64::new(0.10, -0.20));
    assert_complex_eq(s[[0, 1, 0]], Complex64::new(0.90, 0.10));
    assert_complex_eq(s[[0, 0, 1]], Complex64::new(0.05, 0.00));
    assert_complex_eq(s[[0, 1, 1]], Complex64::new(0.20, -0.10));
    assert_complex_eq(s[[2, 1, 0]], Complex64::new(0.80, 0.30));

    let meta = &ts.metadata;
    assert_eq!(meta.version, TouchstoneVersion::V1);
    assert_eq!(meta.header.data_format, DataFormat::RI);
    assert_eq!(meta.header_line, "# GHz S RI R 50");
    assert_eq!(meta.file_name.as_deref(), Some("simple_touchstone.s2p"));
    assert!(meta.file_size.unwrap_or(0) > 0);
    assert_eq!(meta.comments.len(), 2);
    assert!(meta.keywords.is_none());
}

#[test]
fn test_read_short() {
    let ts = Touchstone::from_file(data_path("short.s1p")).expect("Failed to load file");
    assert_eq!(ts.nports(), 1);
    assert_eq!(ts.network.f()[0], 100e6);
    for s11 in ts.network.trace(0, 0).unwrap() {
        assert_complex_eq(s11, Complex64::new(-1.0, 0.0));
    }
}

#[test]
fn test_read_db_format() {
    let ts = Touchstone::from_file(data_path("match.s1p")).expect("Failed to load file");
    let s11 = ts.network.trace(0, 0).unwrap();
    assert_complex_eq(s11[0], Complex64::new(0.01, 0.0));
    assert_complex_eq(s11[1], Complex64::new(0.0, 0.01));
    for db in ts.network.db(0, 0).unwrap() {
        assert_relative_eq!(db, -40.0, epsilon = 1e-9);
    }
}

#[test]
fn test_read_hz_ri_one_port() {
    let file = temp_touchstone("# Hz S RI R 50\n100 0.1 0.2\n200 0.2 0.3\n", "s1p");
    let ts = Touchstone::from_file(file.path()).expect("Failed to load file");
    assert_eq!(ts.nports(), 1);
    assert_eq!(ts.network.f(), &[100.0, 200.0]);
    assert_eq!(ts.network.z0(), 50.0);
    let s = ts.network.params();
    assert_complex_eq(s[[0, 0, 0]], Complex64::new(0.1, 0.2));
    assert_complex_eq(s[[1, 0, 0]], Complex64::new(0.2, 0.3));
}

#[test]
fn test_read_ghz_db_two_port() {
    let file = temp_touchstone(
        "# GHz S DB R 50\n0.1 -10 45 -20 90 -30 135 -40 180\n",
        "s2p",
    );
    let ts = Touchstone::from_file(file.path()).expect("Failed to load file");
    assert_eq!(ts.nports(), 2);
    assert_relative_eq!(ts.network.f()[0], 1e8, max_relative = 1e-12);

    let polar = |db: f64, deg: f64| Complex64::from_polar(10f64.powf(db / 20.0), deg.to_radians());
    let s = ts.network.params();
    assert_complex_eq(s[[0, 0, 0]], polar(-10.0, 45.0));
    assert_complex_eq(s[[0, 1, 0]], polar(-20.0, 90.0));
    assert_complex_eq(s[[0, 0, 1]], polar(-30.0, 135.0));
    assert_complex_eq(s[[0, 1, 1]], polar(-40.0, 180.0));
    assert_relative_eq!(s[[0, 0, 0]].norm(), 0.316_227_766_016_838, epsilon = 1e-12);
}

#[test]
fn test_read_three_port_multiline() {
    let ts = Touchstone::from_file(data_path("power_divider.s3p")).expect("Failed to load file");
    assert_eq!(ts.nports(), 3);
    assert_eq!(ts.nfreq(), 3);
    assert_eq!(ts.network.f(), &[500e6, 1000e6, 1500e6]);

    let s = ts.network.params();
    assert_complex_eq(s[[0, 0, 0]], Complex64::new(0.05, 0.0));
    // S21 and S12 are both -j0.7
    assert_complex_eq(s[[0, 1, 0]], Complex64::new(0.0, -0.7));
    assert_complex_eq(s[[0, 0, 1]], Complex64::new(0.0, -0.7));
    // S32 comes before S13 in file order
    assert_complex_eq(s[[1, 2, 1]], Complex64::from_polar(0.02, 10f64.to_radians()));
    assert_complex_eq(s[[1, 1, 2]], Complex64::from_polar(0.02, 10f64.to_radians()));
    assert_complex_eq(s[[2, 2, 2]], Complex64::from_polar(0.10, 45f64.to_radians()));
}

#[test]
fn test_read_v2_two_port_order() {
    let ts = Touchstone::from_file(data_path("v2_amplifier.s2p")).expect("Failed to load file");
    assert_eq!(ts.metadata.version, TouchstoneVersion::V2);

    let kw = ts.metadata.keywords.as_ref().expect("v2 keywords");
    assert_eq!(kw.number_of_ports, Some(2));
    assert_eq!(kw.two_port_order, Some(TwoPortOrder::S12First));

    // 12_21 order puts S12 before S21
    let s = ts.network.params();
    assert_complex_eq(s[[0, 0, 1]], Complex64::new(0.01, 0.0));
    assert_complex_eq(s[[0, 1, 0]], Complex64::new(5.0, 0.0));
    assert_complex_eq(s[[1, 1, 0]], Complex64::new(4.5, -1.0));
}

#[test]
fn test_read_v2_lower_triangle_ts() {
    let ts = Touchstone::from_file(data_path("v2_lower.ts")).expect("Failed to load file");
    assert_eq!(ts.nports(), 3);
    assert_eq!(ts.nfreq(), 2);
    assert_eq!(ts.network.z0(), 75.0);

    let kw = ts.metadata.keywords.as_ref().expect("v2 keywords");
    assert_eq!(kw.matrix_format, Some(MatrixFormat::Lower));

    let s = ts.network.params();
    assert_complex_eq(s[[0, 1, 0]], Complex64::new(0.5, 0.1));
    assert_complex_eq(s[[0, 0, 1]], Complex64::new(0.5, 0.1));
    assert_complex_eq(s[[0, 2, 1]], Complex64::new(0.4, 0.1));
    assert_complex_eq(s[[0, 1, 2]], Complex64::new(0.4, 0.1));
    assert_complex_eq(s[[1, 2, 2]], Complex64::new(0.3, 0.1));
}

#[test]
fn test_network_from_touchstone() {
    let ntwk = Network::from_touchstone(data_path("simple_touchstone.s2p")).unwrap();
    assert_eq!(ntwk.nports(), 2);
    assert_eq!(ntwk.family(), snp_core::ParameterFamily::S);

    let parsed = snp_core::parse(data_path("simple_touchstone.s2p")).unwrap();
    assert_eq!(parsed.network, ntwk);
}

#[test]
fn test_missing_file() {
    let err = Touchstone::from_file(data_path("does_not_exist.s2p")).unwrap_err();
    assert!(matches!(err, TouchstoneError::NotFound(_)));
}

#[test]
fn test_invalid_extensions() {
    for ext in ["txt", "s0p", "s100p", "sp", "s2x"] {
        let file = temp_touchstone("# GHz S RI R 50\n1 0 0", ext);
        let err = Touchstone::from_file(file.path()).unwrap_err();
        assert!(
            matches!(err, TouchstoneError::InvalidExtension(_)),
            "extension {ext}: {err:?}"
        );
    }
}

#[test]
fn test_short_extension_form() {
    let file = temp_touchstone("# GHz S RI R 50\n1 0.5 0", "s1");
    let ts = Touchstone::from_file(file.path()).unwrap();
    assert_eq!(ts.nports(), 1);
}

#[test]
fn test_ts_extension_requires_v2() {
    let file = temp_touchstone("# GHz S RI R 50\n1 0.5 0", "ts");
    assert!(matches!(
        Touchstone::from_file(file.path()),
        Err(TouchstoneError::InvalidExtension(_))
    ));
}

#[test]
fn test_extension_port_mismatch() {
    let content = "[Version] 2.0\n# GHz S RI R 50\n[Number of Ports] 1\n[Network Data]\n1 0.5 0\n[End]\n";
    let file = temp_touchstone(content, "s2p");
    assert!(matches!(
        Touchstone::from_file(file.path()),
        Err(TouchstoneError::PortCountMismatch {
            extension: 2,
            declared: 1
        })
    ));
}

#[test]
fn test_v2_missing_port_count() {
    let content = "[Version] 2.0\n# GHz S RI R 50\n[Network Data]\n1 0.5 0\n";
    assert!(matches!(
        Touchstone::from_content(content, None),
        Err(TouchstoneError::MissingKeyword("Number of Ports"))
    ));
}

#[test]
fn test_v2_header_impedance_overrides_reference() {
    let content =
        "[Version] 2.0\n# GHz S RI R 75\n[Number of Ports] 1\n[Reference] 25\n[Network Data]\n1 0.5 0\n";
    let ts = Touchstone::from_content(content, None).unwrap();
    assert_eq!(ts.network.z0(), 75.0);

    let content =
        "[Version] 2.0\n# GHz S RI R 50\n[Number of Ports] 1\n[Reference] 25\n[Network Data]\n1 0.5 0\n";
    let ts = Touchstone::from_content(content, None).unwrap();
    assert_eq!(ts.network.z0(), 25.0);
}

#[test]
fn test_token_count_errors() {
    assert!(matches!(
        Touchstone::from_content("# GHz S RI R 50\n1 0.1 0.2 0.3", Some(2)),
        Err(TouchstoneError::InsufficientValues {
            nports: 2,
            expected: 9,
            got: 4
        })
    ));
    let content = "# GHz S RI R 50\n1 0 0 0 0 0 0 0 0\n2 0 0 0 0";
    assert!(matches!(
        Touchstone::from_content(content, Some(2)),
        Err(TouchstoneError::ColumnCountMismatch {
            expected: 9,
            got: 14,
            ..
        })
    ));
}

#[test]
fn test_non_numeric_token_reports_line() {
    let content = "! note\n# GHz S RI R 50\n1 0.5 0\n2 abc 0\n";
    match Touchstone::from_content(content, Some(1)) {
        Err(TouchstoneError::NonNumericToken { token, line }) => {
            assert_eq!(token, "abc");
            assert_eq!(line, 4);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_non_monotonic_frequency() {
    let content = "# GHz S RI R 50\n1 0.5 0\n3 0.5 0\n2 0.5 0\n";
    assert!(matches!(
        Touchstone::from_content(content, Some(1)),
        Err(TouchstoneError::NonMonotonicFrequency { index: 2, .. })
    ));
}

#[test]
fn test_missing_header_and_empty() {
    assert!(matches!(
        Touchstone::from_content("1 0.5 0\n", Some(1)),
        Err(TouchstoneError::MissingHeader)
    ));
    assert!(matches!(
        Touchstone::from_content("  \n\n", Some(1)),
        Err(TouchstoneError::Empty)
    ));
    assert!(matches!(
        Touchstone::from_content("# GHz S RI R 50\n! only comments\n", Some(1)),
        Err(TouchstoneError::NoData)
    ));
}

#[test]
fn test_latin1_comment_is_decoded() {
    let mut file = tempfile::Builder::new()
        .suffix(".s1p")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(b"! Messung bei 25\xb0C\n# GHz S RI R 50\n1 0.5 0\n")
        .expect("Failed to write temp file");

    let ts = Touchstone::from_file(file.path()).unwrap();
    assert_eq!(ts.metadata.comments[0], "Messung bei 25°C");
}
