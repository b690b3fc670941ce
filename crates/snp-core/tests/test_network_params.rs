//! Network parameter conversion tests
//!
//! Conversions of parsed fixtures and of ideal one- and two-port networks.

use approx::assert_relative_eq;
use ndarray::Array3;
use num_complex::Complex64;
use snp_core::frequency::{Frequency, FrequencyUnit, SweepType};
use snp_core::math::ConversionError;
use snp_core::network::{Network, NetworkError, ParameterFamily};

const TEST_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/data");

fn load(name: &str) -> Network {
    Network::from_touchstone(format!("{}/{}", TEST_DATA_DIR, name)).expect("Failed to load file")
}

fn one_port(values: &[Complex64]) -> Network {
    let n = values.len();
    let freq = Frequency::new(1.0, n as f64, n, FrequencyUnit::GHz, SweepType::Linear);
    let s = Array3::from_shape_fn((n, 1, 1), |(f, _, _)| values[f]);
    Network::new(freq, s, 50.0, ParameterFamily::S).unwrap()
}

fn assert_params_close(a: &Array3<Complex64>, b: &Array3<Complex64>) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(x.re, y.re, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(x.im, y.im, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn test_fixture_roundtrip_all_families() -> anyhow::Result<()> {
    let ntwk = load("simple_touchstone.s2p");
    for family in ParameterFamily::ALL {
        let converted = ntwk.convert(family)?;
        assert_eq!(converted.family(), family);
        let back = converted.to_s()?;
        assert_params_close(back.params(), ntwk.params());
    }
    Ok(())
}

#[test]
fn test_three_port_z_y_roundtrip() -> anyhow::Result<()> {
    let ntwk = load("power_divider.s3p");
    let z = ntwk.convert(ParameterFamily::Z)?;
    let y = z.convert(ParameterFamily::Y)?;
    assert_params_close(y.to_s()?.params(), ntwk.params());

    // Z * Y = I at every point
    let zp = ntwk.z()?;
    let yp = ntwk.y()?;
    for f in 0..ntwk.nfreq() {
        let prod = zp
            .index_axis(ndarray::Axis(0), f)
            .dot(&yp.index_axis(ndarray::Axis(0), f));
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod[[i, j]].re, expected, epsilon = 1e-9);
                assert_relative_eq!(prod[[i, j]].im, 0.0, epsilon = 1e-9);
            }
        }
    }
    Ok(())
}

#[test]
fn test_two_port_families_reject_three_ports() {
    let ntwk = load("power_divider.s3p");
    for family in [
        ParameterFamily::Abcd,
        ParameterFamily::T,
        ParameterFamily::H,
        ParameterFamily::G,
    ] {
        match ntwk.convert(family) {
            Err(NetworkError::Conversion(ConversionError::UnsupportedPortCount {
                nports, ..
            })) => assert_eq!(nports, 3),
            other => panic!("{family}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_matched_load_impedance_is_z0() -> anyhow::Result<()> {
    let ntwk = one_port(&[Complex64::new(0.0, 0.0)]);
    let z = ntwk.z()?;
    assert_relative_eq!(z[[0, 0, 0]].re, 50.0, epsilon = 1e-12);
    assert_relative_eq!(z[[0, 0, 0]].im, 0.0, epsilon = 1e-12);

    let y = ntwk.y()?;
    assert_relative_eq!(y[[0, 0, 0]].re, 0.02, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_short_circuit_conversions() -> anyhow::Result<()> {
    let ntwk = load("short.s1p");
    let z = ntwk.z()?;
    for v in z.iter() {
        assert_relative_eq!(v.norm(), 0.0, epsilon = 1e-9);
    }

    // I + S is singular for a short: every point is filled with Inf
    let y = ntwk.y()?;
    for v in y.iter() {
        assert!(v.re.is_infinite() && v.im.is_infinite());
    }
    Ok(())
}

#[test]
fn test_open_circuit_fails_s2z() {
    let open = Complex64::new(1.0, 0.0);
    let ntwk = one_port(&[Complex64::new(0.5, 0.0), open]);
    assert_eq!(
        ntwk.convert(ParameterFamily::Z),
        Err(NetworkError::Conversion(ConversionError::SingularMatrix {
            index: 1,
            what: "I - S"
        }))
    );
}

#[test]
fn test_infinite_fill_only_at_singular_point() -> anyhow::Result<()> {
    let short = Complex64::new(-1.0, 0.0);
    let ntwk = one_port(&[Complex64::new(0.2, 0.1), short, Complex64::new(-0.3, 0.0)]);
    let y = ntwk.y()?;
    assert!(y[[0, 0, 0]].is_finite());
    assert!(y[[1, 0, 0]].re.is_infinite());
    assert!(y[[2, 0, 0]].is_finite());
    Ok(())
}

#[test]
fn test_thru_abcd_is_identity() -> anyhow::Result<()> {
    let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
    let mut s = Array3::<Complex64>::zeros((1, 2, 2));
    s[[0, 0, 1]] = Complex64::new(1.0, 0.0);
    s[[0, 1, 0]] = Complex64::new(1.0, 0.0);
    let thru = Network::new(freq, s, 50.0, ParameterFamily::S)?;

    let abcd = thru.abcd()?;
    assert_relative_eq!(abcd[[0, 0, 0]].re, 1.0, epsilon = 1e-12);
    assert_relative_eq!(abcd[[0, 0, 1]].norm(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(abcd[[0, 1, 0]].norm(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(abcd[[0, 1, 1]].re, 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_isolated_two_port_abcd_fails() {
    let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
    let s = Array3::from_elem((1, 2, 2), Complex64::new(0.0, 0.0));
    let ntwk = Network::new(freq, s, 50.0, ParameterFamily::S).unwrap();
    assert!(matches!(
        ntwk.abcd(),
        Err(NetworkError::Conversion(ConversionError::ZeroDenominator {
            index: 0,
            quantity: "S21",
            ..
        }))
    ));
}

#[test]
fn test_series_resistor_abcd() -> anyhow::Result<()> {
    // series R: S11 = S22 = R / (R + 2 z0), S21 = S12 = 2 z0 / (R + 2 z0)
    let r = 25.0;
    let z0 = 50.0;
    let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
    let s = Array3::from_shape_fn((1, 2, 2), |(_, i, j)| {
        let v = if i == j { r / (r + 2.0 * z0) } else { 2.0 * z0 / (r + 2.0 * z0) };
        Complex64::new(v, 0.0)
    });
    let ntwk = Network::new(freq, s, z0, ParameterFamily::S)?;
    let abcd = ntwk.abcd()?;
    assert_relative_eq!(abcd[[0, 0, 0]].re, 1.0, epsilon = 1e-12);
    // B is normalized to z0
    assert_relative_eq!(abcd[[0, 0, 1]].re, r / z0, epsilon = 1e-12);
    assert_relative_eq!(abcd[[0, 1, 0]].norm(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(abcd[[0, 1, 1]].re, 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_reciprocal_abcd_has_unit_determinant() -> anyhow::Result<()> {
    let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
    let s21 = Complex64::new(0.6, 0.15);
    let mut s = Array3::<Complex64>::zeros((1, 2, 2));
    s[[0, 0, 0]] = Complex64::new(0.1, -0.2);
    s[[0, 0, 1]] = s21;
    s[[0, 1, 0]] = s21;
    s[[0, 1, 1]] = Complex64::new(-0.2, -0.1);
    let ntwk = Network::new(freq, s, 50.0, ParameterFamily::S)?;

    let abcd = ntwk.abcd()?;
    let det = abcd[[0, 0, 0]] * abcd[[0, 1, 1]] - abcd[[0, 0, 1]] * abcd[[0, 1, 0]];
    assert_relative_eq!(det.re, 1.0, epsilon = 1e-12);
    assert_relative_eq!(det.im, 0.0, epsilon = 1e-12);
    Ok(())
}
