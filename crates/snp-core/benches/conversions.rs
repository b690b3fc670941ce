//! Benchmarks for parameter conversions and derived metrics
//!
//! Covers the matrix-inversion conversions across port counts, the closed
//! form 2-port conversions and group delay.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array3;
use num_complex::Complex64;
use snp_core::frequency::{Frequency, FrequencyUnit, SweepType};
use snp_core::{Network, ParameterFamily};
use std::f64::consts::PI;

/// Create a test network with well-conditioned S-parameters
fn create_test_network(nfreq: usize, nports: usize) -> Network {
    let freq = Frequency::new(1.0, 10.0, nfreq, FrequencyUnit::GHz, SweepType::Linear);

    let mut s = Array3::<Complex64>::zeros((nfreq, nports, nports));
    for f in 0..nfreq {
        for i in 0..nports {
            for j in 0..nports {
                let phase = 2.0 * PI * f as f64 / nfreq as f64;
                let mag = if i == j { 0.1 } else { 0.9 / nports as f64 };
                s[[f, i, j]] = Complex64::from_polar(mag, phase * (i + j + 1) as f64);
            }
        }
    }

    Network::new(freq, s, 50.0, ParameterFamily::S).expect("valid benchmark network")
}

fn bench_nport_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("nport_conversions");

    for nfreq in [100, 1000].iter() {
        for nports in [2, 4, 8].iter() {
            let network = create_test_network(*nfreq, *nports);
            for family in [ParameterFamily::Z, ParameterFamily::Y] {
                let id = BenchmarkId::new(format!("s2{}_{}ports", family, nports), nfreq);
                group.bench_with_input(id, nfreq, |b, _| {
                    b.iter(|| black_box(network.convert(family)))
                });
            }
        }
    }

    group.finish();
}

fn bench_two_port_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_port_conversions");

    for nfreq in [100, 1000, 10000].iter() {
        let network = create_test_network(*nfreq, 2);
        for family in [ParameterFamily::Abcd, ParameterFamily::T, ParameterFamily::H] {
            let id = BenchmarkId::new(format!("s2{}", family), nfreq);
            group.bench_with_input(id, nfreq, |b, _| {
                b.iter(|| black_box(network.convert(family)))
            });
        }
    }

    group.finish();
}

fn bench_group_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_delay");

    for nfreq in [100, 1000, 10000].iter() {
        let network = create_test_network(*nfreq, 2);
        group.bench_with_input(BenchmarkId::from_parameter(nfreq), nfreq, |b, _| {
            b.iter(|| black_box(network.group_delay(1, 0)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_nport_conversions,
    bench_two_port_conversions,
    bench_group_delay
);
criterion_main!(benches);
