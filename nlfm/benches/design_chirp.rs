use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nlfm::kernel::KernelLifecycle;
use nlfm::radar::lookup::WindowLookupConfig;
use nlfm::radar::traits::WindowLookup1D;
use nlfm::radar::{design_chirp, WindowDomain, WindowLookupKernel};
use nlfm::signal::traits::WindowGenerate;
use nlfm::signal::windows::{WindowBuilderOwned, WindowConfig, WindowKernel};
use rand::rngs::ThreadRng;

/// Target envelope from a symmetric window kernel.
fn target_window(builder: WindowBuilderOwned<f64>, nx: usize) -> Vec<f64> {
    WindowKernel::try_new(WindowConfig {
        builder,
        nx,
        fftbins: Some(false),
    })
    .expect("window kernel config should be valid")
    .run_alloc()
    .expect("window kernel should produce benchmark envelope")
}

/// Frequency offsets scattered across (and slightly beyond) a domain.
fn randomized_offsets(mut rng: ThreadRng, n: usize, half_span: f64) -> Vec<f64> {
    use rand::Rng;

    (0..n)
        .map(|_| rng.random_range(-1.1 * half_span..1.1 * half_span))
        .collect()
}

/// End-to-end design at increasing pulse lengths.
fn design_chirp_hamming(c: &mut Criterion) {
    let window = target_window(WindowBuilderOwned::Hamming, 64);
    let mut group = c.benchmark_group("design_chirp_hamming");
    for samples in [256usize, 2048, 16384] {
        let fs = 200e3;
        let duration = samples as f64 / fs;
        group.bench_with_input(BenchmarkId::from_parameter(samples), &duration, |bench, &t| {
            bench.iter(|| {
                design_chirp(
                    black_box(&window),
                    true,
                    black_box(t),
                    10e3,
                    20e3,
                    fs,
                )
            })
        });
    }
    group.finish();
}

/// Lookup throughput with a Gaussian target.
fn window_lookup(c: &mut Criterion) {
    let lookup = WindowLookupKernel::try_new(WindowLookupConfig {
        window: target_window(WindowBuilderOwned::Gaussian { std: 64.0 }, 512),
    })
    .expect("lookup kernel config should be valid");
    let offsets = randomized_offsets(rand::rng(), 1 << 16, 5e3);
    let domain = WindowDomain::new(-5e3, 5e3);

    c.bench_with_input(
        BenchmarkId::new("window_lookup", offsets.len()),
        &offsets,
        |bench, offsets| bench.iter(|| lookup.run_alloc(black_box(offsets), domain)),
    );
}

criterion_group!(benches, design_chirp_hamming, window_lookup);
criterion_main!(benches);
