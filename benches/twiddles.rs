use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stwo_composition::core::poly::circle::CanonicCoset;
use stwo_composition::core::poly::twiddles::{precompute_twiddles, CHUNK_LOG_SIZE};

pub fn twiddles(c: &mut Criterion) {
    let mut group = c.benchmark_group("precompute_twiddles");
    // Sizes below and above the batch inversion threshold.
    for log_size in [CHUNK_LOG_SIZE - 2, CHUNK_LOG_SIZE + 6] {
        let coset = CanonicCoset::new(log_size + 1).half_coset();
        group.bench_function(format!("2^{log_size}"), |b| {
            b.iter(|| black_box(precompute_twiddles(black_box(coset)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = twiddles);
criterion_main!(benches);
