use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lcptools::_internal_test_data::SEQUENCE_1M;
use lcptools::lps::Lps;

fn deepen_1m(c: &mut Criterion) {
    let lps = Lps::new(&SEQUENCE_1M).unwrap();

    c.bench_function("Deepen 1M symbols from level 1 to 2", |b| {
        b.iter_batched_ref(
            || lps.clone(),
            |lps| assert!(lps.deepen()),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("Deepen 1M symbols from level 1 to 5", |b| {
        b.iter_batched_ref(
            || lps.clone(),
            |lps| assert!(lps.deepen_to(5)),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, deepen_1m);
criterion_main!(benches);
