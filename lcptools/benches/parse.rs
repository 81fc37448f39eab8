use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lcptools::_internal_test_data::SEQUENCE_1M;
use lcptools::alphabet::Strand;
use lcptools::lps::{Lps, LpsParams};

fn parse_1m(c: &mut Criterion) {
    c.bench_function("Parse 1M symbols at level 1", |b| {
        b.iter(|| Lps::new(&SEQUENCE_1M).unwrap())
    });

    c.bench_function("Parse 1M symbols at level 1 (reverse complement)", |b| {
        b.iter(|| Lps::with_strand(&SEQUENCE_1M, Strand::ReverseComplement).unwrap())
    });
}

fn parse_1m_segmented(c: &mut Criterion) {
    c.bench_function("Parse 1M symbols in 100K segments on 4 threads", |b| {
        b.iter_batched_ref(
            || {
                LpsParams::builder()
                    .sequence_split_length(100_000)
                    .overlap_margin_length(1_000)
                    .thread_num(4)
                    .build()
            },
            |params| Lps::with_params(&SEQUENCE_1M, params).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, parse_1m, parse_1m_segmented);
criterion_main!(benches);
