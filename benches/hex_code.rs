use criterion::{black_box, criterion_group, criterion_main, Criterion};

use link_shortener::utils::{decode, encode};

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_u64_max", |b| b.iter(|| encode(black_box(u64::MAX))));
    c.bench_function("encode_small_id", |b| b.iter(|| encode(black_box(4_096))));
}

fn bench_decode(c: &mut Criterion) {
    let code = encode(u64::MAX / 7);
    c.bench_function("decode_long_code", |b| b.iter(|| decode(black_box(&code))));
    c.bench_function("decode_invalid_code", |b| b.iter(|| decode(black_box("invalid!"))));
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
