use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sha256_bench(c: &mut Criterion) {
    let msg = [42u8; 128];

    c.bench_function("sha256_hex_128B", |b| {
        b.iter(|| volt_crypto::sha256_hex(black_box(&msg)))
    });
}

fn checksum_bench(c: &mut Criterion) {
    // Roughly one serialized ledger of a few hundred transactions.
    let payload = vec![b'x'; 64 * 1024];

    c.bench_function("checksum_64KiB", |b| {
        b.iter(|| volt_crypto::compute_checksum(black_box(&payload)))
    });
}

criterion_group!(benches, sha256_bench, checksum_bench);
criterion_main!(benches);
