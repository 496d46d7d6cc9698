use criterion::{black_box, criterion_group, criterion_main, Criterion};
use veracity_types::{ActorId, VersionHash};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| veracity_crypto::blake2b_256(black_box(&data)))
    });
}

fn compose_key_bench(c: &mut Criterion) {
    let version = VersionHash::new("sha256:5f0c2e9a7d1b4c3e8f6a0b2d4c6e8f0a");
    let actor = ActorId::new("reviewer@example.org");

    c.bench_function("compose_key", |b| {
        b.iter(|| veracity_crypto::compose_key(black_box(&version), black_box(&actor)))
    });
}

fn compose_reaction_key_bench(c: &mut Criterion) {
    let version = VersionHash::new("sha256:5f0c2e9a7d1b4c3e8f6a0b2d4c6e8f0a");
    let disputer = ActorId::new("disputer@example.org");
    let reactor = ActorId::new("reactor@example.org");

    c.bench_function("compose_reaction_key", |b| {
        b.iter(|| {
            veracity_crypto::compose_reaction_key(
                black_box(&version),
                black_box(&disputer),
                black_box(&reactor),
            )
        })
    });
}

fn notes_seal_bench(c: &mut Criterion) {
    let key = veracity_crypto::NotesKey::from_bytes([7u8; 32]);
    let notes = "figure 3 axis labels swapped; raw data does not support claim".repeat(8);

    c.bench_function("encrypt_notes_512B", |b| {
        b.iter(|| veracity_crypto::encrypt_notes(black_box(&notes), &key))
    });

    let sealed = veracity_crypto::encrypt_notes(&notes, &key).unwrap();
    c.bench_function("decrypt_notes_512B", |b| {
        b.iter(|| veracity_crypto::decrypt_notes(black_box(&sealed), &key))
    });
}

fn notes_digest_bench(c: &mut Criterion) {
    let notes = "x".repeat(1024);

    c.bench_function("notes_digest_1KB", |b| {
        b.iter(|| veracity_crypto::notes_digest(black_box(&notes)))
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    compose_key_bench,
    compose_reaction_key_bench,
    notes_seal_bench,
    notes_digest_bench,
);
criterion_main!(benches);
