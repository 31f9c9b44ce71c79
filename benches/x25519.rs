// -*- mode: rust; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

//! Benchmark the Diffie-Hellman operation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use curve25519_ladder::{curve25519, PublicKey, StaticSecret, X25519_BASEPOINT_BYTES};

fn bench_curve25519(c: &mut Criterion) {
    let secret = StaticSecret::random_from_rng(&mut rand::rng()).to_bytes();

    c.bench_function("curve25519", move |b| {
        b.iter(|| curve25519(black_box(secret), black_box(X25519_BASEPOINT_BYTES)))
    });
}

fn bench_diffie_hellman(c: &mut Criterion) {
    let bob_secret = StaticSecret::random_from_rng(&mut rand::rng());
    let bob_public = PublicKey::from(&bob_secret);

    c.bench_function("diffie_hellman", move |b| {
        b.iter_with_setup(
            || StaticSecret::random_from_rng(&mut rand::rng()),
            |alice_secret| alice_secret.diffie_hellman(&bob_public),
        )
    });
}

criterion_group! {
    name = x25519_benches;
    config = Criterion::default();
    targets =
        bench_curve25519,
        bench_diffie_hellman,
}
criterion_main! {
    x25519_benches,
}
