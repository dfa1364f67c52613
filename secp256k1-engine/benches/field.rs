//! Field arithmetic benchmarks over the 10x26 representation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hex_literal::hex;
use secp256k1_engine::arithmetic::FieldElement;

/// Generator coordinates, so `x^3 + 7` is a square.
fn operands() -> (FieldElement, FieldElement) {
    let parse = |bytes: [u8; 32]| FieldElement::from_bytes(&bytes).unwrap();
    (
        parse(hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")),
        parse(hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8")),
    )
}

fn unary(c: &mut Criterion) {
    let (x, _) = operands();
    let ops: [(&str, fn(FieldElement) -> FieldElement); 5] = [
        ("normalize_weak", |a| a.normalize_weak()),
        ("normalize", |a| a.normalize()),
        ("square", |a| a.square()),
        ("invert", |a| a.invert()),
        ("negate", |a| a.negate(1)),
    ];

    let mut group = c.benchmark_group("field/unary");
    for (name, op) in ops {
        group.bench_function(name, |b| b.iter(|| op(black_box(x))));
    }
    group.bench_function("sqrt", |b| b.iter(|| black_box(x).sqrt()));
    group.finish();
}

fn binary(c: &mut Criterion) {
    let (x, y) = operands();
    let mut group = c.benchmark_group("field/binary");
    group.bench_function("add", |b| b.iter(|| black_box(x) + &black_box(y)));
    group.bench_function("mul", |b| b.iter(|| black_box(x) * &black_box(y)));
    group.bench_function("mul_single", |b| b.iter(|| black_box(x).mul_single(7)));
    group.finish();
}

criterion_group!(benches, unary, binary);
criterion_main!(benches);
