//! Decimal pivot arithmetic against `rust_decimal` on the same operands.

use criterion::{Criterion, criterion_group, criterion_main};
use num_bigint::BigInt;
use radixcalc::{ArithmeticOperation, Decimal};
use std::hint::black_box;
use std::str::FromStr;

const SCALE: u32 = 20;

fn operands() -> (Decimal, Decimal) {
    (
        Decimal::new(BigInt::from(123_456_789i64), 6),
        Decimal::new(BigInt::from(9_876_543i64), 6),
    )
}

fn oracle_operands() -> (rust_decimal::Decimal, rust_decimal::Decimal) {
    (
        rust_decimal::Decimal::from_str("123.456789").unwrap(),
        rust_decimal::Decimal::from_str("9.876543").unwrap(),
    )
}

fn bench_pair(c: &mut Criterion, name: &str, operation: ArithmeticOperation) {
    let mut group = c.benchmark_group(name);

    group.bench_function("radixcalc", |b| {
        let (x, y) = operands();
        b.iter(|| black_box(operation.apply(black_box(&x), black_box(&y), SCALE)));
    });

    group.bench_function("rust_decimal", |b| {
        let (x, y) = oracle_operands();
        b.iter(|| {
            let (x, y) = (black_box(x), black_box(y));
            black_box(match operation {
                ArithmeticOperation::Add => x + y,
                ArithmeticOperation::Subtract => x - y,
                ArithmeticOperation::Multiply => x * y,
                ArithmeticOperation::Divide => x / y,
            })
        });
    });

    group.finish();
}

fn bench_addition(c: &mut Criterion) {
    bench_pair(c, "addition", ArithmeticOperation::Add);
}

fn bench_subtraction(c: &mut Criterion) {
    bench_pair(c, "subtraction", ArithmeticOperation::Subtract);
}

fn bench_multiplication(c: &mut Criterion) {
    bench_pair(c, "multiplication", ArithmeticOperation::Multiply);
}

fn bench_division(c: &mut Criterion) {
    bench_pair(c, "division", ArithmeticOperation::Divide);
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.bench_function("radixcalc", |b| {
        let (x, _) = operands();
        b.iter(|| black_box(format!("{}", x)));
    });
    group.bench_function("rust_decimal", |b| {
        let (x, _) = oracle_operands();
        b.iter(|| black_box(format!("{}", x)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_addition,
    bench_subtraction,
    bench_multiplication,
    bench_division,
    bench_formatting,
);

criterion_main!(benches);
