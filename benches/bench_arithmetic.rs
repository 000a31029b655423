use criterion::{Criterion, criterion_group, criterion_main};
use radixcalc::{ArithmeticOperation, Engine, NumeralBase, Operand};
use std::hint::black_box;

fn bench_operation(c: &mut Criterion, name: &str, operation: ArithmeticOperation) {
    c.bench_function(name, |b| {
        let engine = Engine::default();
        let lhs = Operand::new("1111011.01", NumeralBase::Binary);
        let rhs = Operand::new("3F.8", NumeralBase::Hexadecimal);
        b.iter(|| {
            black_box(engine.calculate(
                black_box(lhs),
                black_box(rhs),
                operation,
                NumeralBase::Decimal,
            ))
        });
    });
}

fn bench_addition(c: &mut Criterion) {
    bench_operation(c, "calculate_mixed_addition", ArithmeticOperation::Add);
}

fn bench_subtraction(c: &mut Criterion) {
    bench_operation(c, "calculate_mixed_subtraction", ArithmeticOperation::Subtract);
}

fn bench_multiplication(c: &mut Criterion) {
    bench_operation(c, "calculate_mixed_multiplication", ArithmeticOperation::Multiply);
}

fn bench_division(c: &mut Criterion) {
    bench_operation(c, "calculate_mixed_division", ArithmeticOperation::Divide);
}

fn bench_division_to_binary(c: &mut Criterion) {
    c.bench_function("calculate_division_to_binary", |b| {
        let engine = Engine::with_precision(30).unwrap();
        b.iter(|| {
            black_box(engine.calculate(
                Operand::decimal(black_box("1")),
                Operand::decimal(black_box("3")),
                ArithmeticOperation::Divide,
                NumeralBase::Binary,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_addition,
    bench_subtraction,
    bench_multiplication,
    bench_division,
    bench_division_to_binary,
);

criterion_main!(benches);
