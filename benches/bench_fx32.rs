use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use fixq::{Fx32, math};

fn bench_addition(c: &mut Criterion) {
    c.bench_function("fx32_addition", |b| {
        let x = Fx32::from_decimal_str("123.456789").unwrap();
        let y = Fx32::from_decimal_str("987.654321").unwrap();
        b.iter(|| black_box(black_box(x) + black_box(y)));
    });
}

fn bench_addition_saturating(c: &mut Criterion) {
    c.bench_function("fx32_addition_saturating", |b| {
        b.iter(|| black_box(black_box(Fx32::MAX) + black_box(Fx32::ONE)));
    });
}

fn bench_subtraction(c: &mut Criterion) {
    c.bench_function("fx32_subtraction", |b| {
        let x = Fx32::from_decimal_str("987.654321").unwrap();
        let y = Fx32::from_decimal_str("123.456789").unwrap();
        b.iter(|| black_box(black_box(x) - black_box(y)));
    });
}

fn bench_multiplication(c: &mut Criterion) {
    c.bench_function("fx32_multiplication", |b| {
        let x = Fx32::from_decimal_str("123.456789").unwrap();
        let y = Fx32::from_decimal_str("9.876543").unwrap();
        b.iter(|| black_box(black_box(x) * black_box(y)));
    });
}

fn bench_division(c: &mut Criterion) {
    c.bench_function("fx32_division", |b| {
        let x = Fx32::from_decimal_str("123.456789").unwrap();
        let y = Fx32::from_decimal_str("9.876543").unwrap();
        b.iter(|| black_box(black_box(x).try_div(black_box(y)).unwrap()));
    });
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("fx32_parsing", |b| {
        b.iter(|| black_box(Fx32::from_decimal_str(black_box("123.456789")).unwrap()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("fx32_formatting", |b| {
        let d = Fx32::from_decimal_str("123.456789").unwrap();
        b.iter(|| black_box(format!("{}", d)));
    });
}

fn bench_formatting_exact(c: &mut Criterion) {
    c.bench_function("fx32_formatting_exact", |b| {
        let d = Fx32::from_decimal_str("123.456789").unwrap();
        b.iter(|| black_box(format!("{}", d.exact())));
    });
}

fn bench_sum(c: &mut Criterion) {
    c.bench_function("fx32_sum_1000_values", |b| {
        let values: Vec<Fx32> = (0..1000)
            .map(|i| Fx32::from_decimal_str(&format!("{}.{:02}", i % 30, i % 100)).unwrap())
            .collect();
        b.iter(|| black_box(values.iter().copied().sum::<Fx32>()));
    });
}

fn bench_comparison(c: &mut Criterion) {
    c.bench_function("fx32_comparison", |b| {
        let x = Fx32::from_decimal_str("123.456789").unwrap();
        let y = Fx32::from_decimal_str("123.456790").unwrap();
        b.iter(|| black_box(black_box(x) < black_box(y)));
    });
}

fn bench_sqrt(c: &mut Criterion) {
    c.bench_function("fx32_sqrt", |b| {
        let d = Fx32::from_decimal_str("123.456789").unwrap();
        b.iter(|| black_box(math::sqrt(black_box(d)).unwrap()));
    });
}

fn bench_pow(c: &mut Criterion) {
    c.bench_function("fx32_pow", |b| {
        let d = Fx32::from_decimal_str("1.05").unwrap();
        b.iter(|| black_box(black_box(d).pow(10).unwrap()));
    });
}

fn bench_lerp(c: &mut Criterion) {
    c.bench_function("fx32_lerp", |b| {
        let from = Fx32::from_int(10);
        let to = Fx32::from_int(20);
        let t = Fx32::from_decimal_str("0.25").unwrap();
        b.iter(|| black_box(math::lerp(black_box(from), black_box(to), black_box(t))));
    });
}

criterion_group!(
    benches,
    bench_addition,
    bench_addition_saturating,
    bench_subtraction,
    bench_multiplication,
    bench_division,
    bench_parsing,
    bench_formatting,
    bench_formatting_exact,
    bench_sum,
    bench_comparison,
    bench_sqrt,
    bench_pow,
    bench_lerp,
);

criterion_main!(benches);
