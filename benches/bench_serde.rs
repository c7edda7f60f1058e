use criterion::{Criterion, criterion_group, criterion_main};
use fixq::Fx32;
use serde::{Deserialize, Serialize};
use std::hint::black_box;

#[derive(Serialize, Deserialize)]
struct Body {
    x: Fx32,
    y: Fx32,
    mass: Fx32,
}

fn bench_serialize_json(c: &mut Criterion) {
    c.bench_function("fx32_serialize_json", |b| {
        let d = Fx32::from_decimal_str("123.456789").unwrap();
        b.iter(|| black_box(serde_json::to_string(&black_box(d)).unwrap()));
    });
}

fn bench_deserialize_json(c: &mut Criterion) {
    c.bench_function("fx32_deserialize_json", |b| {
        let json = r#""123.456787109375""#;
        b.iter(|| black_box(serde_json::from_str::<Fx32>(black_box(json)).unwrap()));
    });
}

fn bench_roundtrip_json(c: &mut Criterion) {
    c.bench_function("fx32_roundtrip_json", |b| {
        let d = Fx32::from_decimal_str("123.456789").unwrap();
        b.iter(|| {
            let json = serde_json::to_string(&black_box(d)).unwrap();
            black_box(serde_json::from_str::<Fx32>(&json).unwrap())
        });
    });
}

fn bench_struct_serialize_json(c: &mut Criterion) {
    c.bench_function("fx32_struct_serialize_json", |b| {
        let body = Body {
            x: Fx32::from_decimal_str("12.5").unwrap(),
            y: Fx32::from_decimal_str("-3.25").unwrap(),
            mass: Fx32::from_int(70),
        };
        b.iter(|| black_box(serde_json::to_string(&black_box(&body)).unwrap()));
    });
}

fn bench_struct_deserialize_json(c: &mut Criterion) {
    c.bench_function("fx32_struct_deserialize_json", |b| {
        let json = r#"{"x":"12.5","y":"-3.25","mass":"70"}"#;
        b.iter(|| black_box(serde_json::from_str::<Body>(black_box(json)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_serialize_json,
    bench_deserialize_json,
    bench_roundtrip_json,
    bench_struct_serialize_json,
    bench_struct_deserialize_json,
);

criterion_main!(benches);
