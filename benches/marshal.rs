use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jni_cdata::cell::{JCharCell, JIntCell};
use jni_cdata::jvalue::JValue;
use jni_cdata::signature;
use jni_cdata::value::{HostValue, Kind};

fn bench_cells(c: &mut Criterion) {
    let host = HostValue::Int(0x1_2345_6789);
    c.bench_function("jint_set_host", |b| {
        let mut cell = JIntCell::new();
        b.iter(|| {
            cell.set_host(black_box(&host)).unwrap();
            black_box(cell.get())
        })
    });

    let ch = HostValue::from("x");
    c.bench_function("jchar_set_host", |b| {
        let mut cell = JCharCell::new();
        b.iter(|| {
            cell.set_host(black_box(&ch)).unwrap();
            black_box(cell.get())
        })
    });
}

fn bench_jvalue(c: &mut Criterion) {
    let values = [
        (Kind::Boolean, HostValue::Int(1)),
        (Kind::Long, HostValue::Int(-1)),
        (Kind::Double, HostValue::Float(0.5)),
        (Kind::Object, HostValue::Int(0x1000)),
    ];
    c.bench_function("jvalue_set_host_mixed", |b| {
        let mut v = JValue::new();
        b.iter(|| {
            for (kind, value) in &values {
                v.set_host(*kind, black_box(value)).unwrap();
                black_box(v.get(*kind));
            }
        })
    });
}

fn bench_signature(c: &mut Criterion) {
    let sig = "(ILjava/lang/String;[B[[Ljava/lang/Object;JZ)Ljava/lang/Class;";
    c.bench_function("signature_parse", |b| {
        b.iter(|| signature::parse(black_box(sig)).unwrap())
    });
}

criterion_group!(benches, bench_cells, bench_jvalue, bench_signature);
criterion_main!(benches);
