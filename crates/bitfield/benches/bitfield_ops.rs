use bitfield::{Executor, FieldType, Overflow, bits, ops};
use criterion::{Criterion, criterion_group, criterion_main};

fn gen_buffer(len: usize) -> Vec<u8> {
    // Deterministic but non-trivial pattern
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

fn bench_read(c: &mut Criterion) {
    let data = gen_buffer(64);

    for &width in &[1u8, 8, 13, 32, 64] {
        c.bench_function(&format!("read_i{}_unaligned", width), |b| {
            b.iter(|| bits::read(&data, 3, width, true))
        });
    }
}

fn bench_write(c: &mut Criterion) {
    for &width in &[1u8, 8, 13, 32, 64] {
        let mut data = gen_buffer(64);
        c.bench_function(&format!("write_u{}_unaligned", width), |b| {
            b.iter(|| bits::write(&mut data, 5, width, 0x5555_5555_5555_5555))
        });
    }
}

fn bench_incrby(c: &mut Criterion) {
    let field = FieldType::signed(16).unwrap();

    for policy in [Overflow::Wrap, Overflow::Sat, Overflow::Fail] {
        let mut data = gen_buffer(16);
        c.bench_function(&format!("incrby_i16_{}", policy), |b| {
            b.iter(|| ops::incrby(&mut data, field, 7, 1000, policy))
        });
    }
}

fn bench_batch(c: &mut Criterion) {
    let line = "OVERFLOW SAT INCRBY u4 #0 1 INCRBY u4 #1 -1 SET i12 #3 -77 GET u24 0";

    c.bench_function("run_str_counter_batch", |b| {
        let mut executor = Executor::new(gen_buffer(8));
        b.iter(|| executor.run_str(line).unwrap())
    });
}

criterion_group!(benches, bench_read, bench_write, bench_incrby, bench_batch);
criterion_main!(benches);
