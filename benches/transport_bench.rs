//! Criterion benchmark untuk transport Writer/Reader
//!
//! Run dengan: cargo bench

use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mid_proto::protocol::{read_exact, write_all};
use mid_proto::transport::{pipe, Loopback};
use mid_proto::{Reader, Writer};

fn bench_ring_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    group.throughput(Throughput::Bytes(64));

    let chunk = [0xA5u8; 64];

    // Push+pop cycle lewat kedua sisi pipe pada thread yang sama
    group.bench_function("push_pop_cycle_64b", |b| {
        let (mut tx, mut rx) = pipe(65536);
        let mut out = [0u8; 64];
        b.iter(|| {
            write_all(&mut tx, black_box(&chunk)).unwrap();
            read_exact(&mut rx, &mut out).unwrap();
            black_box(&out);
        });
    });

    group.finish();
}

fn bench_loopback(c: &mut Criterion) {
    let mut group = c.benchmark_group("loopback");

    for size in [1usize, 64, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_function(format!("round_trip_{}", size), |b| {
            let mut lo = Loopback::new();
            let chunk = vec![0x5Au8; *size];
            let mut out = vec![0u8; *size];
            b.iter(|| {
                write_all(&mut lo, black_box(&chunk)).unwrap();
                read_exact(&mut lo, &mut out).unwrap();
            });
        });
    }

    // Benchmark single-byte path
    group.throughput(Throughput::Bytes(1));
    group.bench_function("write_read_byte", |b| {
        let mut lo = Loopback::new();
        let mut i = 0u8;
        b.iter(|| {
            lo.write_byte(black_box(i)).unwrap();
            black_box(lo.read_byte().unwrap());
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_pipe(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipe");

    const TOTAL: usize = 1024 * 1024;
    group.throughput(Throughput::Bytes(TOTAL as u64));
    group.sample_size(20);

    group.bench_function("cross_thread_1mb", |b| {
        b.iter(|| {
            let (mut tx, mut rx) = pipe(64 * 1024);
            let producer = thread::spawn(move || {
                let chunk = [0x3Cu8; 4096];
                for _ in 0..TOTAL / chunk.len() {
                    write_all(&mut tx, &chunk).unwrap();
                }
            });

            let mut out = [0u8; 4096];
            let mut received = 0;
            while received < TOTAL {
                received += rx.read(&mut out).unwrap();
            }
            producer.join().unwrap();
            black_box(received)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_ring_buffer, bench_loopback, bench_pipe);
criterion_main!(benches);
