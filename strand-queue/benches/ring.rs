//! Benchmarks for the ring queue and array stack.
//!
//! Compares the unsynchronized structures against their mutex-guarded forms
//! and against `std::collections::VecDeque`.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::collections::VecDeque;
use std::thread;
use strand_queue::{ArrayStack, RingQueue, SyncRingQueue};

#[allow(unused)]
#[derive(Debug, Clone, Copy)]
struct Medium([u64; 16]); // 128 bytes

// ============================================================================
// Single-threaded push/pop
// ============================================================================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    group.bench_function("ring_queue/u64", |b| {
        let mut q = RingQueue::<u64>::with_capacity(1024).unwrap();
        b.iter(|| {
            q.push(black_box(42)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.bench_function("sync_ring_queue/u64", |b| {
        let q = SyncRingQueue::<u64>::with_capacity(1024).unwrap();
        b.iter(|| {
            q.push(black_box(42)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.bench_function("vec_deque/u64", |b| {
        let mut q = VecDeque::<u64>::with_capacity(1024);
        b.iter(|| {
            q.push_back(black_box(42));
            black_box(q.pop_front().unwrap())
        });
    });

    group.bench_function("array_stack/u64", |b| {
        let mut s = ArrayStack::<u64>::with_capacity(1024).unwrap();
        b.iter(|| {
            s.push(black_box(42)).unwrap();
            black_box(s.pop().unwrap())
        });
    });

    group.bench_function("ring_queue/128b", |b| {
        let mut q = RingQueue::<Medium>::with_capacity(1024).unwrap();
        let msg = Medium([0; 16]);
        b.iter(|| {
            q.push(black_box(msg)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Fill then drain
// ============================================================================

fn bench_fill_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_drain");

    for &cap in &[64usize, 1024, 16384] {
        group.throughput(Throughput::Elements(cap as u64));

        group.bench_with_input(BenchmarkId::new("ring_queue", cap), &cap, |b, &cap| {
            let mut q = RingQueue::<u64>::with_capacity(cap).unwrap();
            b.iter(|| {
                for i in 0..cap as u64 {
                    q.push(i).unwrap();
                }
                while let Ok(v) = q.pop() {
                    black_box(v);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("vec_deque", cap), &cap, |b, &cap| {
            let mut q = VecDeque::<u64>::with_capacity(cap);
            b.iter(|| {
                for i in 0..cap as u64 {
                    q.push_back(i);
                }
                while let Some(v) = q.pop_front() {
                    black_box(v);
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Contended producers
// ============================================================================

fn bench_contended(c: &mut Criterion) {
    const PER_THREAD: u64 = 10_000;
    let mut group = c.benchmark_group("contended");

    for &threads in &[2u64, 4] {
        group.throughput(Throughput::Elements(threads * PER_THREAD));
        group.bench_with_input(
            BenchmarkId::new("sync_ring_queue", threads),
            &threads,
            |b, &threads| {
                let q = SyncRingQueue::<u64>::with_capacity((threads * PER_THREAD) as usize)
                    .unwrap();
                b.iter(|| {
                    thread::scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                for i in 0..PER_THREAD {
                                    q.push(i).unwrap();
                                }
                            });
                        }
                    });
                    q.clear();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_fill_drain, bench_contended);
criterion_main!(benches);
