//! Benchmarks for the max-heap, search tree and ring list.
//!
//! The heap is compared against `std::collections::BinaryHeap`, the ring list
//! against `VecDeque`.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BinaryHeap, VecDeque};
use strand_collections::{BsTree, GrowableRingStorage, MaxHeap, RingList};

fn shuffled(n: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut values: Vec<u64> = (0..n).collect();
    values.shuffle(&mut rng);
    values
}

// ============================================================================
// Heap
// ============================================================================

fn bench_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap");

    for &n in &[64u64, 1024, 16384] {
        let values = shuffled(n);
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("max_heap", n), &values, |b, values| {
            let mut heap = MaxHeap::with_capacity(values.len()).unwrap();
            b.iter(|| {
                for &v in values {
                    heap.push(v).unwrap();
                }
                while let Ok(v) = heap.pop() {
                    black_box(v);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("binary_heap", n), &values, |b, values| {
            let mut heap = BinaryHeap::with_capacity(values.len());
            b.iter(|| {
                for &v in values {
                    heap.push(v);
                }
                while let Some(v) = heap.pop() {
                    black_box(v);
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Search tree
// ============================================================================

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");

    for &n in &[64u64, 1024, 16384] {
        let values = shuffled(n);
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("insert_delete", n), &values, |b, values| {
            let mut tree = BsTree::new();
            b.iter(|| {
                for &v in values {
                    tree.insert(v).unwrap();
                }
                for v in values {
                    black_box(tree.delete(v).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("find", n), &values, |b, values| {
            let mut tree = BsTree::new();
            for &v in values {
                tree.insert(v).unwrap();
            }
            b.iter(|| {
                for v in values {
                    black_box(tree.find(v));
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Ring list
// ============================================================================

fn bench_ring_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_list");

    group.bench_function("push_pop/ring_list", |b| {
        let mut storage: GrowableRingStorage<u64> = GrowableRingStorage::with_capacity(1024).unwrap();
        let mut list: RingList<u64, _> = RingList::try_new(&mut storage).unwrap();
        b.iter(|| {
            list.try_push_back(&mut storage, black_box(42)).unwrap();
            black_box(list.pop_front(&mut storage).unwrap())
        });
    });

    group.bench_function("push_pop/vec_deque", |b| {
        let mut q = VecDeque::<u64>::with_capacity(1024);
        b.iter(|| {
            q.push_back(black_box(42));
            black_box(q.pop_front().unwrap())
        });
    });

    group.bench_function("remove_middle/ring_list", |b| {
        let mut storage: GrowableRingStorage<u64> = GrowableRingStorage::with_capacity(1024).unwrap();
        let mut list: RingList<u64, _> = RingList::try_new(&mut storage).unwrap();
        for i in 0..512 {
            list.try_push_back(&mut storage, i).unwrap();
        }
        let middle = list.try_push_back(&mut storage, 512).unwrap();
        for i in 513..1024 {
            list.try_push_back(&mut storage, i).unwrap();
        }
        b.iter(|| {
            list.unlink(&mut storage, middle);
            list.link_back(&mut storage, black_box(middle));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_heap, bench_tree, bench_ring_list);
criterion_main!(benches);
