//! Mutex-guarded variants under real thread contention.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use strand_queue::{SyncArrayStack, SyncRingQueue};

#[test]
fn producers_and_consumers_conserve_elements() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 1_000;
    const TOTAL: usize = PRODUCERS * PER_PRODUCER;

    let queue = SyncRingQueue::with_capacity(64).unwrap();
    let consumed = AtomicUsize::new(0);
    let sum = AtomicUsize::new(0);

    thread::scope(|s| {
        for p in 0..PRODUCERS {
            let queue = &queue;
            s.spawn(move || {
                for i in 0..PER_PRODUCER {
                    let mut value = p * PER_PRODUCER + i;
                    // Full queue hands the value back; retry until a consumer drains.
                    while let Err(rejected) = queue.push(value) {
                        value = rejected.into_inner();
                        thread::yield_now();
                    }
                }
            });
        }

        for _ in 0..2 {
            s.spawn(|| {
                while consumed.load(Ordering::Relaxed) < TOTAL {
                    match queue.pop() {
                        Ok(v) => {
                            sum.fetch_add(v, Ordering::Relaxed);
                            consumed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => thread::yield_now(),
                    }
                }
            });
        }
    });

    assert_eq!(consumed.load(Ordering::Relaxed), TOTAL);
    assert_eq!(sum.load(Ordering::Relaxed), TOTAL * (TOTAL - 1) / 2);
    assert!(queue.is_empty());
}

#[test]
fn sync_queue_count_never_exceeds_capacity() {
    let queue = SyncRingQueue::with_capacity(8).unwrap();

    thread::scope(|s| {
        for t in 0..4u32 {
            let queue = &queue;
            s.spawn(move || {
                for i in 0..500 {
                    let _ = queue.push(t * 1000 + i);
                    let guard = queue.lock();
                    assert!(guard.len() <= guard.capacity());
                    drop(guard);
                    let _ = queue.pop();
                }
            });
        }
    });

    assert!(queue.len() <= 8);
}

#[test]
fn sync_stack_interleaved() {
    let stack = SyncArrayStack::with_capacity(1024).unwrap();

    thread::scope(|s| {
        for t in 0..4 {
            let stack = &stack;
            s.spawn(move || {
                for i in 0..200 {
                    stack.push(t * 200 + i).unwrap();
                    if i % 2 == 0 {
                        stack.pop().unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(stack.len(), 400);
    let mut inner = stack.into_inner();
    assert_eq!(inner.top_index(), Some(399));
    inner.clear();
    assert!(inner.is_empty());
}
