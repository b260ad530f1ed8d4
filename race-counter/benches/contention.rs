use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use race_counter::{
    AtomicCounter, Counter, Harness, HarnessConfig, LockedCounter, UnprotectedCounter,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

const OPS_PER_WORKER: u64 = 1000;

fn harness(workers: usize) -> Harness {
    Harness::new(HarnessConfig::new(workers, OPS_PER_WORKER)).unwrap()
}

// === Threaded workers, one fresh counter per iteration ===

fn bench_thread_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread_contention");

    for workers in [1usize, 2, 4, 8] {
        let h = harness(workers);

        // Unprotected -- no coordination, loses updates under contention
        group.bench_with_input(BenchmarkId::new("unprotected", workers), &h, |b, h| {
            b.iter(|| std::hint::black_box(h.run::<UnprotectedCounter>().unwrap()));
        });

        // Mutex -- every increment serializes on one lock
        group.bench_with_input(BenchmarkId::new("locked", workers), &h, |b, h| {
            b.iter(|| std::hint::black_box(h.run::<LockedCounter>().unwrap()));
        });

        // Atomic -- contended fetch_add on one cache line
        group.bench_with_input(BenchmarkId::new("atomic", workers), &h, |b, h| {
            b.iter(|| std::hint::black_box(h.run::<AtomicCounter>().unwrap()));
        });
    }

    group.finish();
}

// === Uncontended single-thread increment cost ===

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");

    group.bench_function("unprotected", |b| {
        let counter = UnprotectedCounter::new();
        b.iter(|| counter.increment());
    });

    group.bench_function("locked", |b| {
        let counter = LockedCounter::new();
        b.iter(|| counter.increment());
    });

    group.bench_function("locked_async", |b| {
        let counter = LockedCounter::new();
        b.iter(|| pollster::block_on(counter.increment_async()));
    });

    group.bench_function("atomic", |b| {
        let counter = AtomicCounter::new();
        b.iter(|| counter.increment());
    });

    group.finish();
}

// === Locked counter driven from tokio tasks ===

fn bench_async_tasks(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("async_tasks");

    for tasks in [2usize, 8] {
        group.bench_with_input(BenchmarkId::new("locked", tasks), &tasks, |b, &tasks| {
            b.to_async(&rt).iter(|| async move {
                let counter = Arc::new(LockedCounter::new());
                let mut handles = vec![];
                for _ in 0..tasks {
                    let c = counter.clone();
                    handles.push(tokio::spawn(async move {
                        for _ in 0..OPS_PER_WORKER {
                            c.increment_async().await;
                        }
                    }));
                }
                for h in handles {
                    h.await.unwrap();
                }
                std::hint::black_box(counter.value())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_thread_contention,
    bench_uncontended,
    bench_async_tasks
);
criterion_main!(benches);
