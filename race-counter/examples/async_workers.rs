//! Locked counter shared between tokio tasks and a blocking thread.
//!
//! Run with: `cargo run --example async_workers`

use race_counter::{Counter, LockedCounter};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let counter = Arc::new(LockedCounter::new());

    // Two async workers take the lock with `.await`
    let mut handles = vec![];
    for _ in 0..2 {
        let c = counter.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..1000 {
                c.increment_async().await;
            }
        }));
    }

    // One blocking worker takes the same lock from a plain thread
    let c = counter.clone();
    let blocking = tokio::task::spawn_blocking(move || {
        for _ in 0..1000 {
            c.increment();
        }
    });

    for h in handles {
        h.await.unwrap();
    }
    blocking.await.unwrap();

    println!("Locked counter (Expected 3000): {}", counter.value());
}
