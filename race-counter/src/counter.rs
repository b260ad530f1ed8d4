#[cfg(not(loom))]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(loom)]
use loom::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(loom))]
use async_lock::{Mutex, MutexGuard};

#[cfg(loom)]
use loom::sync::{Mutex, MutexGuard};

use crate::variant::CounterVariant;

/// A shared integer that workers increment concurrently.
///
/// All three implementations are `Sync` so a plain `&C` can be handed to every
/// worker. What differs is whether concurrent increments can be lost.
pub trait Counter: Send + Sync + Sized {
    /// Which variant this implementation demonstrates.
    const VARIANT: CounterVariant;

    /// A fresh counter at zero.
    fn new() -> Self;

    /// Add one.
    fn increment(&self);

    /// Current value.
    ///
    /// Only meaningful once every worker has been joined.
    fn value(&self) -> u64;

    /// Consume the counter and return its final value.
    fn into_value(self) -> u64 {
        self.value()
    }
}

/// Counter whose increment is a separate load and store.
///
/// Each access is atomic on its own, so there is no undefined behaviour, but
/// another worker can store between our load and our store. Its update is
/// then overwritten and lost.
#[derive(Debug)]
pub struct UnprotectedCounter {
    count: AtomicU64,
}

impl Counter for UnprotectedCounter {
    const VARIANT: CounterVariant = CounterVariant::Unprotected;

    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    #[inline]
    fn increment(&self) {
        let current = self.count.load(Ordering::Relaxed);
        self.count.store(current + 1, Ordering::Relaxed);
    }

    fn value(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Counter whose read-modify-write runs under an exclusive lock.
///
/// The guard is released when it goes out of scope, including on unwind.
#[derive(Debug)]
pub struct LockedCounter {
    count: Mutex<u64>,
}

impl LockedCounter {
    #[cfg(not(loom))]
    #[inline]
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.count.lock_blocking()
    }

    #[cfg(loom)]
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.count.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Increment from an async task without blocking the executor thread.
    ///
    /// Shares the lock with [`Counter::increment`], so blocking and async
    /// workers can be mixed on the same counter.
    #[cfg(not(loom))]
    pub async fn increment_async(&self) {
        let mut count = self.count.lock().await;
        *count += 1;
    }

    /// Try to increment without waiting for the lock.
    ///
    /// Returns `false` if another worker holds it.
    #[cfg(not(loom))]
    pub fn try_increment(&self) -> bool {
        match self.count.try_lock() {
            Some(mut count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }
}

impl Counter for LockedCounter {
    const VARIANT: CounterVariant = CounterVariant::Locked;

    fn new() -> Self {
        Self {
            count: Mutex::new(0),
        }
    }

    #[inline]
    fn increment(&self) {
        let mut count = self.lock();
        *count += 1;
    }

    fn value(&self) -> u64 {
        *self.lock()
    }

    #[cfg(not(loom))]
    fn into_value(self) -> u64 {
        self.count.into_inner()
    }
}

/// Counter whose increment is a single fetch-and-add.
#[derive(Debug)]
pub struct AtomicCounter {
    count: AtomicU64,
}

impl Counter for AtomicCounter {
    const VARIANT: CounterVariant = CounterVariant::Atomic;

    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    #[inline]
    fn increment(&self) {
        // Relaxed is enough: the final read happens after join.
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn value(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
