//! Three counters raced from concurrent workers: one that **loses updates**,
//! one guarded by a **mutex**, and one built on an **atomic fetch-and-add**.
//!
//! Each demonstration run builds a fresh counter, hands a shared reference to
//! two scoped worker threads, lets each perform 1000 increments, joins them,
//! and reports the final value against the expected 2000.
//!
//! The mutex is [`async-lock`]'s, so the locked counter can also be driven from
//! async tasks on tokio, async-std, smol, or a plain `block_on`.
//!
//! # Quick Start
//!
//! ```rust
//! use race_counter::{run_demo, CounterVariant};
//!
//! assert_eq!(run_demo(CounterVariant::Locked).unwrap(), 2000);
//! assert_eq!(run_demo(CounterVariant::Atomic).unwrap(), 2000);
//!
//! // May lose updates, never gains any.
//! let racy = run_demo(CounterVariant::Unprotected).unwrap();
//! assert!((1..=2000).contains(&racy));
//! ```
//!
//! # Custom load
//!
//! ```rust
//! use race_counter::{AtomicCounter, Harness, HarnessConfig};
//!
//! let harness = Harness::new(HarnessConfig::new(8, 10_000)).unwrap();
//! assert_eq!(harness.run::<AtomicCounter>().unwrap(), 80_000);
//! ```
//!
//! # Reports
//!
//! ```rust
//! use race_counter::{CounterVariant, Harness};
//!
//! let report = Harness::default().run_variant(CounterVariant::Atomic).unwrap();
//! assert_eq!(report.to_string(), "Safe Counter (Atomic) Value (Expected 2000): 2000");
//! assert_eq!(report.lost_updates(), 0);
//! ```
//!
//! # Async workers
//!
//! ```rust
//! use race_counter::{Counter, LockedCounter};
//!
//! # tokio_test::block_on(async {
//! let counter = LockedCounter::new();
//! counter.increment_async().await;
//! counter.increment();
//! assert_eq!(counter.value(), 2);
//! # });
//! ```
//!
//! | Variant | Type | Increment |
//! |---------|------|-----------|
//! | `Unprotected` | [`UnprotectedCounter`] | relaxed load, then relaxed store |
//! | `Locked` | [`LockedCounter`] | `+= 1` under a mutex guard |
//! | `Atomic` | [`AtomicCounter`] | `fetch_add(1)` |
//!
//! [`async-lock`]: https://docs.rs/async-lock

mod config;
mod counter;
mod error;
mod harness;
mod logging;
mod variant;

pub use config::{HarnessConfig, DEFAULT_INCREMENTS_PER_WORKER, DEFAULT_WORKERS};
pub use counter::{AtomicCounter, Counter, LockedCounter, UnprotectedCounter};
pub use error::{HarnessError, Result};
pub use harness::{run_demo, DemoReport, Harness};
pub use logging::init_logging;
pub use variant::{CounterVariant, ParseVariantError};
