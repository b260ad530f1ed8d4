use std::fmt;
use std::hint;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::HarnessConfig;
use crate::counter::{AtomicCounter, Counter, LockedCounter, UnprotectedCounter};
use crate::error::{HarnessError, Result};
use crate::variant::CounterVariant;

/// Outcome of one demonstration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub variant: CounterVariant,
    pub value: u64,
    pub expected: u64,
}

impl DemoReport {
    /// Increments that were overwritten by a concurrent worker.
    pub fn lost_updates(&self) -> u64 {
        self.expected.saturating_sub(self.value)
    }

    pub fn is_consistent(&self) -> bool {
        self.value == self.expected
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Value (Expected {}): {}",
            self.variant.label(),
            self.expected,
            self.value
        )
    }
}

/// Runs counters under concurrent load.
///
/// Every run builds a fresh counter, so runs never share state.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
    /// Worker whose spawn is made to fail.
    #[cfg(test)]
    fail_spawn_at: Option<usize>,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Value every synchronized run must reach.
    pub fn expected_total(&self) -> u64 {
        // Validated in `new`; the default config cannot overflow.
        self.config.expected_total().unwrap_or(u64::MAX)
    }

    /// Race `config.workers` scoped threads over one fresh `C` and return
    /// its value after all of them are joined.
    ///
    /// Workers spin on a shared start gate until all of them are running, so
    /// their loops overlap instead of running back to back.
    pub fn run<C: Counter>(&self) -> Result<u64> {
        let workers = self.config.workers;
        let increments = self.config.increments_per_worker;
        let variant = C::VARIANT;
        let counter = C::new();
        let gate = StartGate::new(workers);

        thread::scope(|scope| {
            let counter = &counter;
            let gate = &gate;

            let mut handles = Vec::with_capacity(workers);
            let mut spawn_failure = None;
            for worker in 0..workers {
                let spawned =
                    self.worker_builder(variant, worker)
                        .spawn_scoped(scope, move || {
                            gate.arrive_and_wait();
                            debug!(%variant, worker, "worker started");
                            for _ in 0..increments {
                                counter.increment();
                            }
                            debug!(%variant, worker, "worker finished");
                        });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        error!(%variant, worker, %err, "failed to spawn worker");
                        // Started workers would otherwise spin forever.
                        gate.release();
                        spawn_failure = Some(HarnessError::Spawn {
                            variant,
                            worker,
                            reason: err.to_string(),
                        });
                        break;
                    }
                }
            }

            // Join everything before reporting so no worker outlives the scope
            // with its panic unobserved.
            let mut panicked = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(worker);
                }
            }

            if let Some(err) = spawn_failure {
                return Err(err);
            }
            match panicked {
                Some(worker) => Err(HarnessError::WorkerPanicked { variant, worker }),
                None => Ok(()),
            }
        })?;

        Ok(counter.into_value())
    }

    fn worker_builder(&self, variant: CounterVariant, worker: usize) -> thread::Builder {
        let builder = thread::Builder::new().name(format!("{variant}-worker-{worker}"));
        #[cfg(test)]
        if self.fail_spawn_at == Some(worker) {
            // No address space can hold this stack.
            return builder.stack_size(1 << 60);
        }
        builder
    }

    pub fn run_variant(&self, variant: CounterVariant) -> Result<DemoReport> {
        let value = match variant {
            CounterVariant::Unprotected => self.run::<UnprotectedCounter>()?,
            CounterVariant::Locked => self.run::<LockedCounter>()?,
            CounterVariant::Atomic => self.run::<AtomicCounter>()?,
        };
        let report = DemoReport {
            variant,
            value,
            expected: self.expected_total(),
        };

        if report.is_consistent() {
            info!(%variant, value, "run complete");
        } else {
            warn!(
                %variant,
                value,
                expected = report.expected,
                lost = report.lost_updates(),
                "run lost updates"
            );
        }

        Ok(report)
    }

    /// Run every variant in demonstration order.
    pub fn run_all(&self) -> Result<Vec<DemoReport>> {
        CounterVariant::ALL
            .into_iter()
            .map(|variant| self.run_variant(variant))
            .collect()
    }
}

/// Holds workers until all of them are running.
struct StartGate {
    pending: AtomicUsize,
    open: AtomicBool,
}

impl StartGate {
    fn new(workers: usize) -> Self {
        Self {
            pending: AtomicUsize::new(workers),
            open: AtomicBool::new(false),
        }
    }

    /// Check in, then spin until the last worker checks in or the gate is
    /// released.
    fn arrive_and_wait(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.release();
        }
        while !self.open.load(Ordering::Acquire) {
            hint::spin_loop();
        }
    }

    fn release(&self) {
        self.open.store(true, Ordering::Release);
    }
}

/// Two workers, 1000 increments each, on a fresh counter of `variant`.
///
/// Returns the final value: exactly 2000 for `Locked` and `Atomic`, at most
/// 2000 for `Unprotected`.
pub fn run_demo(variant: CounterVariant) -> Result<u64> {
    Harness::default()
        .run_variant(variant)
        .map(|report| report.value)
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    /// Panics on the first increment.
    struct PoisonedCounter;

    impl Counter for PoisonedCounter {
        const VARIANT: CounterVariant = CounterVariant::Locked;

        fn new() -> Self {
            PoisonedCounter
        }

        fn increment(&self) {
            panic!("increment failed");
        }

        fn value(&self) -> u64 {
            0
        }
    }

    #[test]
    fn report_renders_console_line() {
        let report = DemoReport {
            variant: CounterVariant::Locked,
            value: 2000,
            expected: 2000,
        };
        assert_eq!(
            report.to_string(),
            "Safe Counter (Mutex) Value (Expected 2000): 2000"
        );
    }

    #[test]
    fn lost_updates_is_shortfall() {
        let report = DemoReport {
            variant: CounterVariant::Unprotected,
            value: 1431,
            expected: 2000,
        };
        assert_eq!(report.lost_updates(), 569);
        assert!(!report.is_consistent());
    }

    #[test]
    fn new_validates_config() {
        assert!(Harness::new(HarnessConfig::new(0, 10)).is_err());
        let harness = Harness::new(HarnessConfig::new(3, 10)).unwrap();
        assert_eq!(harness.expected_total(), 30);
    }

    #[test]
    fn default_harness_expects_2000() {
        assert_eq!(Harness::default().expected_total(), 2000);
    }

    #[test]
    fn single_worker_unprotected_is_exact() {
        let harness = Harness::new(HarnessConfig::new(1, 5000)).unwrap();
        assert_eq!(harness.run::<UnprotectedCounter>().unwrap(), 5000);
    }

    #[test]
    fn spawn_failure_releases_started_workers() {
        let harness = Harness {
            config: HarnessConfig::new(4, 10),
            fail_spawn_at: Some(2),
        };
        let err = harness.run::<AtomicCounter>().unwrap_err();
        match err {
            HarnessError::Spawn { variant, worker, .. } => {
                assert_eq!(variant, CounterVariant::Atomic);
                assert_eq!(worker, 2);
            }
            other => panic!("expected spawn failure, got {other:?}"),
        }
    }

    #[test]
    fn spawn_failure_of_first_worker() {
        let harness = Harness {
            config: HarnessConfig::default(),
            fail_spawn_at: Some(0),
        };
        assert!(matches!(
            harness.run::<LockedCounter>(),
            Err(HarnessError::Spawn { worker: 0, .. })
        ));
    }

    #[test]
    fn gate_opens_when_last_worker_arrives() {
        let gate = StartGate::new(1);
        gate.arrive_and_wait();
        assert!(gate.open.load(Ordering::Acquire));
    }

    #[test]
    fn worker_panic_is_reported() {
        let err = Harness::default().run::<PoisonedCounter>().unwrap_err();
        assert!(matches!(
            err,
            HarnessError::WorkerPanicked {
                variant: CounterVariant::Locked,
                worker: 0
            }
        ));
    }
}
