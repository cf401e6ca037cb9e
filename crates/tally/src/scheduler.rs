//! Periodic generation scheduler.
//!
//! One Tokio task owns the generator and a ticker. Each tick runs a batch,
//! rebuilds the dashboard snapshot, and publishes it. Store access happens on
//! the blocking pool so disk I/O never stalls the runtime. The task awaits
//! every batch before polling the ticker again and missed ticks are skipped,
//! so batches never overlap: a slow batch simply delays the next one.
//!
//! The scheduler stops itself the first time a batch inserts nothing (all
//! quotas met). Owners stop it explicitly with [`GenerationScheduler::stop`]
//! or [`GenerationScheduler::shutdown`]; dropping it also stops it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tally_types::QuotaTable;
use tokio::sync::Notify;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::broadcast::{DashboardEvent, SnapshotBroadcast};
use crate::dashboard::DashboardSnapshot;
use crate::generator::Generator;
use crate::rng::Rng;
use crate::store::RecordStore;

/// Timing and sizing for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time between ticks; the first tick fires one interval after start.
    pub interval: Duration,
    /// Maximum records per batch.
    pub batch_size: usize,
    /// Year covered by the monthly trend in published snapshots.
    pub dashboard_year: i32,
}

/// Why the scheduler task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerExit {
    /// A batch found every quota met.
    QuotasSatisfied,
    /// Stopped by its owner.
    Stopped,
    /// A batch panicked; no further batches run.
    Aborted,
}

struct Shared {
    stopped: AtomicBool,
    wake: Notify,
}

/// Handle to a running generation task.
pub struct GenerationScheduler {
    shared: Arc<Shared>,
    handle: Mutex<Option<JoinHandle<SchedulerExit>>>,
}

impl GenerationScheduler {
    /// Spawns the scheduler task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start<S, R>(
        generator: Generator<R>,
        store: Arc<S>,
        broadcast: SnapshotBroadcast,
        config: SchedulerConfig,
    ) -> Self
    where
        S: RecordStore + ?Sized + 'static,
        R: Rng + Send + 'static,
    {
        let shared = Arc::new(Shared {
            stopped: AtomicBool::new(false),
            wake: Notify::new(),
        });

        info!(
            interval_ms = config.interval.as_millis() as u64,
            batch_size = config.batch_size,
            categories = generator.quotas().len(),
            "starting generation scheduler"
        );

        let task = SchedulerTask {
            store,
            quotas: generator.quotas().clone(),
            broadcast,
            config,
            shared: Arc::clone(&shared),
        };
        let handle = tokio::spawn(task.run(generator));

        Self {
            shared,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Stops future ticks.
    ///
    /// Safe to call any number of times and from any thread. A batch that is
    /// already running finishes; no batch starts afterwards. Returns `true`
    /// only for the call that actually stopped the scheduler.
    pub fn stop(&self) -> bool {
        let first = !self.shared.stopped.swap(true, Ordering::AcqRel);
        if first {
            self.shared.wake.notify_one();
            info!("generation scheduler stopped");
        }
        first
    }

    /// True once stopped, either explicitly or because quotas were met.
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Waits for the task to end.
    ///
    /// Returns `None` if another caller already joined it or the task
    /// panicked.
    pub async fn join(&self) -> Option<SchedulerExit> {
        let handle = self.handle.lock().ok()?.take()?;
        match handle.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                warn!(error = %e, "generation scheduler task ended abnormally");
                None
            }
        }
    }

    /// Stops the scheduler and waits for its task to release the timer.
    pub async fn shutdown(&self) -> Option<SchedulerExit> {
        self.stop();
        self.join().await
    }
}

impl Drop for GenerationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

struct SchedulerTask<S: ?Sized> {
    store: Arc<S>,
    quotas: QuotaTable,
    broadcast: SnapshotBroadcast,
    config: SchedulerConfig,
    shared: Arc<Shared>,
}

impl<S> SchedulerTask<S>
where
    S: RecordStore + ?Sized + 'static,
{
    /// Tick loop. Store calls run on the blocking pool; the generator moves
    /// into each batch and comes back with its outcome.
    async fn run<R>(self, mut generator: Generator<R>) -> SchedulerExit
    where
        R: Rng + Send + 'static,
    {
        let mut ticker =
            time::interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = self.shared.wake.notified() => {}
                _ = ticker.tick() => {}
            }

            if self.shared.stopped.load(Ordering::Acquire) {
                return SchedulerExit::Stopped;
            }

            let store = Arc::clone(&self.store);
            let batch_size = self.config.batch_size;
            let batch = task::spawn_blocking(move || {
                let outcome = generator.generate_batch(store.as_ref(), batch_size);
                (generator, outcome)
            })
            .await;

            let outcome = match batch {
                Ok((returned, outcome)) => {
                    generator = returned;
                    outcome
                }
                Err(e) => {
                    error!(error = %e, "generation batch panicked, scheduler aborted");
                    self.shared.stopped.store(true, Ordering::Release);
                    return SchedulerExit::Aborted;
                }
            };

            if let Some(exit) = self.finish_batch(outcome).await {
                return exit;
            }
        }
    }

    async fn finish_batch(&self, outcome: crate::Result<usize>) -> Option<SchedulerExit> {
        match outcome {
            Ok(0) => {
                self.shared.stopped.store(true, Ordering::Release);
                info!("all quotas satisfied, generation scheduler finished");
                self.refresh(0).await;
                self.broadcast.send(DashboardEvent::Completed);
                Some(SchedulerExit::QuotasSatisfied)
            }
            Ok(inserted) => {
                self.refresh(inserted).await;
                None
            }
            Err(e) => {
                let inserted = e.inserted();
                warn!(error = %e, inserted, "generation batch failed, retrying on next tick");
                self.broadcast.send(DashboardEvent::BatchFailed {
                    inserted,
                    error: e.to_string(),
                });
                if inserted > 0 {
                    self.refresh(inserted).await;
                }
                None
            }
        }
    }

    async fn refresh(&self, inserted: usize) {
        let store = Arc::clone(&self.store);
        let quotas = self.quotas.clone();
        let year = self.config.dashboard_year;
        let built = task::spawn_blocking(move || {
            store
                .fetch_all()
                .map(|records| DashboardSnapshot::build(&records, &quotas, year))
        })
        .await;

        match built {
            Ok(Ok(snapshot)) => {
                let total = snapshot.total_records;
                let receivers = self.broadcast.send(DashboardEvent::Refreshed {
                    inserted,
                    snapshot: Arc::new(snapshot),
                });
                debug!(inserted, total, receivers, "dashboard refreshed");
            }
            Ok(Err(e)) => warn!(error = %e, "dashboard refresh failed"),
            Err(e) => warn!(error = %e, "dashboard refresh task failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use crate::store::{MemoryStore, StoreError};
    use std::sync::atomic::AtomicUsize;
    use tally_types::{CategoryCounts, HistoricalWindow, QuotaTable, Record};
    use tokio::sync::broadcast::Receiver;

    const TICK: Duration = Duration::from_millis(10);

    fn generator(quotas: QuotaTable) -> Generator {
        Generator::new(
            quotas,
            HistoricalWindow::new(2018, 2025).unwrap(),
            SimRng::new(77),
        )
    }

    fn config(batch_size: usize) -> SchedulerConfig {
        SchedulerConfig {
            interval: TICK,
            batch_size,
            dashboard_year: 2025,
        }
    }

    fn drain(rx: &mut Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    /// Fails the first `failures` insert attempts, then behaves.
    struct FlakyStore {
        inner: MemoryStore,
        failures: usize,
        attempts: AtomicUsize,
    }

    impl RecordStore for FlakyStore {
        fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
            self.inner.fetch_all()
        }

        fn insert(&self, record: Record) -> Result<(), StoreError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.inner.insert(record)
        }

        fn clear(&self) -> Result<(), StoreError> {
            self.inner.clear()
        }
    }

    /// Panics on every insert.
    struct PanickingStore;

    impl RecordStore for PanickingStore {
        fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
            Ok(Vec::new())
        }

        fn insert(&self, _record: Record) -> Result<(), StoreError> {
            panic!("insert exploded");
        }

        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_every_quota_is_met() {
        let quotas = QuotaTable::new().with("A", 3).with("B", 2);
        let store = Arc::new(MemoryStore::new());

        let scheduler = GenerationScheduler::start(
            generator(quotas.clone()),
            Arc::clone(&store),
            SnapshotBroadcast::default(),
            config(2),
        );

        assert_eq!(scheduler.join().await, Some(SchedulerExit::QuotasSatisfied));
        assert!(scheduler.is_stopped());

        let counts = CategoryCounts::from_records(&store.fetch_all().unwrap(), &quotas);
        assert_eq!(counts.get("A"), Some(3));
        assert_eq!(counts.get("B"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_twice_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 1_000)),
            Arc::clone(&store),
            SnapshotBroadcast::default(),
            SchedulerConfig {
                interval: Duration::from_secs(3600),
                ..config(5)
            },
        );

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert_eq!(scheduler.join().await, Some(SchedulerExit::Stopped));
        assert!(!scheduler.stop());

        // Stopped before the first tick
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn late_ticks_after_stop_do_nothing() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 1_000)),
            Arc::clone(&store),
            SnapshotBroadcast::default(),
            config(1),
        );

        time::sleep(TICK * 5 + TICK / 2).await;
        assert!(scheduler.stop());
        // A batch already in flight finishes before the task exits
        assert_eq!(scheduler.join().await, Some(SchedulerExit::Stopped));
        let stopped_at = store.len();
        assert!(stopped_at >= 1);

        time::sleep(TICK * 10).await;
        assert_eq!(store.len(), stopped_at);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_from_another_thread() {
        let scheduler = Arc::new(GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 1_000)),
            Arc::new(MemoryStore::new()),
            SnapshotBroadcast::default(),
            config(1),
        ));

        let remote = Arc::clone(&scheduler);
        let stopped = std::thread::spawn(move || remote.stop()).join().unwrap();

        assert!(stopped);
        assert_eq!(scheduler.join().await, Some(SchedulerExit::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 1_000)),
            Arc::clone(&store),
            SnapshotBroadcast::default(),
            config(1),
        );

        drop(scheduler);
        time::sleep(TICK * 10).await;

        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_snapshot_after_each_batch() {
        let broadcast = SnapshotBroadcast::default();
        let mut rx = broadcast.subscribe();

        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 2)),
            Arc::new(MemoryStore::new()),
            broadcast,
            config(1),
        );
        assert_eq!(scheduler.join().await, Some(SchedulerExit::QuotasSatisfied));

        let events = drain(&mut rx);
        let refreshed: Vec<(usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                DashboardEvent::Refreshed { inserted, snapshot } => {
                    Some((*inserted, snapshot.total_records))
                }
                _ => None,
            })
            .collect();

        assert_eq!(refreshed, vec![(1, 1), (1, 2), (0, 2)]);
        assert!(matches!(events.last(), Some(DashboardEvent::Completed)));
    }

    #[tokio::test(start_paused = true)]
    async fn storage_failure_does_not_stop_the_schedule() {
        let broadcast = SnapshotBroadcast::default();
        let mut rx = broadcast.subscribe();
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            failures: 1,
            attempts: AtomicUsize::new(0),
        });

        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 2)),
            Arc::clone(&store),
            broadcast,
            config(5),
        );
        assert_eq!(scheduler.join().await, Some(SchedulerExit::QuotasSatisfied));

        assert_eq!(store.inner.len(), 2);
        let events = drain(&mut rx);
        assert!(matches!(
            events.first(),
            Some(DashboardEvent::BatchFailed { inserted: 0, .. })
        ));
        assert!(matches!(events.last(), Some(DashboardEvent::Completed)));
    }

    #[tokio::test(start_paused = true)]
    async fn already_satisfied_quotas_finish_on_first_tick() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 0)),
            Arc::clone(&store),
            SnapshotBroadcast::default(),
            config(46),
        );

        assert_eq!(scheduler.join().await, Some(SchedulerExit::QuotasSatisfied));
        assert!(store.is_empty());
        // Joining twice yields nothing further
        assert_eq!(scheduler.join().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_returns_exit_reason() {
        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 1_000)),
            Arc::new(MemoryStore::new()),
            SnapshotBroadcast::default(),
            config(1),
        );

        assert_eq!(scheduler.shutdown().await, Some(SchedulerExit::Stopped));
        assert_eq!(scheduler.shutdown().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_batch_aborts_the_schedule() {
        let scheduler = GenerationScheduler::start(
            generator(QuotaTable::new().with("A", 10)),
            Arc::new(PanickingStore),
            SnapshotBroadcast::default(),
            config(1),
        );

        assert_eq!(scheduler.join().await, Some(SchedulerExit::Aborted));
        assert!(scheduler.is_stopped());
    }
}
