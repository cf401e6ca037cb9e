//! # Tally
//!
//! Quota-driven synthetic record generation with live dashboard snapshots.
//!
//! A scheduler periodically asks the generator for a batch. The generator
//! reads the store, works out which categories are still under their
//! target, and inserts records only into those. After every batch the
//! dashboard aggregates are rebuilt from the store and broadcast to
//! subscribers. Once every target is met the scheduler stops itself.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                               Tally                               │
//! │  ┌───────────┐   ┌───────────┐   ┌──────────┐   ┌──────────────┐  │
//! │  │ Scheduler │ → │ Generator │ → │  Store   │ → │  Dashboard   │  │
//! │  │  (tick)   │   │  (quota)  │   │ (JSONL)  │   │ (broadcast)  │  │
//! │  └───────────┘   └───────────┘   └──────────┘   └──────────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tally::{Generator, GenerationScheduler, MemoryStore, SchedulerConfig, SimRng, SnapshotBroadcast};
//! use tally_types::{HistoricalWindow, QuotaTable};
//!
//! let quotas = QuotaTable::new().with("IT", 30).with("HR", 7);
//! let window = HistoricalWindow::new(2018, 2025)?;
//! let generator = Generator::new(quotas, window, SimRng::new(42));
//!
//! let broadcast = SnapshotBroadcast::default();
//! let mut events = broadcast.subscribe();
//! let scheduler = GenerationScheduler::start(
//!     generator,
//!     Arc::new(MemoryStore::new()),
//!     broadcast,
//!     SchedulerConfig { interval: Duration::from_secs(2), batch_size: 46, dashboard_year: 2025 },
//! );
//! ```

pub mod broadcast;
pub mod dashboard;
mod error;
pub mod generator;
pub mod quota;
pub mod rng;
pub mod scheduler;
pub mod store;

pub use broadcast::{DashboardEvent, SnapshotBroadcast};
pub use dashboard::{DashboardSnapshot, YearCursor};
pub use error::{Error, Result};
pub use generator::{Generator, RecordSynthesizer};
pub use quota::{available_categories, remaining_capacity};
pub use rng::{Rng, SimRng};
pub use scheduler::{GenerationScheduler, SchedulerConfig, SchedulerExit};
pub use store::{JsonlStore, MemoryStore, RecordStore, StoreError};

// Re-export the shared vocabulary so callers need only one import.
pub use tally_types::{
    Category, CategoryCounts, ExperienceLevel, HistoricalWindow, QuotaTable, Record, RecordId,
};
