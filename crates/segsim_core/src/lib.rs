//! # segsim core
//!
//! Simulation of the write path and space reclamation of a
//! log-structured storage device. Data is appended into fixed-size
//! segments and never overwritten in place; a garbage collector
//! reclaims segments whose content has gone stale.
//!
//! This crate provides:
//! - [`Segment`]: fixed-capacity append target with a byte-granularity
//!   validity map
//! - [`SegmentStore`]: the segment arena plus lifetime counters
//! - [`WriteEngine`]: first-fit placement with invalidate-then-write
//!   overwrite semantics
//! - [`GarbageCollector`]: occupancy-triggered victim selection,
//!   compaction, and cost accounting
//!
//! The engine is single-threaded and synchronous: the store is owned
//! by one logical caller and every operation runs to completion.
//! Workload synthesis and console reporting live in sibling crates and
//! drive the engine only through its public operations.
//!
//! ## Example
//!
//! ```
//! use segsim_core::{Config, SegmentStore, WriteEngine, WriteRequest};
//!
//! let config = Config::new().segment_capacity(64).segment_count(8);
//! let mut store = SegmentStore::new(&config)?;
//! let engine = WriteEngine::from_config(&config);
//!
//! let id = engine.process_write(&mut store, WriteRequest::new(0, 32))?;
//! assert_eq!(store.segment(id).unwrap().utilization(), 32);
//! # Ok::<(), segsim_core::EngineError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod gc;
pub mod segment;
pub mod stats;
pub mod store;
pub mod types;

pub use config::Config;
pub use engine::WriteEngine;
pub use error::{EngineError, EngineResult};
pub use gc::{GarbageCollector, GcCost, ReclaimOutcome, ReclaimReport, SkipReason};
pub use segment::Segment;
pub use stats::{SegmentStats, StoreStats};
pub use store::SegmentStore;
pub use types::{SegmentId, WriteRequest};
