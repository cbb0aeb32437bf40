//! # segsim workloads
//!
//! Synthetic write-request streams for driving the segsim engine.
//! Three request distributions are provided:
//!
//! - **uniform**: offsets spread evenly across a segment
//! - **hotspot**: offsets concentrated in the first quarter of a
//!   segment, modelling a hot key range that churns stale bytes
//! - **sequential**: offsets advancing in even steps across the
//!   segment, wrapping at capacity
//!
//! Sizes are always drawn uniformly from one byte up to a tenth of
//! the segment capacity. Generators are seedable for reproducible
//! runs.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use segsim_core::{EngineError, SegmentStore, WriteEngine, WriteRequest};
use std::fmt;
use std::str::FromStr;

/// Request distribution shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Offsets uniform over the whole segment.
    Uniform,
    /// Offsets concentrated in the first quarter of the segment.
    Hotspot,
    /// Offsets stepping evenly through the segment, wrapping at
    /// capacity.
    Sequential,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uniform => "uniform",
            Self::Hotspot => "hotspot",
            Self::Sequential => "sequential",
        };
        f.write_str(name)
    }
}

impl FromStr for Distribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "hotspot" => Ok(Self::Hotspot),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!("unknown distribution: {other}")),
        }
    }
}

/// Seedable generator of [`WriteRequest`] batches.
#[derive(Debug)]
pub struct WorkloadGenerator {
    distribution: Distribution,
    segment_capacity: usize,
    rng: StdRng,
}

impl WorkloadGenerator {
    /// Creates a generator for the given distribution and segment
    /// capacity.
    #[must_use]
    pub fn new(distribution: Distribution, segment_capacity: usize, seed: u64) -> Self {
        Self {
            distribution,
            segment_capacity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the distribution this generator draws from.
    #[must_use]
    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Produces one batch of `count` requests.
    pub fn batch(&mut self, count: usize) -> Vec<WriteRequest> {
        (0..count).map(|i| self.request(i, count)).collect()
    }

    /// Produces the `i`-th request of a batch of `count`.
    fn request(&mut self, i: usize, count: usize) -> WriteRequest {
        let capacity = self.segment_capacity;
        // Capacities below ten bytes still get one-byte requests.
        let size = self.rng.gen_range(1..=(capacity / 10).max(1));
        let offset = match self.distribution {
            Distribution::Uniform => self.rng.gen_range(0..capacity),
            Distribution::Hotspot => self.rng.gen_range(0..(capacity / 4).max(1)),
            Distribution::Sequential => (i * (capacity / count.max(1))) % capacity,
        };
        WriteRequest::new(offset, size)
    }
}

/// Counts of how a driven batch fared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveSummary {
    /// Requests the engine accepted.
    pub accepted: usize,
    /// Requests dropped for lack of space.
    pub dropped: usize,
}

/// Feeds a request batch through the engine, tallying drops.
///
/// `NoSpace` is an expected outcome under saturation, not a failure of
/// the run; each drop is logged and counted.
pub fn drive(
    engine: &WriteEngine,
    store: &mut SegmentStore,
    requests: &[WriteRequest],
) -> DriveSummary {
    let mut summary = DriveSummary::default();
    for request in requests {
        match engine.process_write(store, *request) {
            Ok(_) => summary.accepted += 1,
            Err(EngineError::NoSpace { offset, size }) => {
                tracing::warn!(offset, size, "request dropped: no space");
                summary.dropped += 1;
            }
            Err(err) => {
                tracing::error!(%err, "unexpected engine error");
                summary.dropped += 1;
            }
        }
    }
    summary
}
