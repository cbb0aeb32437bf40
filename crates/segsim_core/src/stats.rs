//! Read-only snapshots of store and segment state.
//!
//! Reporting collaborators (the CLI, tests) observe the engine only
//! through these snapshots; they carry no references back into the
//! store and can be serialized for machine-readable output.

use crate::types::SegmentId;
use serde::Serialize;

/// Point-in-time view of one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentStats {
    /// Stable segment identifier.
    pub id: SegmentId,
    /// Live bytes currently held.
    pub utilization: usize,
    /// Bytes invalidated since the segment was last reset.
    pub invalidated_bytes: u64,
}

/// Point-in-time view of store-wide counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    /// Number of segments in the store.
    pub segment_count: usize,
    /// Fixed byte capacity of every segment.
    pub segment_capacity: usize,
    /// Successfully completed write requests.
    pub total_writes: u64,
    /// Bytes invalidated across all segments, store lifetime.
    pub total_invalidated: u64,
    /// Completed garbage-collection cycles.
    pub reclamation_count: u64,
    /// Accumulated finite reclamation cost.
    pub total_reclamation_cost: f64,
    /// Segments currently holding at least one live byte.
    pub used_segments: usize,
    /// Live bytes summed across all segments.
    pub total_live_bytes: usize,
}

impl StoreStats {
    /// Ratio of used segments to total segments.
    #[must_use]
    pub fn occupancy(&self) -> f64 {
        self.used_segments as f64 / self.segment_count as f64
    }
}
