//! Segment store: the arena of segments plus lifetime counters.

use crate::config::Config;
use crate::error::EngineResult;
use crate::segment::Segment;
use crate::stats::{SegmentStats, StoreStats};
use crate::types::SegmentId;

/// Fixed-size collection of segments and the store-wide counters
/// every engine operation updates.
///
/// The arena never grows or shrinks: segment index order is also the
/// scan order for allocation and victim search, and a segment's ID
/// equals its index. All counters are plain fields owned by this one
/// aggregate so a future concurrent version can wrap exactly this
/// type in a synchronization boundary.
#[derive(Debug)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    segment_capacity: usize,
    total_writes: u64,
    total_invalidated: u64,
    reclamation_count: u64,
    total_reclamation_cost: f64,
}

impl SegmentStore {
    /// Creates a store with `config.segment_count` empty segments.
    pub fn new(config: &Config) -> EngineResult<Self> {
        config.validate()?;
        let segments = (0..config.segment_count)
            .map(|i| Segment::new(SegmentId::new(i as u32), config.segment_capacity))
            .collect();
        Ok(Self {
            segments,
            segment_capacity: config.segment_capacity,
            total_writes: 0,
            total_invalidated: 0,
            reclamation_count: 0,
            total_reclamation_cost: 0.0,
        })
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the fixed per-segment byte capacity.
    #[must_use]
    pub fn segment_capacity(&self) -> usize {
        self.segment_capacity
    }

    /// Returns a read-only view of a segment.
    #[must_use]
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.as_index())
    }

    /// Iterates over all segments in scan order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// First-fit scan: index of the first segment whose live content
    /// leaves room for `size` more bytes.
    #[must_use]
    pub(crate) fn first_fit(&self, size: usize) -> Option<usize> {
        self.segments.iter().position(|seg| seg.has_room_for(size))
    }

    pub(crate) fn segment_mut(&mut self, index: usize) -> &mut Segment {
        &mut self.segments[index]
    }

    /// Two distinct segments borrowed mutably at once, for the
    /// victim-to-destination compaction copy.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`; reclamation never compacts a segment into
    /// itself.
    pub(crate) fn segment_pair_mut(&mut self, a: usize, b: usize) -> (&mut Segment, &mut Segment) {
        assert_ne!(a, b, "segment pair must be distinct");
        if a < b {
            let (left, right) = self.segments.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.segments.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Number of segments holding at least one live byte.
    #[must_use]
    pub fn used_segments(&self) -> usize {
        self.segments.iter().filter(|seg| seg.is_used()).count()
    }

    /// Live bytes summed across all segments.
    #[must_use]
    pub fn total_live_bytes(&self) -> usize {
        self.segments.iter().map(Segment::utilization).sum()
    }

    /// Successfully completed write requests.
    #[must_use]
    pub fn total_writes(&self) -> u64 {
        self.total_writes
    }

    /// Bytes invalidated across all segments, store lifetime.
    #[must_use]
    pub fn total_invalidated(&self) -> u64 {
        self.total_invalidated
    }

    /// Completed garbage-collection cycles.
    #[must_use]
    pub fn reclamation_count(&self) -> u64 {
        self.reclamation_count
    }

    /// Accumulated finite reclamation cost.
    #[must_use]
    pub fn total_reclamation_cost(&self) -> f64 {
        self.total_reclamation_cost
    }

    pub(crate) fn record_write(&mut self) {
        self.total_writes += 1;
    }

    pub(crate) fn record_invalidated(&mut self, bytes: u64) {
        self.total_invalidated += bytes;
    }

    /// Records a completed reclamation. A `None` cost means the cost
    /// model reported an unbounded value; the cycle still counts.
    pub(crate) fn record_reclamation(&mut self, cost: Option<f64>) {
        if let Some(cost) = cost {
            self.total_reclamation_cost += cost;
        }
        self.reclamation_count += 1;
    }

    /// Snapshot of the store-wide counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            segment_count: self.segment_count(),
            segment_capacity: self.segment_capacity,
            total_writes: self.total_writes,
            total_invalidated: self.total_invalidated,
            reclamation_count: self.reclamation_count,
            total_reclamation_cost: self.total_reclamation_cost,
            used_segments: self.used_segments(),
            total_live_bytes: self.total_live_bytes(),
        }
    }

    /// Per-segment snapshots, in scan order.
    #[must_use]
    pub fn segment_stats(&self) -> Vec<SegmentStats> {
        self.segments
            .iter()
            .map(|seg| SegmentStats {
                id: seg.id(),
                utilization: seg.utilization(),
                invalidated_bytes: seg.invalidated_bytes(),
            })
            .collect()
    }
}
