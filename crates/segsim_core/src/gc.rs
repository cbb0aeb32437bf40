//! Garbage collection: trigger policy, victim selection, compaction,
//! and the reclamation cost model.
//!
//! ## Invariants
//!
//! - Reclamation **MUST NOT** lose a live byte: every offset valid in
//!   the victim beforehand is valid in the destination afterwards.
//! - A skipped cycle (no victim, no destination) leaves the store
//!   completely unchanged.
//! - `reclamation_count` increments on every completed cycle, whether
//!   or not the cost model produced a finite value.

use crate::config::{Config, DEFAULT_GC_THRESHOLD};
use crate::store::SegmentStore;
use crate::types::SegmentId;
use std::fmt;

/// Cost of one reclamation cycle.
///
/// Derived from the write-amplification approximation
/// `2 / (1 - u)` where `u` is the overall fill ratio estimated from
/// the lifetime write count. At `u >= 1` the model diverges and the
/// cost is reported as unbounded rather than computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GcCost {
    /// Finite cost, accumulated into the store's total.
    Finite(f64),
    /// The fill-ratio estimate reached 1.0; the model diverges.
    Unbounded,
}

impl fmt::Display for GcCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(cost) => write!(f, "{cost:.2}"),
            Self::Unbounded => write!(f, "∞"),
        }
    }
}

/// Why a reclamation cycle made no changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No segment holds both live bytes and stale bytes worth freeing.
    NoVictim,
    /// Every other segment is completely full; nowhere to compact to.
    NoDestination,
}

/// Details of one completed reclamation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ReclaimReport {
    /// The segment that was compacted and reset.
    pub victim: SegmentId,
    /// The segment that absorbed the victim's live bytes.
    pub destination: SegmentId,
    /// Live bytes forwarded from victim to destination.
    pub live_bytes_moved: usize,
    /// Cost assigned to this cycle.
    pub cost: GcCost,
}

/// Outcome of [`GarbageCollector::reclaim`].
///
/// A skipped cycle is not an error: the write engine sees it only as
/// a failed retry, which then surfaces as `NoSpace`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReclaimOutcome {
    /// A victim was compacted and reset.
    Reclaimed(ReclaimReport),
    /// Nothing was reclaimed this cycle.
    Skipped(SkipReason),
}

impl ReclaimOutcome {
    /// Returns true if a segment was actually reclaimed.
    #[must_use]
    pub fn is_reclaimed(&self) -> bool {
        matches!(self, Self::Reclaimed(_))
    }
}

/// Store-occupancy-triggered garbage collector.
///
/// Reclamation is considered globally expensive: the trigger watches
/// the fraction of segments in use across the whole store, not any
/// per-segment measure.
#[derive(Debug, Clone)]
pub struct GarbageCollector {
    threshold: f64,
}

impl Default for GarbageCollector {
    fn default() -> Self {
        Self::new(DEFAULT_GC_THRESHOLD)
    }
}

impl GarbageCollector {
    /// Creates a collector that triggers at the given used-segment
    /// ratio.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Creates a collector from an engine configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gc_threshold)
    }

    /// Returns the trigger threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns true once the used-segment ratio reaches the threshold.
    #[must_use]
    pub fn needs_reclamation(&self, store: &SegmentStore) -> bool {
        let ratio = store.used_segments() as f64 / store.segment_count() as f64;
        ratio >= self.threshold
    }

    /// Runs one reclamation cycle.
    ///
    /// Selects the victim with the most stale bytes, forwards its live
    /// bytes into the first non-victim segment with spare room, resets
    /// the victim, and prices the work. Both skip cases leave the
    /// store untouched.
    pub fn reclaim(&self, store: &mut SegmentStore) -> ReclaimOutcome {
        let Some(victim_index) = self.select_victim(store) else {
            tracing::debug!("reclamation skipped: no suitable victim");
            return ReclaimOutcome::Skipped(SkipReason::NoVictim);
        };

        let Some(dest_index) = self.select_destination(store, victim_index) else {
            tracing::debug!(
                victim = victim_index,
                "reclamation skipped: no space for compaction"
            );
            return ReclaimOutcome::Skipped(SkipReason::NoDestination);
        };

        // Byte-by-byte forwarding copy: each live victim byte lands at
        // the same offset in the destination.
        let capacity = store.segment_capacity();
        let (victim, dest) = store.segment_pair_mut(victim_index, dest_index);
        let victim_id = victim.id();
        let dest_id = dest.id();
        let mut moved = 0;
        for offset in 0..capacity {
            if victim.is_valid(offset) {
                dest.write_range(offset, 1);
                moved += 1;
            }
        }
        victim.reset();

        let cost = self.price(store);
        store.record_reclamation(match cost {
            GcCost::Finite(value) => Some(value),
            GcCost::Unbounded => None,
        });

        tracing::info!(
            victim = %victim_id,
            destination = %dest_id,
            live_bytes_moved = moved,
            cost = %cost,
            "reclaimed segment"
        );

        ReclaimOutcome::Reclaimed(ReclaimReport {
            victim: victim_id,
            destination: dest_id,
            live_bytes_moved: moved,
            cost,
        })
    }

    /// Victim: strictly greatest `invalidated_bytes` among used
    /// segments, first in scan order on ties. The strictly-greater
    /// comparison starts from zero, so a segment whose bytes are all
    /// live can never win.
    fn select_victim(&self, store: &SegmentStore) -> Option<usize> {
        let mut victim = None;
        let mut max_invalidated = 0;
        for (index, segment) in store.segments().enumerate() {
            if segment.invalidated_bytes() > max_invalidated && segment.is_used() {
                max_invalidated = segment.invalidated_bytes();
                victim = Some(index);
            }
        }
        victim
    }

    /// Destination: first segment with spare room, excluding the
    /// victim itself. Compacting a segment into itself would be undone
    /// by the reset that follows.
    fn select_destination(&self, store: &SegmentStore, victim_index: usize) -> Option<usize> {
        let capacity = store.segment_capacity();
        store
            .segments()
            .enumerate()
            .find(|(index, segment)| *index != victim_index && segment.utilization() < capacity)
            .map(|(index, _)| index)
    }

    /// Cost model: `u` approximates the overall fill ratio from the
    /// lifetime write count, not the live-byte count.
    fn price(&self, store: &SegmentStore) -> GcCost {
        let total_capacity = (store.segment_count() * store.segment_capacity()) as f64;
        let u = store.total_writes() as f64 / total_capacity;
        if u < 1.0 {
            GcCost::Finite(2.0 / (1.0 - u))
        } else {
            GcCost::Unbounded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize, count: usize) -> SegmentStore {
        let config = Config::new()
            .segment_capacity(capacity)
            .segment_count(count);
        SegmentStore::new(&config).unwrap()
    }

    /// Writes then invalidates part of the range, leaving the segment
    /// with both live and stale bytes.
    fn dirty_segment(store: &mut SegmentStore, index: usize, live: usize, stale: usize) {
        let seg = store.segment_mut(index);
        seg.write_range(0, live + stale);
        seg.invalidate_range(live, stale);
    }

    #[test]
    fn trigger_at_threshold() {
        let gc = GarbageCollector::new(0.5);
        let mut s = store(16, 4);
        assert!(!gc.needs_reclamation(&s));

        s.segment_mut(0).write_range(0, 1);
        assert!(!gc.needs_reclamation(&s));

        s.segment_mut(1).write_range(0, 1);
        assert!(gc.needs_reclamation(&s));

        s.segment_mut(2).write_range(0, 1);
        assert!(gc.needs_reclamation(&s));
    }

    #[test]
    fn no_victim_in_empty_store() {
        let gc = GarbageCollector::default();
        let mut s = store(16, 4);
        assert_eq!(
            gc.reclaim(&mut s),
            ReclaimOutcome::Skipped(SkipReason::NoVictim)
        );
        assert_eq!(s.reclamation_count(), 0);
    }

    #[test]
    fn all_live_segments_are_not_victims() {
        let gc = GarbageCollector::default();
        let mut s = store(16, 4);
        s.segment_mut(0).write_range(0, 16);
        s.segment_mut(1).write_range(0, 8);

        assert_eq!(
            gc.reclaim(&mut s),
            ReclaimOutcome::Skipped(SkipReason::NoVictim)
        );
    }

    #[test]
    fn victim_has_most_stale_bytes() {
        let gc = GarbageCollector::default();
        let mut s = store(32, 4);
        dirty_segment(&mut s, 0, 10, 2);
        dirty_segment(&mut s, 1, 10, 8);
        dirty_segment(&mut s, 2, 10, 5);

        let ReclaimOutcome::Reclaimed(report) = gc.reclaim(&mut s) else {
            panic!("expected a reclamation");
        };
        assert_eq!(report.victim, SegmentId::new(1));
    }

    #[test]
    fn victim_tie_keeps_first_in_scan_order() {
        let gc = GarbageCollector::default();
        let mut s = store(32, 4);
        dirty_segment(&mut s, 1, 10, 6);
        dirty_segment(&mut s, 2, 10, 6);

        let ReclaimOutcome::Reclaimed(report) = gc.reclaim(&mut s) else {
            panic!("expected a reclamation");
        };
        assert_eq!(report.victim, SegmentId::new(1));
    }

    #[test]
    fn compaction_forwards_live_bytes_to_same_offsets() {
        let gc = GarbageCollector::default();
        let mut s = store(32, 4);
        // Victim: live at [0, 4), stale at [4, 10).
        dirty_segment(&mut s, 0, 4, 6);

        let before_live = s.total_live_bytes();
        let ReclaimOutcome::Reclaimed(report) = gc.reclaim(&mut s) else {
            panic!("expected a reclamation");
        };

        assert_eq!(report.victim, SegmentId::new(0));
        assert_eq!(report.destination, SegmentId::new(1));
        assert_eq!(report.live_bytes_moved, 4);

        let victim = s.segment(SegmentId::new(0)).unwrap();
        assert_eq!(victim.utilization(), 0);
        assert_eq!(victim.invalidated_bytes(), 0);

        let dest = s.segment(SegmentId::new(1)).unwrap();
        for offset in 0..4 {
            assert!(dest.is_valid(offset));
        }
        assert_eq!(s.total_live_bytes(), before_live);
    }

    #[test]
    fn destination_skips_victim() {
        let gc = GarbageCollector::default();
        let mut s = store(16, 2);
        // Segment 1 is full; segment 0 is the only segment with room
        // and also the only victim candidate.
        dirty_segment(&mut s, 0, 4, 4);
        s.segment_mut(1).write_range(0, 16);

        assert_eq!(
            gc.reclaim(&mut s),
            ReclaimOutcome::Skipped(SkipReason::NoDestination)
        );
        // Untouched on skip.
        assert_eq!(s.segment(SegmentId::new(0)).unwrap().utilization(), 4);
        assert_eq!(s.reclamation_count(), 0);
    }

    #[test]
    fn merge_into_overlapping_destination_does_not_double_count() {
        let gc = GarbageCollector::default();
        let mut s = store(16, 3);
        dirty_segment(&mut s, 0, 4, 4);
        // Destination already live over the same offsets.
        s.segment_mut(1).write_range(0, 4);

        let before_dest = s.segment(SegmentId::new(1)).unwrap().utilization();
        let ReclaimOutcome::Reclaimed(report) = gc.reclaim(&mut s) else {
            panic!("expected a reclamation");
        };
        assert_eq!(report.destination, SegmentId::new(1));
        // The copied bytes merged with existing live bytes.
        assert_eq!(
            s.segment(SegmentId::new(1)).unwrap().utilization(),
            before_dest
        );
    }

    #[test]
    fn finite_cost_accumulates() {
        let gc = GarbageCollector::default();
        let mut s = store(16, 4);
        dirty_segment(&mut s, 0, 4, 4);
        // 8 writes recorded out of 64 total capacity: u = 0.125.
        for _ in 0..8 {
            s.record_write();
        }

        let ReclaimOutcome::Reclaimed(report) = gc.reclaim(&mut s) else {
            panic!("expected a reclamation");
        };
        let expected = 2.0 / (1.0 - 0.125);
        assert_eq!(report.cost, GcCost::Finite(expected));
        assert!((s.total_reclamation_cost() - expected).abs() < 1e-9);
        assert_eq!(s.reclamation_count(), 1);
    }

    #[test]
    fn saturated_store_reports_unbounded_cost() {
        let gc = GarbageCollector::default();
        let mut s = store(16, 4);
        dirty_segment(&mut s, 0, 4, 4);
        // total_writes == segment_count * capacity, so u == 1.0.
        for _ in 0..64 {
            s.record_write();
        }

        let ReclaimOutcome::Reclaimed(report) = gc.reclaim(&mut s) else {
            panic!("expected a reclamation");
        };
        assert_eq!(report.cost, GcCost::Unbounded);
        assert_eq!(report.cost.to_string(), "∞");
        // Unbounded cost is reported, never accumulated; the cycle
        // still counts.
        assert_eq!(s.total_reclamation_cost(), 0.0);
        assert_eq!(s.reclamation_count(), 1);
    }
}
