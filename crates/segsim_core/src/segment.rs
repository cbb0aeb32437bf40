//! Fixed-capacity append targets with byte-granularity validity tracking.
//!
//! A [`Segment`] models one erase unit of a log-structured device: a
//! fixed byte buffer plus a per-offset validity map. Logical
//! overwrites never touch bytes in place; the write path first
//! invalidates the superseded range and then records the new version,
//! so `utilization` always equals the number of live bytes.

use crate::types::SegmentId;

/// Stand-in payload value; the simulation tracks placement and
/// validity, not data content.
const FILL_BYTE: u8 = 1;

/// A fixed-capacity storage segment.
///
/// Created once at store initialization and mutated in place. A
/// segment is never destroyed: reclamation resets it to its initial
/// state while its [`SegmentId`] persists.
#[derive(Debug, Clone)]
pub struct Segment {
    id: SegmentId,
    data: Vec<u8>,
    valid: Vec<bool>,
    utilization: usize,
    invalidated_bytes: u64,
}

impl Segment {
    /// Creates an empty segment with the given ID and capacity.
    #[must_use]
    pub fn new(id: SegmentId, capacity: usize) -> Self {
        Self {
            id,
            data: vec![0; capacity],
            valid: vec![false; capacity],
            utilization: 0,
            invalidated_bytes: 0,
        }
    }

    /// Returns the segment's stable identifier.
    #[must_use]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Returns the fixed byte capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the count of live bytes.
    #[must_use]
    pub fn utilization(&self) -> usize {
        self.utilization
    }

    /// Returns the bytes invalidated since the last reset.
    #[must_use]
    pub fn invalidated_bytes(&self) -> u64 {
        self.invalidated_bytes
    }

    /// Returns true if the segment holds any live bytes.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.utilization > 0
    }

    /// Returns true if the byte at `offset` is live.
    ///
    /// Out-of-range offsets are never live.
    #[must_use]
    pub fn is_valid(&self, offset: usize) -> bool {
        self.valid.get(offset).copied().unwrap_or(false)
    }

    /// Returns true if `size` more bytes fit alongside the current
    /// live content.
    ///
    /// Requests carry no upper bound on `size`, so the comparison
    /// avoids `utilization + size`, which could overflow.
    #[must_use]
    pub fn has_room_for(&self, size: usize) -> bool {
        // utilization <= capacity is an invariant.
        size <= self.capacity() - self.utilization
    }

    /// Marks every live byte in `[offset, offset + size)` stale.
    ///
    /// Returns the number of bytes actually invalidated. Offsets
    /// outside `[0, capacity)` are silently skipped, and invalidating
    /// an already-stale byte has no effect, so the operation is
    /// idempotent.
    pub fn invalidate_range(&mut self, offset: usize, size: usize) -> usize {
        let end = offset.saturating_add(size).min(self.capacity());
        let mut invalidated = 0;
        for i in offset..end {
            if self.valid[i] {
                self.valid[i] = false;
                self.utilization -= 1;
                self.invalidated_bytes += 1;
                invalidated += 1;
            }
        }
        invalidated
    }

    /// Records a write over `[offset, offset + size)`.
    ///
    /// Newly live offsets bump `utilization`; offsets that were
    /// already live only have their payload refreshed. Offsets outside
    /// `[0, capacity)` are silently skipped.
    pub fn write_range(&mut self, offset: usize, size: usize) {
        let end = offset.saturating_add(size).min(self.capacity());
        for i in offset..end {
            self.data[i] = FILL_BYTE;
            if !self.valid[i] {
                self.valid[i] = true;
                self.utilization += 1;
            }
        }
    }

    /// Returns the segment to its initial state, preserving its ID.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.valid.fill(false);
        self.utilization = 0;
        self.invalidated_bytes = 0;
    }

    /// Counts live offsets directly from the validity map.
    ///
    /// Always equals [`utilization`](Self::utilization); used by tests
    /// and debug assertions to check the invariant.
    #[must_use]
    pub fn live_byte_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }
}
