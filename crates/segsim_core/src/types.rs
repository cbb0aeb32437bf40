//! Core type definitions for segsim.

use std::fmt;

/// Unique identifier for a segment.
///
/// Segment IDs are assigned once at store creation, match the
/// segment's arena index, and are never reused. Reclamation resets a
/// segment's contents but preserves its ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct SegmentId(pub u32);

impl SegmentId {
    /// Creates a new segment ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the ID as an arena index.
    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg:{}", self.0)
    }
}

/// A single write request submitted to the engine.
///
/// `offset` is an intra-segment byte offset: it is applied directly
/// inside whichever segment the first-fit scan picks, not resolved
/// against a global address space. Two requests with equal offsets can
/// land in different segments and then refer to different bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRequest {
    /// Byte offset within the chosen segment.
    pub offset: usize,
    /// Number of bytes to write.
    pub size: usize,
}

impl WriteRequest {
    /// Creates a new write request.
    #[must_use]
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }
}

impl fmt::Display for WriteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write(offset={}, size={})", self.offset, self.size)
    }
}
