//! The write path: segment selection, invalidation, and placement.

use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::gc::GarbageCollector;
use crate::store::SegmentStore;
use crate::types::{SegmentId, WriteRequest};

/// Turns write requests into segment mutations.
///
/// A request first looks for a segment via a first-fit scan. When the
/// scan comes up empty the collector runs one reclamation cycle and
/// the scan is retried; a second miss drops the request with
/// [`EngineError::NoSpace`] and leaves every store counter unchanged.
/// A successful write invalidates the superseded range before placing
/// the new bytes, so a logical overwrite retires the old version
/// first and utilization accounting stays exact.
#[derive(Debug, Clone)]
pub struct WriteEngine {
    gc: GarbageCollector,
}

impl Default for WriteEngine {
    fn default() -> Self {
        Self::new(GarbageCollector::default())
    }
}

impl WriteEngine {
    /// Creates an engine with the given collector.
    #[must_use]
    pub fn new(gc: GarbageCollector) -> Self {
        Self { gc }
    }

    /// Creates an engine whose collector triggers at
    /// `config.gc_threshold`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(GarbageCollector::from_config(config))
    }

    /// Returns the engine's garbage collector.
    #[must_use]
    pub fn gc(&self) -> &GarbageCollector {
        &self.gc
    }

    /// Processes one write request against the store.
    ///
    /// Returns the ID of the segment that absorbed the write. After a
    /// successful write the collector runs proactively once if the
    /// store-occupancy trigger has been crossed.
    pub fn process_write(
        &self,
        store: &mut SegmentStore,
        request: WriteRequest,
    ) -> EngineResult<SegmentId> {
        let index = match store.first_fit(request.size) {
            Some(index) => index,
            None => {
                tracing::debug!(%request, "space full, attempting reclamation");
                self.gc.reclaim(store);
                store.first_fit(request.size).ok_or(EngineError::NoSpace {
                    offset: request.offset,
                    size: request.size,
                })?
            }
        };

        let segment = store.segment_mut(index);
        let id = segment.id();
        let invalidated = segment.invalidate_range(request.offset, request.size);
        segment.write_range(request.offset, request.size);
        store.record_invalidated(invalidated as u64);
        store.record_write();

        if self.gc.needs_reclamation(store) {
            tracing::debug!("store occupancy crossed threshold");
            self.gc.reclaim(store);
        }

        Ok(id)
    }
}
