//! Engine configuration.

use crate::error::{EngineError, EngineResult};

/// Default segment capacity in bytes.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 1024;

/// Default number of segments in the store.
pub const DEFAULT_SEGMENT_COUNT: usize = 1024;

/// Default store-occupancy ratio at which garbage collection triggers.
pub const DEFAULT_GC_THRESHOLD: f64 = 0.9;

/// Configuration for building a segment store and its engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixed byte capacity of every segment.
    pub segment_capacity: usize,

    /// Number of segments in the store (fixed, no dynamic growth).
    pub segment_count: usize,

    /// Used-segment ratio at or above which garbage collection runs.
    pub gc_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            segment_count: DEFAULT_SEGMENT_COUNT,
            gc_threshold: DEFAULT_GC_THRESHOLD,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-segment byte capacity.
    #[must_use]
    pub const fn segment_capacity(mut self, capacity: usize) -> Self {
        self.segment_capacity = capacity;
        self
    }

    /// Sets the number of segments.
    #[must_use]
    pub const fn segment_count(mut self, count: usize) -> Self {
        self.segment_count = count;
        self
    }

    /// Sets the garbage-collection trigger threshold.
    #[must_use]
    pub const fn gc_threshold(mut self, threshold: f64) -> Self {
        self.gc_threshold = threshold;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.segment_capacity == 0 {
            return Err(EngineError::invalid_config(
                "segment_capacity must be non-zero",
            ));
        }
        if self.segment_count == 0 {
            return Err(EngineError::invalid_config("segment_count must be non-zero"));
        }
        if !(self.gc_threshold > 0.0 && self.gc_threshold <= 1.0) {
            return Err(EngineError::invalid_config(
                "gc_threshold must be within (0.0, 1.0]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.segment_capacity, 1024);
        assert_eq!(config.segment_count, 1024);
        assert!((config.gc_threshold - 0.9).abs() < f64::EPSILON);
        config.validate().unwrap();
    }

    #[test]
    fn builder_chain() {
        let config = Config::new()
            .segment_capacity(64)
            .segment_count(8)
            .gc_threshold(0.5);
        assert_eq!(config.segment_capacity, 64);
        assert_eq!(config.segment_count, 8);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = Config::new().segment_capacity(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_count() {
        let config = Config::new().segment_count(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_threshold() {
        assert!(Config::new().gc_threshold(0.0).validate().is_err());
        assert!(Config::new().gc_threshold(1.5).validate().is_err());
        assert!(Config::new().gc_threshold(f64::NAN).validate().is_err());
        assert!(Config::new().gc_threshold(1.0).validate().is_ok());
    }
}
