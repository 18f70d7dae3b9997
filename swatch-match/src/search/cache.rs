//! Session-scoped cache of similarity results
//!
//! Keys are coarse: they capture every input that changes the
//! unfiltered result set, and nothing else. `max_results` itself is applied
//! when a cached set is re-filtered, but with early exit enabled it also
//! bounds the scan, so the bound (`exit_at`) is part of the key.
//!
//! Entries are never evicted; the cache lives as long as its search session.

use super::SimilarityResult;
use std::collections::HashMap;
use swatch_common::{DeltaEMethod, MeasurementMode};
use uuid::Uuid;

/// Threshold quantized to 1/1000 delta E
///
/// Avoids hashing floats while still separating any thresholds a user can
/// distinguish on a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThresholdKey(u64);

impl ThresholdKey {
    pub fn from_threshold(threshold: f64) -> Self {
        Self((threshold * 1000.0).round() as u64)
    }
}

/// Everything that determines the unfiltered result set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub reference_id: Uuid,
    pub method: DeltaEMethod,
    pub threshold: ThresholdKey,
    pub mode: MeasurementMode,
    pub illuminant: String,
    pub observer: String,
    pub table: u32,
    pub corpus_size: usize,
    pub resolvable_candidates: usize,
    pub corpus_enriched: bool,
    pub standards_loaded: bool,
    /// Matches after which the scan stops; `None` for exhaustive scans
    pub exit_at: Option<usize>,
}

/// Cache of sorted, unfiltered result sets
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<CacheKey, Vec<SimilarityResult>>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a result set, counting the hit or miss
    pub fn get(&mut self, key: &CacheKey) -> Option<&[SimilarityResult]> {
        match self.entries.get(key) {
            Some(results) => {
                self.hits += 1;
                Some(results.as_slice())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, results: Vec<SimilarityResult>) {
        self.entries.insert(key, results);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry (hit/miss counters are kept)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the number of cache hits
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Get the number of cache misses
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Get cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
