//! User-facing search controls

use serde::{Deserialize, Serialize};
use swatch_common::config::SearchConfig;
use swatch_common::{DeltaEMethod, MeasurementMode, WeightingKey};

/// Smallest threshold a search will use
pub const MIN_THRESHOLD: f64 = 0.1;

/// Default cap on filtered results
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Parameters of one similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchControls {
    pub mode: MeasurementMode,
    pub illuminant: String,
    pub observer: String,
    pub table: u32,
    pub method: DeltaEMethod,
    /// Match threshold in delta E units; values below 0.1 are raised to 0.1
    pub threshold: f64,
    /// Cap on filtered results; 0 is treated as 1
    pub max_results: usize,
}

impl Default for SearchControls {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl SearchControls {
    /// Controls initialized from configured defaults
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            mode: config.mode,
            illuminant: config.illuminant.clone(),
            observer: config.observer.clone(),
            table: config.table,
            method: config.method,
            threshold: config.threshold,
            max_results: config.max_results,
        }
    }

    pub fn with_method(mut self, method: DeltaEMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_mode(mut self, mode: MeasurementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_weighting(mut self, key: WeightingKey) -> Self {
        self.illuminant = key.illuminant;
        self.observer = key.observer;
        self.table = key.table;
        self
    }

    /// Threshold clamped to [`MIN_THRESHOLD`]
    ///
    /// NaN is treated as the minimum.
    pub fn effective_threshold(&self) -> f64 {
        if self.threshold.is_nan() {
            MIN_THRESHOLD
        } else {
            self.threshold.max(MIN_THRESHOLD)
        }
    }

    pub fn effective_max_results(&self) -> usize {
        self.max_results.max(1)
    }

    pub fn weighting_key(&self) -> WeightingKey {
        WeightingKey::new(self.illuminant.clone(), self.observer.clone(), self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config() {
        let controls = SearchControls::default();
        assert_eq!(controls.method, DeltaEMethod::DE00);
        assert_eq!(controls.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(controls.threshold, 2.0);
        assert_eq!(controls.weighting_key(), WeightingKey::new("D50", "2", 5));
    }

    #[test]
    fn test_threshold_clamp() {
        let controls = SearchControls::default();
        assert_eq!(controls.clone().with_threshold(0.0).effective_threshold(), 0.1);
        assert_eq!(controls.clone().with_threshold(-3.0).effective_threshold(), 0.1);
        assert_eq!(controls.clone().with_threshold(f64::NAN).effective_threshold(), 0.1);
        assert_eq!(controls.with_threshold(2.5).effective_threshold(), 2.5);
    }

    #[test]
    fn test_max_results_floor() {
        assert_eq!(SearchControls::default().with_max_results(0).effective_max_results(), 1);
    }
}
