//! Catalog model: colors, their measurements and the searchable corpus
//!
//! These are read-only inputs to the matching engine. They are created
//! upstream (import, measurement capture) and handed in fully resolved.

use crate::lab::StoredLab;
use crate::spectral::SpectralCurve;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurement condition of the spectrophotometer (ISO 13655)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementMode {
    /// Illuminant A, UV included
    M0,
    /// D50 illumination
    M1,
    /// UV excluded
    M2,
    /// Polarized, UV excluded
    M3,
}

impl MeasurementMode {
    /// Parse mode from string, case-insensitive ('m1', 'M1')
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "M0" => Some(MeasurementMode::M0),
            "M1" => Some(MeasurementMode::M1),
            "M2" => Some(MeasurementMode::M2),
            "M3" => Some(MeasurementMode::M3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementMode::M0 => "M0",
            MeasurementMode::M1 => "M1",
            MeasurementMode::M2 => "M2",
            MeasurementMode::M3 => "M3",
        }
    }

    pub fn all_variants() -> &'static [MeasurementMode] {
        &[
            MeasurementMode::M0,
            MeasurementMode::M1,
            MeasurementMode::M2,
            MeasurementMode::M3,
        ]
    }
}

impl Default for MeasurementMode {
    fn default() -> Self {
        MeasurementMode::M0
    }
}

impl std::fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measurement of a color under a given mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub mode: MeasurementMode,
    #[serde(default)]
    pub spectral: Option<SpectralCurve>,
    #[serde(default)]
    pub lab: Option<StoredLab>,
    /// Tint percentage; absent for the solid
    #[serde(default)]
    pub tint: Option<f64>,
}

impl MeasurementRecord {
    pub fn new(mode: MeasurementMode) -> Self {
        Self {
            mode,
            spectral: None,
            lab: None,
            tint: None,
        }
    }

    pub fn with_spectral(mut self, curve: SpectralCurve) -> Self {
        self.spectral = Some(curve);
        self
    }

    pub fn with_lab(mut self, lab: StoredLab) -> Self {
        self.lab = Some(lab);
        self
    }

    pub fn with_tint(mut self, tint: f64) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Solid measurement: no tint, or a tint of 100 % or more
    pub fn is_solid(&self) -> bool {
        self.tint.map_or(true, |t| t >= 100.0)
    }

    /// Spectral curve, if one with enough points is attached
    pub fn usable_spectral(&self) -> Option<&SpectralCurve> {
        self.spectral.as_ref().filter(|c| c.is_usable())
    }
}

/// A catalog color that can be a search reference or candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateColor {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub measurements: Vec<MeasurementRecord>,
    /// Top-level stored Lab fields of the catalog row
    #[serde(default)]
    pub lab: Option<StoredLab>,
}

impl CandidateColor {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            measurements: Vec::new(),
            lab: None,
        }
    }

    pub fn with_measurement(mut self, measurement: MeasurementRecord) -> Self {
        self.measurements.push(measurement);
        self
    }

    pub fn with_lab(mut self, lab: StoredLab) -> Self {
        self.lab = Some(lab);
        self
    }

    /// Measurement to use for `mode`
    ///
    /// Prefers the solid measurement; falls back to the first one of the
    /// mode in input order.
    pub fn measurement_for(&self, mode: MeasurementMode) -> Option<&MeasurementRecord> {
        let mut of_mode = self.measurements.iter().filter(|m| m.mode == mode);
        let first = of_mode.next()?;
        if first.is_solid() {
            return Some(first);
        }
        of_mode.find(|m| m.is_solid()).or(Some(first))
    }
}

/// The set of colors a search scans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub colors: Vec<CandidateColor>,
    /// True once measurement data has been merged into the catalog listing
    #[serde(default)]
    pub enriched: bool,
}

impl Corpus {
    pub fn new(colors: Vec<CandidateColor>) -> Self {
        Self {
            colors,
            enriched: false,
        }
    }

    pub fn enriched(mut self, enriched: bool) -> Self {
        self.enriched = enriched;
        self
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CandidateColor> {
        self.colors.iter().find(|c| c.id == id)
    }
}
