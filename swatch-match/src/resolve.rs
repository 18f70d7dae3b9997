//! Lab resolution for catalog colors
//!
//! A color can expose its Lab value through several sources of decreasing
//! authority. [`ResolutionChain`] walks them in a fixed order and stops at the
//! first usable one:
//!
//! 1. [`ResolutionStep::Spectral`]: the mode's measurement has a spectral
//!    curve and the loaded standards contain the requested weighting table.
//! 2. [`ResolutionStep::MeasurementLab`]: the mode's measurement carries a
//!    finite stored Lab triple.
//! 3. [`ResolutionStep::StoredLab`]: the color's own stored Lab fields.
//!
//! The same chain is applied to the search reference and to every candidate.

use crate::convert::convert_spectral_to_lab;
use swatch_common::{
    CandidateColor, LabColor, LabSource, MeasurementMode, WeightingKey, WeightingTables,
};
use tracing::warn;

/// One source in the resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    Spectral,
    MeasurementLab,
    StoredLab,
}

/// Outcome of resolving one color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// A usable Lab value, tagged with its source
    Resolved(LabColor),
    /// Only spectral data exists and the standards are not loaded yet
    AwaitingStandards,
    /// No usable color data at all
    Unavailable,
}

impl Resolution {
    pub fn lab(&self) -> Option<LabColor> {
        match self {
            Resolution::Resolved(lab) => Some(*lab),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Inputs shared by every resolution within one search
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub mode: MeasurementMode,
    pub weighting: &'a WeightingKey,
    /// `None` while the standards are still loading
    pub standards: Option<&'a WeightingTables>,
}

/// Ordered list of Lab sources
#[derive(Debug, Clone)]
pub struct ResolutionChain {
    steps: Vec<ResolutionStep>,
}

impl Default for ResolutionChain {
    fn default() -> Self {
        Self {
            steps: vec![
                ResolutionStep::Spectral,
                ResolutionStep::MeasurementLab,
                ResolutionStep::StoredLab,
            ],
        }
    }
}

impl ResolutionChain {
    /// Chain with a custom step order
    pub fn with_steps(steps: Vec<ResolutionStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ResolutionStep] {
        &self.steps
    }

    /// Resolve one color
    pub fn resolve(&self, color: &CandidateColor, ctx: &ResolveContext<'_>) -> Resolution {
        let measurement = color.measurement_for(ctx.mode);
        let mut awaiting_standards = false;

        for step in &self.steps {
            match step {
                ResolutionStep::Spectral => {
                    let Some(curve) = measurement.and_then(|m| m.usable_spectral()) else {
                        continue;
                    };
                    let Some(tables) = ctx.standards else {
                        awaiting_standards = true;
                        continue;
                    };
                    let Some(rows) = tables.rows_for(ctx.weighting) else {
                        continue;
                    };
                    match convert_spectral_to_lab(curve, rows) {
                        Ok(lab) => return Resolution::Resolved(lab),
                        Err(e) => {
                            warn!(color = %color.id, "Spectral conversion failed, falling back: {}", e);
                        }
                    }
                }
                ResolutionStep::MeasurementLab => {
                    if let Some(lab) = measurement
                        .and_then(|m| m.lab.as_ref())
                        .and_then(|lab| lab.to_lab(LabSource::Measurement))
                    {
                        return Resolution::Resolved(lab);
                    }
                }
                ResolutionStep::StoredLab => {
                    if let Some(lab) = color
                        .lab
                        .as_ref()
                        .and_then(|lab| lab.to_lab(LabSource::Stored))
                    {
                        return Resolution::Resolved(lab);
                    }
                }
            }
        }

        if awaiting_standards {
            Resolution::AwaitingStandards
        } else {
            Resolution::Unavailable
        }
    }
}
