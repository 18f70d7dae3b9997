//! Pass/fail evaluation of a sample against a color standard

use crate::delta_e::compute_delta_e;
use serde::{Deserialize, Serialize};
use swatch_common::{DeltaEMethod, Error, LabColor, Result};

/// Perceptual category of a delta E value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaECategory {
    /// ΔE < 1.0
    Imperceptible,
    /// 1.0 ≤ ΔE < 2.0
    BarelyPerceptible,
    /// 2.0 ≤ ΔE < 10.0
    Noticeable,
    /// ΔE ≥ 10.0
    VeryDifferent,
}

impl DeltaECategory {
    pub fn from_delta_e(delta_e: f64) -> Self {
        if delta_e < 1.0 {
            DeltaECategory::Imperceptible
        } else if delta_e < 2.0 {
            DeltaECategory::BarelyPerceptible
        } else if delta_e < 10.0 {
            DeltaECategory::Noticeable
        } else {
            DeltaECategory::VeryDifferent
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeltaECategory::Imperceptible => "Imperceptible",
            DeltaECategory::BarelyPerceptible => "Barely perceptible",
            DeltaECategory::Noticeable => "Noticeable",
            DeltaECategory::VeryDifferent => "Very different",
        }
    }
}

impl std::fmt::Display for DeltaECategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of checking one sample against a reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceVerdict {
    pub method: DeltaEMethod,
    pub delta_e: f64,
    pub tolerance: f64,
    /// `delta_e <= tolerance`
    pub passed: bool,
    pub category: DeltaECategory,
}

/// Check whether `sample` matches `reference` within `tolerance`
///
/// The reference is the first argument of the directional formulas.
pub fn evaluate_tolerance(
    reference: &LabColor,
    sample: &LabColor,
    method: DeltaEMethod,
    tolerance: f64,
) -> Result<ToleranceVerdict> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(Error::InvalidInput(format!(
            "tolerance must be a non-negative number, got {}",
            tolerance
        )));
    }
    let delta_e = compute_delta_e(reference, sample, method)?;

    Ok(ToleranceVerdict {
        method,
        delta_e,
        tolerance,
        passed: delta_e <= tolerance,
        category: DeltaECategory::from_delta_e(delta_e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(DeltaECategory::from_delta_e(0.0), DeltaECategory::Imperceptible);
        assert_eq!(DeltaECategory::from_delta_e(1.0), DeltaECategory::BarelyPerceptible);
        assert_eq!(DeltaECategory::from_delta_e(5.0), DeltaECategory::Noticeable);
        assert_eq!(DeltaECategory::from_delta_e(10.0), DeltaECategory::VeryDifferent);
    }

    #[test]
    fn test_pass_and_fail() {
        let reference = LabColor::new(50.0, 0.0, 0.0);
        let sample = LabColor::new(50.0, 3.0, 4.0);

        let pass = evaluate_tolerance(&reference, &sample, DeltaEMethod::DE76, 5.0).unwrap();
        assert!(pass.passed);
        assert!((pass.delta_e - 5.0).abs() < 1e-12);
        assert_eq!(pass.category, DeltaECategory::Noticeable);

        let fail = evaluate_tolerance(&reference, &sample, DeltaEMethod::DE76, 4.9).unwrap();
        assert!(!fail.passed);
    }

    #[test]
    fn test_invalid_tolerance() {
        let lab = LabColor::new(50.0, 0.0, 0.0);
        assert!(evaluate_tolerance(&lab, &lab, DeltaEMethod::DE00, -1.0).is_err());
        assert!(evaluate_tolerance(&lab, &lab, DeltaEMethod::DE00, f64::NAN).is_err());
    }

    #[test]
    fn test_non_finite_sample_propagates() {
        let reference = LabColor::new(50.0, 0.0, 0.0);
        let sample = LabColor::new(f64::NAN, 0.0, 0.0);
        assert!(matches!(
            evaluate_tolerance(&reference, &sample, DeltaEMethod::DE00, 2.0),
            Err(Error::InvalidInput(_))
        ));
    }
}
