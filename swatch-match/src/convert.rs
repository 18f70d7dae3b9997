//! Spectral reflectance to CIELAB via weighted-ordinate integration
//!
//! For each tristimulus channel the reflectance is multiplied by the table's
//! weight at every wavelength present in both the curve and the table, then
//! summed and scaled by k:
//!
//! ```text
//! X = k · Σ Wx(λ) · R(λ)      Xn = k · Σ Wx(λ)
//! Y = k · Σ Wy(λ) · R(λ)      Yn = k · Σ Wy(λ)
//! Z = k · Σ Wz(λ) · R(λ)      Zn = k · Σ Wz(λ)
//! ```
//!
//! The reference white (Xn, Yn, Zn) is the perfect reflecting diffuser over
//! the same wavelengths, so a flat curve always lands on the neutral axis.
//! k = 100 / Σ Wy over those wavelengths, so the perfect diffuser has
//! Y = 100 whatever the table's own normalization constant is. A curve that
//! covers only part of the table is rescaled the same way.

use std::collections::BTreeSet;
use swatch_common::{Error, LabColor, LabSource, Result, SpectralCurve, Tristimulus, WeightingRow};
use tracing::debug;

/// (6/29)³, the linear/cube-root breakpoint of the CIELAB transfer function
const EPSILON: f64 = (6.0 / 29.0) * (6.0 / 29.0) * (6.0 / 29.0);

/// Weighted sums of one curve against one table
///
/// Both triples are scaled so that `white.y` is exactly 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integration {
    /// Sample tristimulus values
    pub xyz: Tristimulus,
    /// Perfect diffuser over the integrated wavelengths
    pub white: Tristimulus,
    /// Scale factor k applied to the raw weighted sums
    pub scale: f64,
    /// Number of wavelengths present in both curve and table
    pub wavelengths: usize,
}

/// Integrate a spectral curve against one weighting table
///
/// `rows` must already be filtered to a single (illuminant, observer, table)
/// and list each wavelength at most once.
pub fn integrate_tristimulus(curve: &SpectralCurve, rows: &[WeightingRow]) -> Result<Integration> {
    let Some(first) = rows.first() else {
        return Err(Error::DataUnavailable("no weighting rows".to_string()));
    };
    if !curve.is_usable() {
        return Err(Error::DataUnavailable(format!(
            "spectral curve has {} point(s), at least 2 required",
            curve.len()
        )));
    }
    let key = first.key();
    if let Some(other) = rows.iter().find(|r| !r.matches(&key)) {
        return Err(Error::InvalidInput(format!(
            "weighting rows mix tables {} and {}",
            key,
            other.key()
        )));
    }

    let mut seen = BTreeSet::new();
    if let Some(dup) = rows.iter().find(|r| !seen.insert(r.wavelength)) {
        return Err(Error::InvalidInput(format!(
            "table {} lists {} nm more than once",
            key, dup.wavelength
        )));
    }

    let mut sums = Tristimulus::default();
    let mut white = Tristimulus::default();
    let mut wavelengths = 0;
    for row in rows {
        let Some(r) = curve.reflectance(row.wavelength) else {
            continue;
        };
        sums.x += row.x * r;
        sums.y += row.y * r;
        sums.z += row.z * r;
        white.x += row.x;
        white.y += row.y;
        white.z += row.z;
        wavelengths += 1;
    }

    if wavelengths == 0 {
        return Err(Error::DataUnavailable(format!(
            "spectral curve shares no wavelengths with table {}",
            key
        )));
    }
    if !white.y.is_finite() || white.y <= 0.0 {
        return Err(Error::DataUnavailable(format!(
            "table {} has no positive Y weights over the measured range",
            key
        )));
    }

    let k = 100.0 / white.y;

    Ok(Integration {
        xyz: Tristimulus::new(k * sums.x, k * sums.y, k * sums.z),
        white: Tristimulus::new(k * white.x, 100.0, k * white.z),
        scale: k,
        wavelengths,
    })
}

/// CIELAB transfer function
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        // (1/3)(29/6)² t + 4/29
        t * (29.0 * 29.0) / (3.0 * 6.0 * 6.0) + 4.0 / 29.0
    }
}

/// Convert XYZ to CIELAB relative to the given reference white
///
/// The result carries no provenance; non-finite components are possible when
/// the white has a zero channel and are left to the caller to reject.
pub fn xyz_to_lab(xyz: Tristimulus, white: Tristimulus) -> LabColor {
    let fx = lab_f(xyz.x / white.x);
    let fy = lab_f(xyz.y / white.y);
    let fz = lab_f(xyz.z / white.z);

    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Convert a spectral curve to Lab using one weighting table
///
/// Fails with [`Error::DataUnavailable`] when there is nothing to integrate
/// or the result is not finite. Never substitutes a guess.
pub fn convert_spectral_to_lab(curve: &SpectralCurve, rows: &[WeightingRow]) -> Result<LabColor> {
    let integration = integrate_tristimulus(curve, rows)?;
    let lab = xyz_to_lab(integration.xyz, integration.white);

    if !lab.is_finite() {
        return Err(Error::DataUnavailable(format!(
            "integration produced non-finite Lab ({}, {}, {})",
            lab.l, lab.a, lab.b
        )));
    }

    debug!(
        wavelengths = integration.wavelengths,
        l = lab.l,
        a = lab.a,
        b = lab.b,
        "Converted spectral curve"
    );
    Ok(lab.with_source(LabSource::Spectral))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(nm: u32, x: f64, y: f64, z: f64) -> WeightingRow {
        WeightingRow {
            illuminant: "D50".to_string(),
            observer: "2".to_string(),
            table: 5,
            wavelength: nm,
            x,
            y,
            z,
            normalization: 0.0,
        }
    }

    /// Fixed three-point D50 / 2° / table 5 fixture
    fn golden_rows() -> Vec<WeightingRow> {
        vec![
            row(400, 1.9, 0.2, 9.4),
            row(500, 0.3, 3.4, 2.6),
            row(600, 6.3, 4.0, 0.0),
        ]
    }

    #[test]
    fn test_golden_conversion() {
        let curve = SpectralCurve::from_points([(400, 0.5), (500, 0.8), (600, 0.3)]);
        let lab = convert_spectral_to_lab(&curve, &golden_rows()).unwrap();

        assert_eq!(lab.source, LabSource::Spectral);
        assert!((lab.l - 77.812810).abs() < 1e-4, "L = {}", lab.l);
        assert!((lab.a - -47.902988).abs() < 1e-4, "a = {}", lab.a);
        assert!((lab.b - -3.594365).abs() < 1e-4, "b = {}", lab.b);
    }

    #[test]
    fn test_golden_tristimulus() {
        let curve = SpectralCurve::from_points([(400, 0.5), (500, 0.8), (600, 0.3)]);
        let integration = integrate_tristimulus(&curve, &golden_rows()).unwrap();

        assert_eq!(integration.wavelengths, 3);
        assert!((integration.white.y - 100.0).abs() < 1e-9);
        assert!((integration.xyz.x - 40.526316).abs() < 1e-5);
        assert!((integration.xyz.y - 52.894737).abs() < 1e-5);
        assert!((integration.xyz.z - 89.210526).abs() < 1e-5);
    }

    #[test]
    fn test_flat_curve_is_neutral() {
        for reflectance in [0.02, 0.18, 0.5, 0.9, 1.0] {
            let curve = SpectralCurve::flat([400, 500, 600], reflectance);
            let lab = convert_spectral_to_lab(&curve, &golden_rows()).unwrap();
            assert!(lab.a.abs() < 1e-2, "a = {} at R = {}", lab.a, reflectance);
            assert!(lab.b.abs() < 1e-2, "b = {} at R = {}", lab.b, reflectance);
        }
    }

    #[test]
    fn test_perfect_diffuser_is_white() {
        let curve = SpectralCurve::flat([400, 500, 600], 1.0);
        let lab = convert_spectral_to_lab(&curve, &golden_rows()).unwrap();
        assert!((lab.l - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_table_normalization_does_not_change_scale() {
        let curve = SpectralCurve::from_points([(400, 0.5), (500, 0.8), (600, 0.3)]);
        let scaled: Vec<WeightingRow> = golden_rows()
            .into_iter()
            .map(|mut r| {
                r.normalization = 2.0;
                r
            })
            .collect();

        let integration = integrate_tristimulus(&curve, &scaled).unwrap();
        assert_eq!(integration.white.y, 100.0);
        assert!((integration.xyz.y - 52.894737).abs() < 1e-5);
        assert!((integration.scale - 100.0 / 7.6).abs() < 1e-9);

        let lab = convert_spectral_to_lab(&curve, &scaled).unwrap();
        assert!((lab.l - 77.812810).abs() < 1e-4);
    }

    #[test]
    fn test_partial_overlap_rescales_white() {
        // Only 500 and 600 nm are measured: Σ Wy = 7.4
        let curve = SpectralCurve::from_points([(500, 0.8), (600, 0.3)]);
        let integration = integrate_tristimulus(&curve, &golden_rows()).unwrap();

        assert_eq!(integration.wavelengths, 2);
        assert_eq!(integration.white.y, 100.0);
        assert!((integration.xyz.y - (3.4 * 0.8 + 4.0 * 0.3) * 100.0 / 7.4).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_wavelength_rejected() {
        let mut rows = golden_rows();
        rows.push(row(500, 0.3, 3.4, 2.6));
        let curve = SpectralCurve::flat([400, 500, 600], 0.5);
        assert!(matches!(
            integrate_tristimulus(&curve, &rows),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extra_curve_points_ignored() {
        let curve = SpectralCurve::from_points([
            (380, 0.1),
            (400, 0.5),
            (500, 0.8),
            (600, 0.3),
            (730, 0.9),
        ]);
        let lab = convert_spectral_to_lab(&curve, &golden_rows()).unwrap();
        assert!((lab.l - 77.812810).abs() < 1e-4);
    }

    #[test]
    fn test_empty_rows_fail() {
        let curve = SpectralCurve::flat([400, 500], 0.5);
        assert!(matches!(
            convert_spectral_to_lab(&curve, &[]),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_short_curve_fails() {
        let curve = SpectralCurve::from_points([(400, 0.5)]);
        assert!(matches!(
            convert_spectral_to_lab(&curve, &golden_rows()),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_disjoint_wavelengths_fail() {
        let curve = SpectralCurve::flat([410, 420, 430], 0.5);
        assert!(matches!(
            convert_spectral_to_lab(&curve, &golden_rows()),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_mixed_tables_rejected() {
        let mut rows = golden_rows();
        rows[1].table = 6;
        let curve = SpectralCurve::flat([400, 500, 600], 0.5);
        assert!(matches!(
            convert_spectral_to_lab(&curve, &rows),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_output_fails() {
        // Z weights are zero where the curve is defined, so Zn = 0
        let rows = vec![row(500, 0.3, 3.4, 0.0), row(600, 6.3, 4.0, 0.0)];
        let curve = SpectralCurve::flat([500, 600], 0.5);
        assert!(matches!(
            convert_spectral_to_lab(&curve, &rows),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_dark_sample_uses_linear_segment() {
        let curve = SpectralCurve::flat([400, 500, 600], 0.001);
        let lab = convert_spectral_to_lab(&curve, &golden_rows()).unwrap();
        // Y/Yn = 0.001 is below (6/29)³, L = 903.3 · t
        assert!((lab.l - 0.9033).abs() < 1e-3, "L = {}", lab.l);
    }
}
