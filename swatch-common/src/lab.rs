//! CIELAB and CIE XYZ value types
//!
//! A [`LabColor`] always records where it came from ([`LabSource`]) so that
//! callers can tell a freshly integrated spectral value from a stored one.

use serde::{Deserialize, Serialize};

/// Provenance of a Lab value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabSource {
    /// Computed from a spectral curve via weighted-ordinate integration
    Spectral,
    /// Lab triple stored on a measurement record
    Measurement,
    /// Lab triple stored on the color itself
    Stored,
    /// Not attached to any source (constructed by hand)
    #[default]
    None,
}

/// CIELAB color with provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    /// Lightness (0-100)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
    #[serde(default)]
    pub source: LabSource,
}

impl LabColor {
    /// Create a Lab color without provenance
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self {
            l,
            a,
            b,
            source: LabSource::None,
        }
    }

    /// Return a copy tagged with the given provenance
    pub const fn with_source(self, source: LabSource) -> Self {
        Self { source, ..self }
    }

    /// True when all three components are finite
    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Chroma C*ab
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle h_ab in degrees, in [0, 360)
    ///
    /// Achromatic colors (a = b = 0) report 0.
    pub fn hue_degrees(&self) -> f64 {
        hue_angle(self.a, self.b)
    }
}

/// Hue angle in degrees (0-360) of an (a, b) pair; 0 for the neutral axis
pub fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// Stored Lab triple as it appears on measurement records and catalog rows
///
/// Components are optional because upstream data is frequently partial; a
/// triple is only usable when all three are present and finite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StoredLab {
    #[serde(default)]
    pub l: Option<f64>,
    #[serde(default)]
    pub a: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
}

impl StoredLab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self {
            l: Some(l),
            a: Some(a),
            b: Some(b),
        }
    }

    /// Convert to a [`LabColor`] when every component is present and finite
    pub fn to_lab(&self, source: LabSource) -> Option<LabColor> {
        match (self.l, self.a, self.b) {
            (Some(l), Some(a), Some(b)) => {
                let lab = LabColor::new(l, a, b).with_source(source);
                lab.is_finite().then_some(lab)
            }
            _ => None,
        }
    }
}

/// CIE XYZ tristimulus values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tristimulus {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Tristimulus {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_angle_quadrants() {
        assert_eq!(hue_angle(0.0, 0.0), 0.0);
        assert!((hue_angle(1.0, 0.0) - 0.0).abs() < 1e-12);
        assert!((hue_angle(0.0, 1.0) - 90.0).abs() < 1e-12);
        assert!((hue_angle(-1.0, 0.0) - 180.0).abs() < 1e-12);
        assert!((hue_angle(0.0, -1.0) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn test_stored_lab_requires_all_finite_components() {
        assert!(StoredLab::new(50.0, 1.0, 2.0)
            .to_lab(LabSource::Stored)
            .is_some());
        assert!(StoredLab::new(50.0, f64::NAN, 2.0)
            .to_lab(LabSource::Stored)
            .is_none());

        let partial = StoredLab {
            l: Some(50.0),
            a: None,
            b: Some(2.0),
        };
        assert!(partial.to_lab(LabSource::Stored).is_none());
    }

    #[test]
    fn test_stored_lab_carries_provenance() {
        let lab = StoredLab::new(50.0, 10.0, -5.0)
            .to_lab(LabSource::Measurement)
            .unwrap();
        assert_eq!(lab.source, LabSource::Measurement);
        assert_eq!((lab.l, lab.a, lab.b), (50.0, 10.0, -5.0));
    }

    #[test]
    fn test_lab_deserializes_without_source() {
        let lab: LabColor = serde_json::from_str(r#"{"l": 40.0, "a": 3.0, "b": 4.0}"#).unwrap();
        assert_eq!(lab.source, LabSource::None);
        assert!((lab.chroma() - 5.0).abs() < 1e-12);
    }
}
