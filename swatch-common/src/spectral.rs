//! Spectral reflectance curves and weighted-ordinate tables
//!
//! A [`SpectralCurve`] maps integer wavelengths (nm) to reflectance factors.
//! Weighting tables are delivered as flat [`WeightingRow`] lists, one row per
//! wavelength, and grouped by [`WeightingKey`] in [`WeightingTables`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Reflectance per wavelength
///
/// Typically 380-730 nm in 10 nm steps with values around 0.0-1.2.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpectralCurve {
    points: BTreeMap<u32, f64>,
}

impl SpectralCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from (wavelength, reflectance) pairs
    ///
    /// Later duplicates of a wavelength replace earlier ones.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Build a curve with a constant reflectance at every listed wavelength
    pub fn flat<I>(wavelengths: I, reflectance: f64) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self::from_points(wavelengths.into_iter().map(|nm| (nm, reflectance)))
    }

    pub fn insert(&mut self, wavelength: u32, reflectance: f64) {
        self.points.insert(wavelength, reflectance);
    }

    pub fn reflectance(&self, wavelength: u32) -> Option<f64> {
        self.points.get(&wavelength).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A curve needs at least two points to be integrated
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Points in ascending wavelength order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.points.iter().map(|(nm, r)| (*nm, *r))
    }
}

/// Identifies one weighting table: illuminant, observer and table number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeightingKey {
    /// Illuminant name, e.g. "D50"
    pub illuminant: String,
    /// Observer id, e.g. "2" or "10"
    pub observer: String,
    /// Table number (ASTM E308 numbering, e.g. 5 or 6)
    pub table: u32,
}

impl WeightingKey {
    pub fn new(illuminant: impl Into<String>, observer: impl Into<String>, table: u32) -> Self {
        Self {
            illuminant: illuminant.into(),
            observer: observer.into(),
            table,
        }
    }
}

impl std::fmt::Display for WeightingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}°/table {}", self.illuminant, self.observer, self.table)
    }
}

/// One wavelength entry of a weighting table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightingRow {
    pub illuminant: String,
    pub observer: String,
    pub table: u32,
    /// Wavelength in nm
    pub wavelength: u32,
    /// X weighting coefficient
    pub x: f64,
    /// Y weighting coefficient
    pub y: f64,
    /// Z weighting coefficient
    pub z: f64,
    /// Normalization constant as published with the table.
    /// Integration always rescales so the perfect diffuser has Y = 100
    /// over the measured wavelengths, so this is informational.
    #[serde(default)]
    pub normalization: f64,
}

impl WeightingRow {
    pub fn key(&self) -> WeightingKey {
        WeightingKey::new(self.illuminant.clone(), self.observer.clone(), self.table)
    }

    pub fn matches(&self, key: &WeightingKey) -> bool {
        self.table == key.table && self.illuminant == key.illuminant && self.observer == key.observer
    }
}

/// Loaded weighting tables grouped by key
///
/// Holding a `WeightingTables` value means the standards have been loaded;
/// code paths that run before loading completes receive `None` instead.
#[derive(Debug, Clone, Default)]
pub struct WeightingTables {
    tables: HashMap<WeightingKey, Vec<WeightingRow>>,
}

impl WeightingTables {
    /// Group a flat row list by key, keeping each table in wavelength order
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = WeightingRow>,
    {
        let mut tables: HashMap<WeightingKey, Vec<WeightingRow>> = HashMap::new();
        for row in rows {
            tables.entry(row.key()).or_default().push(row);
        }
        for rows in tables.values_mut() {
            rows.sort_by_key(|r| r.wavelength);
        }
        Self { tables }
    }

    /// Rows of one table, pre-filtered for conversion
    pub fn rows_for(&self, key: &WeightingKey) -> Option<&[WeightingRow]> {
        self.tables
            .get(key)
            .map(Vec::as_slice)
            .filter(|rows| !rows.is_empty())
    }

    pub fn contains(&self, key: &WeightingKey) -> bool {
        self.rows_for(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &WeightingKey> {
        self.tables.keys()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
