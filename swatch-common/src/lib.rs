//! # Swatch Common Library
//!
//! Shared code for the Swatch color matching crates including:
//! - Error type and result alias
//! - Lab / XYZ value types with provenance
//! - Spectral curves and weighting tables
//! - Catalog model (colors, measurements, corpus)
//! - Delta E method selection
//! - Configuration loading and tracing setup

pub mod catalog;
pub mod config;
pub mod error;
pub mod lab;
pub mod logging;
pub mod method;
pub mod spectral;

pub use catalog::{CandidateColor, Corpus, MeasurementMode, MeasurementRecord};
pub use error::{Error, Result};
pub use lab::{LabColor, LabSource, StoredLab, Tristimulus};
pub use method::DeltaEMethod;
pub use spectral::{SpectralCurve, WeightingKey, WeightingRow, WeightingTables};
