//! Color difference formula selection
//!
//! Provides the five delta E formulas understood by the matching engine,
//! with parsing from the loose spellings found in stored settings.

use serde::{Deserialize, Serialize};

/// Delta E formula
///
/// dE94 and dE CMC are directional: the first argument is the reference and
/// drives the chroma/hue weighting. dE76 and dE00 are symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaEMethod {
    /// CIE 1976: Euclidean distance in L*a*b*
    #[serde(rename = "dE76")]
    DE76,

    /// CIE 1994 with chroma/hue scaling from the reference
    #[serde(rename = "dE94")]
    DE94,

    /// CIEDE2000
    #[serde(rename = "dE00")]
    DE00,

    /// CMC l:c with l = 1, c = 1 (perceptibility)
    #[serde(rename = "dECMC1:1")]
    Cmc1_1,

    /// CMC l:c with l = 2, c = 1 (acceptability)
    #[serde(rename = "dECMC2:1")]
    Cmc2_1,
}

impl DeltaEMethod {
    /// Parse method from string (settings, query parameters)
    ///
    /// Case-insensitive. Accepts:
    /// - 'de76', 'cie76', '76'
    /// - 'de94', 'cie94', '94'
    /// - 'de00', 'de2000', 'ciede2000', '2000'
    /// - 'decmc1:1', 'cmc1:1', 'cmc' (maps to 1:1)
    /// - 'decmc2:1', 'cmc2:1'
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "de76" | "cie76" | "76" => Some(DeltaEMethod::DE76),
            "de94" | "cie94" | "94" => Some(DeltaEMethod::DE94),
            "de00" | "de2000" | "ciede2000" | "2000" => Some(DeltaEMethod::DE00),
            "decmc1:1" | "cmc1:1" | "cmc" => Some(DeltaEMethod::Cmc1_1),
            "decmc2:1" | "cmc2:1" => Some(DeltaEMethod::Cmc2_1),
            _ => None,
        }
    }

    /// Canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaEMethod::DE76 => "dE76",
            DeltaEMethod::DE94 => "dE94",
            DeltaEMethod::DE00 => "dE00",
            DeltaEMethod::Cmc1_1 => "dECMC1:1",
            DeltaEMethod::Cmc2_1 => "dECMC2:1",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DeltaEMethod::DE76 => "ΔE 1976",
            DeltaEMethod::DE94 => "ΔE 1994",
            DeltaEMethod::DE00 => "ΔE 2000",
            DeltaEMethod::Cmc1_1 => "ΔE CMC (1:1)",
            DeltaEMethod::Cmc2_1 => "ΔE CMC (2:1)",
        }
    }

    /// Whether swapping the arguments can change the result
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            DeltaEMethod::DE94 | DeltaEMethod::Cmc1_1 | DeltaEMethod::Cmc2_1
        )
    }

    /// Get all available methods
    ///
    /// Useful for UI dropdowns and validation
    pub fn all_variants() -> &'static [DeltaEMethod] {
        &[
            DeltaEMethod::DE76,
            DeltaEMethod::DE94,
            DeltaEMethod::DE00,
            DeltaEMethod::Cmc1_1,
            DeltaEMethod::Cmc2_1,
        ]
    }
}

impl Default for DeltaEMethod {
    /// CIEDE2000 is the default for print matching
    fn default() -> Self {
        DeltaEMethod::DE00
    }
}

impl std::fmt::Display for DeltaEMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
