//! # Swatch Matching Engine
//!
//! Colorimetric computation and similarity search for color standards:
//! - [`convert`] - spectral reflectance to CIELAB (weighted-ordinate method)
//! - [`delta_e`] - dE76, dE94, dE00 and dE CMC color differences
//! - [`resolve`] - layered Lab resolution (spectral, measurement, stored)
//! - [`search`] - cached similarity search over a corpus
//! - [`tags`] - ancestor/descendant checks over tag selections
//! - [`tolerance`] - pass/fail verdicts against a standard
//!
//! All inputs are passed in fully loaded; nothing here performs I/O.

pub mod convert;
pub mod delta_e;
pub mod resolve;
pub mod search;
pub mod tags;
pub mod tolerance;

pub use convert::{convert_spectral_to_lab, integrate_tristimulus, xyz_to_lab, Integration};
pub use delta_e::compute_delta_e;
pub use resolve::{Resolution, ResolutionChain, ResolutionStep, ResolveContext};
pub use search::{
    find_similar_colors, RunId, SearchControls, SearchOutcome, SimilarityResult, SimilaritySearch,
};
pub use tags::{validate_tag_selection, TagConflict, TagHierarchy, TagId, TagSelection};
pub use tolerance::{evaluate_tolerance, DeltaECategory, ToleranceVerdict};
