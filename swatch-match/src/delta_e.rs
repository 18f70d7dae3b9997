//! Color difference formulas
//!
//! Implements the five delta E variants of [`DeltaEMethod`]:
//! - dE76: Euclidean distance in L*a*b*
//! - dE94: chroma/hue weighted, constants kL = 2, K1 = 0.048, K2 = 0.014
//! - dE00: CIEDE2000 (CIE 142-2001), parametric factors kL = kC = kH = 1
//! - dE CMC(l:c): CMC ellipsoid with l:c = 1:1 or 2:1
//!
//! dE94 and CMC take their weighting from the first argument, which is the
//! reference (standard). Swapping the arguments changes the result.
//!
//! Thresholds (dE00):
//! - < 1.0: Imperceptible difference
//! - 1.0-2.0: Barely perceptible
//! - 2.0-10.0: Noticeable
//! - > 10.0: Very different

#![allow(clippy::many_single_char_names)]

use swatch_common::{DeltaEMethod, Error, LabColor, Result};

/// 25⁷, shared by the CIEDE2000 G and RC terms
const POW25_7: f64 = 6_103_515_625.0;

const DE94_KL: f64 = 2.0;
const DE94_K1: f64 = 0.048;
const DE94_K2: f64 = 0.014;

/// Compute the difference between a reference and a sample
///
/// Returns [`Error::InvalidInput`] if any component of either color is not
/// finite.
pub fn compute_delta_e(reference: &LabColor, sample: &LabColor, method: DeltaEMethod) -> Result<f64> {
    if !reference.is_finite() || !sample.is_finite() {
        return Err(Error::InvalidInput(format!(
            "non-finite Lab component: ({}, {}, {}) vs ({}, {}, {})",
            reference.l, reference.a, reference.b, sample.l, sample.a, sample.b
        )));
    }

    Ok(match method {
        DeltaEMethod::DE76 => delta_e76(reference, sample),
        DeltaEMethod::DE94 => delta_e94(reference, sample),
        DeltaEMethod::DE00 => ciede2000(reference, sample),
        DeltaEMethod::Cmc1_1 => delta_e_cmc(reference, sample, 1.0, 1.0),
        DeltaEMethod::Cmc2_1 => delta_e_cmc(reference, sample, 2.0, 1.0),
    })
}

/// CIE76 Delta E - Euclidean distance in Lab space
pub fn delta_e76(lab1: &LabColor, lab2: &LabColor) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Squared hue difference ΔH² = Δa² + Δb² − ΔC², clamped at zero
///
/// Rounding can push the expression slightly negative for near-neutral or
/// same-hue pairs.
fn delta_h_squared(lab1: &LabColor, lab2: &LabColor, delta_c: f64) -> f64 {
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (da * da + db * db - delta_c * delta_c).max(0.0)
}

/// CIE94 Delta E, weighted by the reference chroma
pub fn delta_e94(reference: &LabColor, sample: &LabColor) -> f64 {
    let c1 = reference.chroma();
    let c2 = sample.chroma();
    let delta_l = reference.l - sample.l;
    let delta_c = c1 - c2;
    let delta_h_sq = delta_h_squared(reference, sample, delta_c);

    let sc = 1.0 + DE94_K1 * c1;
    let sh = 1.0 + DE94_K2 * c1;

    let term_l = delta_l / DE94_KL;
    let term_c = delta_c / sc;

    (term_l * term_l + term_c * term_c + delta_h_sq / (sh * sh)).sqrt()
}

/// CMC l:c Delta E, weighted by the reference
pub fn delta_e_cmc(reference: &LabColor, sample: &LabColor, l: f64, c: f64) -> f64 {
    let l1 = reference.l;
    let c1 = reference.chroma();
    let c2 = sample.chroma();
    let h1 = reference.hue_degrees();

    let delta_l = l1 - sample.l;
    let delta_c = c1 - c2;
    let delta_h_sq = delta_h_squared(reference, sample, delta_c);

    let sl = if l1 < 16.0 {
        0.511
    } else {
        0.040975 * l1 / (1.0 + 0.01765 * l1)
    };
    let sc = 0.0638 * c1 / (1.0 + 0.0131 * c1) + 0.638;

    let c1_pow4 = c1.powi(4);
    let f = (c1_pow4 / (c1_pow4 + 1900.0)).sqrt();
    let t = if (164.0..=345.0).contains(&h1) {
        0.56 + (0.2 * (h1 + 168.0).to_radians().cos()).abs()
    } else {
        0.36 + (0.4 * (h1 + 35.0).to_radians().cos()).abs()
    };
    // For an achromatic reference F = 0 and SH = SC > 0
    let sh = sc * (f * t + 1.0 - f);

    let term_l = delta_l / (l * sl);
    let term_c = delta_c / (c * sc);

    (term_l * term_l + term_c * term_c + delta_h_sq / (sh * sh)).sqrt()
}

/// Hue angle in degrees for CIEDE2000 (0 for a' = b = 0)
fn hue_prime(a_prime: f64, b: f64) -> f64 {
    swatch_common::lab::hue_angle(a_prime, b)
}

/// CIEDE2000 color difference (ΔE00)
///
/// Full formula including the G rescale of a*, the hue-dependent T term, the
/// SL/SC/SH weighting functions and the RT rotation term for blues.
pub fn ciede2000(lab1: &LabColor, lab2: &LabColor) -> f64 {
    const KL: f64 = 1.0;
    const KC: f64 = 1.0;
    const KH: f64 = 1.0;

    let (l1, a1, b1) = (lab1.l, lab1.a, lab1.b);
    let (l2, a2, b2) = (lab2.l, lab2.a, lab2.b);

    // Mean chroma and G factor
    let c_ab_mean = (a1.hypot(b1) + a2.hypot(b2)) / 2.0;
    let c_ab_mean_pow7 = c_ab_mean.powi(7);
    let g = 0.5 * (1.0 - (c_ab_mean_pow7 / (c_ab_mean_pow7 + POW25_7)).sqrt());

    let a1_prime = a1 * (1.0 + g);
    let a2_prime = a2 * (1.0 + g);
    let c1_prime = a1_prime.hypot(b1);
    let c2_prime = a2_prime.hypot(b2);
    let h1_prime = hue_prime(a1_prime, b1);
    let h2_prime = hue_prime(a2_prime, b2);

    let chroma_product = c1_prime * c2_prime;

    let delta_l_prime = l2 - l1;
    let delta_c_prime = c2_prime - c1_prime;

    let delta_h_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let dh = h2_prime - h1_prime;
        if dh > 180.0 {
            dh - 360.0
        } else if dh < -180.0 {
            dh + 360.0
        } else {
            dh
        }
    };
    let delta_big_h_prime =
        2.0 * chroma_product.sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let l_prime_mean = (l1 + l2) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;

    let h_prime_mean = if chroma_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_prime_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_prime_mean).to_radians().cos()
        + 0.32 * (3.0 * h_prime_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_prime_mean - 63.0).to_radians().cos();

    let l_offset_sq = (l_prime_mean - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_offset_sq) / (20.0 + l_offset_sq).sqrt();
    let sc = 1.0 + 0.045 * c_prime_mean;
    let sh = 1.0 + 0.015 * c_prime_mean * t;

    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let c_prime_mean_pow7 = c_prime_mean.powi(7);
    let rc = 2.0 * (c_prime_mean_pow7 / (c_prime_mean_pow7 + POW25_7)).sqrt();
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let term_l = delta_l_prime / (KL * sl);
    let term_c = delta_c_prime / (KC * sc);
    let term_h = delta_big_h_prime / (KH * sh);

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h).sqrt()
}
