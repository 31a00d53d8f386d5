//! Half-Cauchy distribution utilities.
//!
//! Weakly-informative prior for positive scale parameters (initial infection
//! count, observation-noise scale): most mass near zero, tail heavy enough
//! to let the data pull the parameter far up if needed.

use sf_core::{Error, Result};

/// `ln(2/π)`, precomputed.
const LN_2_OVER_PI: f64 = -0.451_582_705_289_454_9;

/// Log-PDF of `HalfCauchy(scale)` at `x`.
///
/// Support is `x >= 0`; negative `x` yields `-inf`.
pub fn logpdf(x: f64, scale: f64) -> Result<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::Validation(format!("scale must be finite and > 0, got {}", scale)));
    }
    if !x.is_finite() || x < 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    let z = x / scale;
    Ok(LN_2_OVER_PI - scale.ln() - (z * z).ln_1p())
}
