//! Normal distribution utilities.

use sf_core::{Error, Result};

/// `ln(sqrt(2π))`, precomputed.
pub(crate) const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Log-PDF of `N(mu, sigma)` at `x`.
pub fn logpdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::Validation(format!("sigma must be finite and > 0, got {}", sigma)));
    }
    let z = (x - mu) / sigma;
    Ok(-0.5 * z * z - sigma.ln() - LN_SQRT_2PI)
}
