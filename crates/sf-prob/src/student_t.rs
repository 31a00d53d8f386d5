//! Student-t distribution utilities.
//!
//! The heavy-tailed noise family used by the observation likelihood: robust
//! against single-day reporting glitches that would dominate a Gaussian fit.

use sf_core::{Error, Result};
use statrs::function::gamma::ln_gamma;

/// Natural log of π.
const LN_PI: f64 = 1.144_729_885_849_400_2;

/// Log-PDF of a Student-t with `dof` degrees of freedom, location `loc`,
/// and scale `scale`, evaluated at `x`.
pub fn logpdf(x: f64, loc: f64, scale: f64, dof: f64) -> Result<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::Validation(format!("scale must be finite and > 0, got {}", scale)));
    }
    if !dof.is_finite() || dof <= 0.0 {
        return Err(Error::Validation(format!("dof must be finite and > 0, got {}", dof)));
    }

    let z = (x - loc) / scale;
    let half = 0.5 * (dof + 1.0);
    let norm = ln_gamma(half) - ln_gamma(0.5 * dof) - 0.5 * (dof.ln() + LN_PI) - scale.ln();
    Ok(norm - half * (z * z / dof).ln_1p())
}
