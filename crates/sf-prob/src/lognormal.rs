//! Log-normal distribution utilities.
//!
//! Parameterized by the log-scale location `log_median` (the log of the
//! distribution's median) and the log-scale standard deviation `sigma`.
//! This is the family used for positive epidemic parameters (rates, delays,
//! transition lengths) and for the reporting-delay kernel.

use crate::normal::LN_SQRT_2PI;
use sf_core::{Error, Result};
use statrs::function::erf::erf;

const SQRT_2: f64 = std::f64::consts::SQRT_2;

fn check_sigma(sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::Validation(format!("sigma must be finite and > 0, got {}", sigma)));
    }
    Ok(())
}

/// Log-PDF of `LogNormal(log_median, sigma)` at `x`.
///
/// Support is `x > 0`; outside the support the log-density is `-inf`.
pub fn logpdf(x: f64, log_median: f64, sigma: f64) -> Result<f64> {
    check_sigma(sigma)?;
    if !x.is_finite() || x <= 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    let z = (x.ln() - log_median) / sigma;
    Ok(-0.5 * z * z - x.ln() - sigma.ln() - LN_SQRT_2PI)
}

/// CDF of `LogNormal(log_median, sigma)` at `x`.
///
/// Used to discretize the reporting-delay kernel; `x <= 0` maps to 0.
pub fn cdf(x: f64, log_median: f64, sigma: f64) -> Result<f64> {
    check_sigma(sigma)?;
    if x <= 0.0 {
        return Ok(0.0);
    }
    let z = (x.ln() - log_median) / sigma;
    Ok(0.5 * (1.0 + erf(z / SQRT_2)))
}
