//! Beta distribution utilities.
//!
//! Prior family for parameters constrained to `(0, 1)`, such as the weekday
//! reporting-bias amplitude.

use sf_core::{Error, Result};
use statrs::function::gamma::ln_gamma;

#[inline]
fn ln_beta_fn(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Log-PDF of `Beta(a, b)` at `x`.
///
/// Support is `0 <= x <= 1`; outside the support the log-density is `-inf`.
/// Boundary values with shape parameters below 1 diverge to `+inf`, which is
/// mathematically correct and harmless for bounded parameterizations that
/// never land exactly on the boundary.
pub fn logpdf(x: f64, a: f64, b: f64) -> Result<f64> {
    if !a.is_finite() || a <= 0.0 {
        return Err(Error::Validation(format!("a must be finite and > 0, got {}", a)));
    }
    if !b.is_finite() || b <= 0.0 {
        return Err(Error::Validation(format!("b must be finite and > 0, got {}", b)));
    }
    if !(0.0..=1.0).contains(&x) {
        return Ok(f64::NEG_INFINITY);
    }

    let ln_norm = -ln_beta_fn(a, b);
    if x == 0.0 {
        return Ok(match a.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Greater) => f64::NEG_INFINITY,
            _ => ln_norm,
        });
    }
    if x == 1.0 {
        return Ok(match b.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Greater) => f64::NEG_INFINITY,
            _ => ln_norm,
        });
    }

    Ok(ln_norm + (a - 1.0) * x.ln() + (b - 1.0) * (1.0 - x).ln())
}
