//! Student-t observation model over the observed data range.

use serde::{Deserialize, Serialize};
use sf_prob::student_t;

/// Hyperparameters of the observation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikelihoodConfig {
    /// Degrees of freedom of the Student-t.
    pub dof: f64,
    /// Scale of the half-Cauchy prior on `sigma_obs`.
    pub sigma_obs_prior_scale: f64,
    /// Offset inside the sqrt so the scale never collapses at zero cases.
    pub sigma_offset: f64,
}

impl Default for LikelihoodConfig {
    fn default() -> Self {
        Self { dof: 4.0, sigma_obs_prior_scale: 30.0, sigma_offset: 1.0 }
    }
}

/// Log-likelihood of observed counts given expected cases.
///
/// Each observed day contributes a Student-t term with location
/// `expected[t]` and scale `sigma_obs * sqrt(expected[t] + sigma_offset)`,
/// so the noise grows with the count level like an overdispersed Poisson.
/// Only the first `observed.len()` entries of `expected` are scored;
/// forecast days carry no likelihood.
///
/// Any non-positive or non-finite expected value inside the observed range
/// means the parameters drove the simulation out of its domain. That draw
/// gets log-likelihood `-inf` rather than an error, so the sampler simply
/// rejects it.
pub fn log_likelihood(
    observed: &[f64],
    expected: &[f64],
    sigma_obs: f64,
    config: &LikelihoodConfig,
) -> f64 {
    if !(sigma_obs.is_finite() && sigma_obs > 0.0) {
        return f64::NEG_INFINITY;
    }
    let mut total = 0.0;
    for (&y, &mu) in observed.iter().zip(expected.iter()) {
        if !mu.is_finite() || mu <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let scale = sigma_obs * (mu + config.sigma_offset).sqrt();
        let lp = match student_t::logpdf(y, mu, scale, config.dof) {
            Ok(v) => v,
            Err(_) => return f64::NEG_INFINITY,
        };
        if !lp.is_finite() {
            return f64::NEG_INFINITY;
        }
        total += lp;
    }
    total
}
