//! Adaptive random-walk Metropolis in unconstrained space.
//!
//! Bounded parameters are mapped to all of `R^n` through the bijectors in
//! [`sf_prob::transforms`], so proposals never leave the support and the
//! target density picks up the usual Jacobian correction. Warmup adapts a
//! global step scale toward a target acceptance rate and estimates
//! per-parameter proposal scales from the chain's own variance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sf_core::traits::LogDensityModel;
use sf_core::{Error, Result};
use sf_prob::transforms::ParameterTransform;

use crate::chain::{Chain, SamplerRun};

/// Tuning knobs of the Metropolis engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetropolisConfig {
    /// Acceptance rate warmup steers toward. Around 0.3 is standard for
    /// low-to-moderate dimension random walks.
    pub target_accept: f64,
    /// Standard deviation of the unconstrained jitter applied to the
    /// model's default start, so chains start from distinct points.
    pub init_jitter: f64,
    /// Global step scale before adaptation.
    pub initial_step_scale: f64,
}

impl Default for MetropolisConfig {
    fn default() -> Self {
        Self { target_accept: 0.3, init_jitter: 0.1, initial_step_scale: 0.1 }
    }
}

struct Target<'a> {
    model: &'a dyn LogDensityModel,
    transform: ParameterTransform,
}

impl<'a> Target<'a> {
    fn new(model: &'a dyn LogDensityModel) -> Self {
        let transform = ParameterTransform::from_bounds(&model.parameter_bounds());
        Self { model, transform }
    }

    /// Unnormalized log-posterior in unconstrained space.
    fn log_post(&self, z: &[f64]) -> Result<f64> {
        let theta = self.transform.forward(z);
        let nll = self.model.nll(&theta)?;
        if !nll.is_finite() {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(-nll + self.transform.log_abs_det_jacobian(z))
    }
}

/// Running variance per dimension (Welford).
struct RunningVariance {
    n: usize,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl RunningVariance {
    fn new(dim: usize) -> Self {
        Self { n: 0, mean: vec![0.0; dim], m2: vec![0.0; dim] }
    }

    fn push(&mut self, z: &[f64]) {
        self.n += 1;
        for i in 0..z.len() {
            let delta = z[i] - self.mean[i];
            self.mean[i] += delta / self.n as f64;
            self.m2[i] += delta * (z[i] - self.mean[i]);
        }
    }

    fn variance(&self) -> Option<Vec<f64>> {
        if self.n < 2 {
            return None;
        }
        Some(self.m2.iter().map(|&m| (m / (self.n - 1) as f64).max(1e-8)).collect())
    }
}

/// Run one chain: `n_warmup` adaptation iterations, then `n_samples` kept
/// draws. Deterministic for a fixed seed.
pub fn sample_chain(
    model: &dyn LogDensityModel,
    n_warmup: usize,
    n_samples: usize,
    seed: u64,
    config: &MetropolisConfig,
) -> Result<Chain> {
    if n_samples == 0 {
        return Err(Error::Validation("n_samples must be >= 1".into()));
    }
    let dim = model.dim();
    if dim == 0 {
        return Err(Error::Validation("model has no parameters".into()));
    }

    let target = Target::new(model);
    let mut rng = StdRng::seed_from_u64(seed);
    let unit = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("proposal distribution: {}", e)))?;

    // Start at the model's default, jittered so parallel chains differ. If
    // the jittered point has zero posterior mass, fall back to the default.
    let z_init = target.transform.inverse(&model.parameter_init());
    let mut z: Vec<f64> =
        z_init.iter().map(|&v| v + config.init_jitter * unit.sample(&mut rng)).collect();
    let mut lp = target.log_post(&z)?;
    if !lp.is_finite() {
        z = z_init;
        lp = target.log_post(&z)?;
    }
    if !lp.is_finite() {
        return Err(Error::Computation(
            "log-posterior is not finite at the initial point".into(),
        ));
    }

    let mut log_step = config.initial_step_scale.ln();
    let mut scale: Vec<f64> = vec![1.0; dim];
    let mut welford = RunningVariance::new(dim);

    let mut draws = Vec::with_capacity(n_samples);
    let mut log_posteriors = Vec::with_capacity(n_samples);
    let mut accepted_sampling = 0usize;

    let mut z_prop = vec![0.0; dim];
    for iter in 0..(n_warmup + n_samples) {
        let warming = iter < n_warmup;
        let step = log_step.exp();
        for i in 0..dim {
            z_prop[i] = z[i] + step * scale[i].sqrt() * unit.sample(&mut rng);
        }
        let lp_prop = target.log_post(&z_prop)?;
        let log_alpha = lp_prop - lp;
        let accept_prob = if log_alpha >= 0.0 { 1.0 } else { log_alpha.exp() };
        if rng.gen::<f64>() < accept_prob {
            z.copy_from_slice(&z_prop);
            lp = lp_prop;
            if !warming {
                accepted_sampling += 1;
            }
        }

        if warming {
            // Robbins-Monro on the log step scale.
            let eta = ((iter + 1) as f64).powf(-0.7);
            log_step += eta * (accept_prob - config.target_accept);

            // Second quarter of warmup feeds the per-parameter scales,
            // applied for the rest of warmup and all of sampling.
            if iter >= n_warmup / 4 {
                welford.push(&z);
            }
            if iter == 3 * n_warmup / 4 {
                if let Some(var) = welford.variance() {
                    scale = var;
                }
            }
        } else {
            draws.push(target.transform.forward(&z));
            log_posteriors.push(lp);
        }
    }

    Ok(Chain {
        draws,
        log_posteriors,
        accept_rate: accepted_sampling as f64 / n_samples as f64,
        step_scale: log_step.exp(),
    })
}

/// Run several chains in parallel, one rayon task each.
///
/// Chain `c` uses seed `seed + c`, so a run is reproducible and chains are
/// decorrelated at the RNG level.
pub fn sample_chains(
    model: &dyn LogDensityModel,
    n_chains: usize,
    n_warmup: usize,
    n_samples: usize,
    seed: u64,
    config: &MetropolisConfig,
) -> Result<SamplerRun> {
    if n_chains == 0 {
        return Err(Error::Validation("n_chains must be >= 1".into()));
    }
    let chains: Result<Vec<Chain>> = (0..n_chains)
        .into_par_iter()
        .map(|c| sample_chain(model, n_warmup, n_samples, seed.wrapping_add(c as u64), config))
        .collect();
    Ok(SamplerRun {
        chains: chains?,
        param_names: model.parameter_names(),
        n_warmup,
        n_samples,
    })
}
