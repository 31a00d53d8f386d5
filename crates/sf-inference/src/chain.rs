//! Draw storage for a single chain and a multi-chain run.

use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};

/// Post-warmup draws of one chain, in constrained parameter space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// One parameter vector per kept iteration.
    pub draws: Vec<Vec<f64>>,
    /// Unnormalized log-posterior (including Jacobian) per kept iteration.
    pub log_posteriors: Vec<f64>,
    /// Acceptance rate over the sampling phase.
    pub accept_rate: f64,
    /// Global proposal scale after warmup adaptation.
    pub step_scale: f64,
}

impl Chain {
    /// Number of kept draws.
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Whether the chain holds no draws.
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// All draws of one parameter, in iteration order.
    pub fn param_draws(&self, idx: usize) -> Vec<f64> {
        self.draws.iter().map(|d| d[idx]).collect()
    }
}

/// The result of running one or more chains against a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerRun {
    /// Chains in seed order.
    pub chains: Vec<Chain>,
    /// Parameter names matching the draw layout.
    pub param_names: Vec<String>,
    /// Warmup iterations discarded per chain.
    pub n_warmup: usize,
    /// Kept iterations per chain.
    pub n_samples: usize,
}

impl SamplerRun {
    /// Total kept draws pooled over chains.
    pub fn total_draws(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }

    /// Index of a parameter by name.
    pub fn param_index(&self, name: &str) -> Result<usize> {
        self.param_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::Validation(format!("unknown parameter {:?}", name)))
    }

    /// All draws of one parameter pooled over chains.
    pub fn pooled_draws(&self, idx: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.total_draws());
        for chain in &self.chains {
            out.extend(chain.draws.iter().map(|d| d[idx]));
        }
        out
    }

    /// Posterior mean of one parameter over all chains.
    pub fn param_mean(&self, idx: usize) -> f64 {
        let pooled = self.pooled_draws(idx);
        if pooled.is_empty() {
            return f64::NAN;
        }
        pooled.iter().sum::<f64>() / pooled.len() as f64
    }

    /// Empirical quantile of one parameter over all chains.
    ///
    /// `q` in `[0, 1]`; uses the nearest-rank draw.
    pub fn param_quantile(&self, idx: usize, q: f64) -> f64 {
        let mut pooled = self.pooled_draws(idx);
        if pooled.is_empty() {
            return f64::NAN;
        }
        pooled.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let rank = ((pooled.len() - 1) as f64 * q.clamp(0.0, 1.0)).round() as usize;
        pooled[rank]
    }
}
