//! Convergence diagnostics: split R-hat and effective sample size.

use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};

use crate::chain::SamplerRun;

/// Per-parameter convergence summary of a multi-chain run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Parameter names, matching the vectors below.
    pub param_names: Vec<String>,
    /// Split potential scale reduction factor per parameter.
    pub r_hat: Vec<f64>,
    /// Effective sample size per parameter.
    pub ess: Vec<f64>,
    /// Mean acceptance rate over chains.
    pub mean_accept: f64,
}

impl DiagnosticsReport {
    /// Worst (largest) R-hat across parameters.
    pub fn max_r_hat(&self) -> f64 {
        self.r_hat.iter().copied().fold(f64::NAN, f64::max)
    }

    /// Worst (smallest) ESS across parameters.
    pub fn min_ess(&self) -> f64 {
        self.ess.iter().copied().fold(f64::NAN, f64::min)
    }
}

/// Split each chain in half; halves that drift apart inflate R-hat even in
/// a single-chain run.
fn split(chains: &[Vec<f64>]) -> Vec<&[f64]> {
    let mut halves = Vec::with_capacity(2 * chains.len());
    for c in chains {
        let mid = c.len() / 2;
        halves.push(&c[..mid]);
        halves.push(&c[mid..]);
    }
    halves
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sample_variance(xs: &[f64], m: f64) -> f64 {
    xs.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64
}

/// Split R-hat over one parameter's per-chain draws.
///
/// Values near 1 indicate the chains agree; above about 1.05 the run has
/// not mixed. Degenerate input (too few draws, zero variance) gives NaN.
pub fn r_hat(chains: &[Vec<f64>]) -> f64 {
    let halves = split(chains);
    let m = halves.len();
    if m < 2 || halves.iter().any(|h| h.len() < 2) {
        return f64::NAN;
    }
    let n = halves.iter().map(|h| h.len()).min().unwrap_or(0);
    let halves: Vec<&[f64]> = halves.iter().map(|h| &h[..n]).collect();

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let vars: Vec<f64> = halves.iter().zip(&means).map(|(h, &mu)| sample_variance(h, mu)).collect();

    let grand = mean(&means);
    let b = n as f64 / (m - 1) as f64
        * means.iter().map(|&mu| (mu - grand) * (mu - grand)).sum::<f64>();
    let w = mean(&vars);
    if w <= 0.0 {
        return f64::NAN;
    }
    let var_plus = (n - 1) as f64 / n as f64 * w + b / n as f64;
    (var_plus / w).sqrt()
}

/// Effective sample size over one parameter's per-chain draws.
///
/// Uses the mean per-chain autocorrelation with Geyer's initial monotone
/// positive sequence to decide where to truncate the sum.
pub fn ess(chains: &[Vec<f64>]) -> f64 {
    let halves = split(chains);
    let m = halves.len();
    let n = halves.iter().map(|h| h.len()).min().unwrap_or(0);
    if m < 1 || n < 4 {
        return f64::NAN;
    }
    let halves: Vec<&[f64]> = halves.iter().map(|h| &h[..n]).collect();

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let vars: Vec<f64> = halves.iter().zip(&means).map(|(h, &mu)| sample_variance(h, mu)).collect();
    let w = mean(&vars);
    let grand = mean(&means);
    let b_over_n = if m > 1 {
        means.iter().map(|&mu| (mu - grand) * (mu - grand)).sum::<f64>() / (m - 1) as f64
    } else {
        0.0
    };
    let var_plus = (n - 1) as f64 / n as f64 * w + b_over_n;
    if var_plus <= 0.0 {
        return f64::NAN;
    }

    // Mean autocovariance across chains at each lag.
    let acov = |lag: usize| -> f64 {
        let per_chain: f64 = halves
            .iter()
            .zip(&means)
            .map(|(h, &mu)| {
                (0..n - lag).map(|t| (h[t] - mu) * (h[t + lag] - mu)).sum::<f64>() / n as f64
            })
            .sum();
        per_chain / m as f64
    };

    // Sum paired autocorrelations while the pairs stay positive and
    // non-increasing.
    let mut tau = 1.0;
    let mut prev_pair = f64::INFINITY;
    let mut lag = 1;
    while lag + 1 < n {
        let rho_a = 1.0 - (w - acov(lag)) / var_plus;
        let rho_b = 1.0 - (w - acov(lag + 1)) / var_plus;
        let pair = rho_a + rho_b;
        if pair <= 0.0 {
            break;
        }
        tau += 2.0 * pair.min(prev_pair);
        prev_pair = pair;
        lag += 2;
    }

    ((m * n) as f64 / tau).max(0.0)
}

/// Compute the full diagnostics report for a run.
pub fn summarize(run: &SamplerRun) -> Result<DiagnosticsReport> {
    if run.chains.is_empty() || run.chains.iter().any(|c| c.is_empty()) {
        return Err(Error::Validation("diagnostics need at least one non-empty chain".into()));
    }
    let dim = run.param_names.len();
    let mut r_hats = Vec::with_capacity(dim);
    let mut esses = Vec::with_capacity(dim);
    for idx in 0..dim {
        let per_chain: Vec<Vec<f64>> = run.chains.iter().map(|c| c.param_draws(idx)).collect();
        r_hats.push(r_hat(&per_chain));
        esses.push(ess(&per_chain));
    }
    let mean_accept =
        run.chains.iter().map(|c| c.accept_rate).sum::<f64>() / run.chains.len() as f64;
    Ok(DiagnosticsReport { param_names: run.param_names.clone(), r_hat: r_hats, ess: esses, mean_accept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn iid_chains(n_chains: usize, n: usize, mu: f64, seed_base: u64) -> Vec<Vec<f64>> {
        let dist = Normal::new(mu, 1.0).unwrap();
        (0..n_chains)
            .map(|c| {
                let mut rng = StdRng::seed_from_u64(seed_base + c as u64);
                (0..n).map(|_| dist.sample(&mut rng)).collect()
            })
            .collect()
    }

    #[test]
    fn test_r_hat_near_one_for_iid_chains() {
        let chains = iid_chains(4, 2000, 0.0, 10);
        let r = r_hat(&chains);
        assert!((r - 1.0).abs() < 0.02, "R-hat for iid draws: {}", r);
    }

    #[test]
    fn test_r_hat_detects_disagreeing_chains() {
        let mut chains = iid_chains(2, 1000, 0.0, 20);
        for v in &mut chains[1] {
            *v += 5.0;
        }
        let r = r_hat(&chains);
        assert!(r > 1.5, "offset chains should blow up R-hat, got {}", r);
    }

    #[test]
    fn test_r_hat_detects_drift_within_one_chain() {
        // A strong trend makes the two halves disagree.
        let drifting: Vec<f64> = (0..2000).map(|t| t as f64 / 100.0).collect();
        let r = r_hat(&[drifting]);
        assert!(r > 1.5, "drifting chain should fail split R-hat, got {}", r);
    }

    #[test]
    fn test_ess_close_to_draw_count_for_iid() {
        let chains = iid_chains(2, 2000, 0.0, 30);
        let e = ess(&chains);
        assert!(e > 2500.0, "iid ESS should approach 4000, got {}", e);
        assert!(e <= 4500.0, "ESS cannot wildly exceed the draw count, got {}", e);
    }

    #[test]
    fn test_ess_small_for_sticky_chain() {
        // AR(1) with coefficient 0.99 barely moves.
        let mut rng = StdRng::seed_from_u64(40);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let mut x = 0.0;
        let sticky: Vec<f64> = (0..2000)
            .map(|_| {
                x = 0.99 * x + 0.1 * noise.sample(&mut rng);
                x
            })
            .collect();
        let e = ess(&[sticky]);
        assert!(e < 200.0, "sticky chain ESS should be tiny, got {}", e);
    }

    #[test]
    fn test_degenerate_inputs_give_nan() {
        assert!(r_hat(&[vec![1.0, 1.0, 1.0, 1.0]]).is_nan(), "zero variance");
        assert!(r_hat(&[vec![1.0]]).is_nan(), "too short");
        assert!(ess(&[vec![1.0, 2.0]]).is_nan(), "too short for autocorrelation");
    }
}
