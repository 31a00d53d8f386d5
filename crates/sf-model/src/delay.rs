//! Reporting delay: discretized log-normal kernel and causal convolution.

use sf_core::{Error, Result};
use sf_prob::lognormal;

/// Discretize a log-normal delay distribution onto whole days.
///
/// Mass at lag `k` is `CDF(k + 0.5) - CDF(k - 0.5)` (lag 0 takes everything
/// below half a day). The kernel is truncated once the remaining tail mass
/// drops below `tail_mass`, capped at `max_len` entries, then renormalized
/// to sum to one so truncation never loses reported cases.
///
/// Fails only when the retained mass is numerically zero, which means the
/// delay parameters put essentially all mass beyond `max_len` days.
pub fn kernel(median: f64, width: f64, max_len: usize, tail_mass: f64) -> Result<Vec<f64>> {
    if !(median.is_finite() && median > 0.0) || !(width.is_finite() && width > 0.0) {
        return Err(Error::Computation(format!(
            "delay kernel parameters out of domain: median={}, width={}",
            median, width
        )));
    }
    if max_len == 0 {
        return Err(Error::Computation("delay kernel needs at least one lag".into()));
    }

    let log_median = median.ln();
    let mut weights = Vec::with_capacity(max_len.min(64));
    let mut cdf_lo = 0.0;
    for k in 0..max_len {
        let cdf_hi = lognormal::cdf(k as f64 + 0.5, log_median, width)?;
        weights.push((cdf_hi - cdf_lo).max(0.0));
        cdf_lo = cdf_hi;
        if 1.0 - cdf_hi < tail_mass {
            break;
        }
    }

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 1e-12) {
        return Err(Error::Computation(format!(
            "delay kernel mass vanished within {} days (median={}, width={})",
            max_len, median, width
        )));
    }
    for w in &mut weights {
        *w /= total;
    }
    Ok(weights)
}

/// Causal convolution of daily new infections with a delay kernel.
///
/// `out[t] = sum_{k <= t} kernel[k] * new_infections[t - k]`; no output day
/// ever reads infections from its own future.
pub fn convolve(new_infections: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = new_infections.len();
    let mut out = vec![0.0; n];
    for (t, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, &w) in kernel.iter().enumerate().take(t + 1) {
            acc += w * new_infections[t - k];
        }
        *o = acc;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_sums_to_one() {
        for (median, width) in [(3.0, 0.3), (8.0, 0.5), (1.0, 0.1)] {
            let k = kernel(median, width, 64, 1e-4).unwrap();
            let total: f64 = k.iter().sum();
            assert!(
                (total - 1.0).abs() < 1e-12,
                "kernel mass {} for median={}, width={}",
                total,
                median,
                width
            );
            assert!(k.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_kernel_mode_near_median() {
        let k = kernel(3.0, 0.2, 64, 1e-4).unwrap();
        let argmax = k
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(argmax, 3, "mode should sit at the median lag");
    }

    #[test]
    fn test_kernel_respects_max_len() {
        let k = kernel(3.0, 0.3, 5, 1e-4).unwrap();
        assert!(k.len() <= 5);
        let total: f64 = k.iter().sum();
        assert!((total - 1.0).abs() < 1e-12, "still renormalized after capping");
    }

    #[test]
    fn test_kernel_rejects_bad_parameters() {
        assert!(kernel(0.0, 0.3, 64, 1e-4).is_err());
        assert!(kernel(3.0, -0.1, 64, 1e-4).is_err());
        assert!(kernel(f64::NAN, 0.3, 64, 1e-4).is_err());
    }

    #[test]
    fn test_degenerate_kernel_is_identity() {
        // A vanishingly small median puts all mass at lag 0.
        let k = kernel(1e-6, 0.3, 64, 1e-4).unwrap();
        assert_eq!(k.len(), 1);
        assert!((k[0] - 1.0).abs() < 1e-12);
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let out = convolve(&signal, &k);
        for (a, b) in signal.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_convolution_is_causal() {
        // An impulse at day 5 must produce no output before day 5.
        let mut signal = vec![0.0; 20];
        signal[5] = 100.0;
        let k = kernel(3.0, 0.3, 64, 1e-4).unwrap();
        let out = convolve(&signal, &k);
        for (t, &v) in out.iter().enumerate().take(5) {
            assert_eq!(v, 0.0, "non-causal leakage at day {}", t);
        }
        let total: f64 = out.iter().sum();
        assert!(total <= 100.0 + 1e-9);
    }

    #[test]
    fn test_convolution_preserves_mass_in_steady_state() {
        let signal = vec![10.0; 60];
        let k = kernel(3.0, 0.3, 64, 1e-4).unwrap();
        let out = convolve(&signal, &k);
        // Once the kernel support has filled, output equals input.
        assert!((out[40] - 10.0).abs() < 1e-9);
    }
}
