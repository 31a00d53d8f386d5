//! Time-varying log spreading rate built from sigmoid transitions.
//!
//! Each change point contributes a smooth step in log space; the steps
//! compose additively, so a later transition moves the rate relative to
//! wherever the previous one left it.

use sf_prob::math::sigmoid;

/// One realized transition, in grid coordinates.
///
/// `center_day` is a (possibly fractional) grid index; `length_days` is the
/// 1%-to-99% width of the sigmoid step.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    /// Log spreading rate the step lands on.
    pub new_log_rate: f64,
    /// Grid day at which the step is halfway done.
    pub center_day: f64,
    /// Transition duration in days.
    pub length_days: f64,
}

/// Floor for transition lengths so the sigmoid slope stays finite.
const MIN_LENGTH_DAYS: f64 = 1e-3;

/// Clamp range for the composed log rate. exp of the upper bound is still
/// far beyond any epidemiologically plausible daily rate.
const LOG_RATE_MIN: f64 = -20.0;
const LOG_RATE_MAX: f64 = 10.0;

/// Compose the daily log spreading rate over the whole simulation grid.
///
/// Starting from `baseline_log_rate`, each transition adds
/// `(lambda_new - lambda_prev) * sigmoid(4 (t - center) / length)` on the
/// log scale, where `lambda_prev` is the previous transition's landing
/// rate (the baseline for the first). A transition centered outside the
/// grid still contributes its partial step.
pub fn log_rate_series(
    total_len: usize,
    baseline_log_rate: f64,
    transitions: &[Transition],
) -> Vec<f64> {
    let mut series = vec![baseline_log_rate; total_len];
    let mut prev_log_rate = baseline_log_rate;
    for tr in transitions {
        let delta = tr.new_log_rate - prev_log_rate;
        let slope = 4.0 / tr.length_days.max(MIN_LENGTH_DAYS);
        for (t, v) in series.iter_mut().enumerate() {
            *v += delta * sigmoid(slope * (t as f64 - tr.center_day));
        }
        prev_log_rate = tr.new_log_rate;
    }
    for v in &mut series {
        *v = v.clamp(LOG_RATE_MIN, LOG_RATE_MAX);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_transitions_is_flat() {
        let s = log_rate_series(10, 0.4f64.ln(), &[]);
        assert_eq!(s.len(), 10);
        for &v in &s {
            assert!((v - 0.4f64.ln()).abs() < 1e-15);
        }
    }

    #[test]
    fn test_single_downward_step_is_monotone() {
        let tr = Transition { new_log_rate: 0.1f64.ln(), center_day: 20.0, length_days: 4.0 };
        let s = log_rate_series(40, 0.4f64.ln(), &[tr]);
        for w in s.windows(2) {
            assert!(w[1] <= w[0] + 1e-12, "series must decrease monotonically");
        }
        // Far before the center the rate is the baseline; far after, the target.
        assert!((s[0] - 0.4f64.ln()).abs() < 1e-6);
        assert!((s[39] - 0.1f64.ln()).abs() < 1e-6);
        // Halfway at the center day.
        let mid = 0.5 * (0.4f64.ln() + 0.1f64.ln());
        assert!((s[20] - mid).abs() < 1e-9);
    }

    #[test]
    fn test_sequential_composition_lands_on_last_rate() {
        let a = Transition { new_log_rate: 0.2f64.ln(), center_day: 10.0, length_days: 2.0 };
        let b = Transition { new_log_rate: 0.05f64.ln(), center_day: 30.0, length_days: 2.0 };
        let s = log_rate_series(60, 0.4f64.ln(), &[a, b]);
        assert!((s[20] - 0.2f64.ln()).abs() < 1e-6, "plateau between steps");
        assert!((s[59] - 0.05f64.ln()).abs() < 1e-6, "final plateau");
    }

    #[test]
    fn test_tiny_length_acts_as_hard_step() {
        let tr = Transition { new_log_rate: 0.1f64.ln(), center_day: 5.0, length_days: 0.0 };
        let s = log_rate_series(12, 0.4f64.ln(), &[tr]);
        assert!((s[4] - 0.4f64.ln()).abs() < 1e-9);
        assert!((s[6] - 0.1f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_rates_are_clamped() {
        let tr = Transition { new_log_rate: 50.0, center_day: 2.0, length_days: 1.0 };
        let s = log_rate_series(10, -60.0, &[tr]);
        for &v in &s {
            assert!((LOG_RATE_MIN..=LOG_RATE_MAX).contains(&v), "clamped, got {}", v);
        }
    }
}
