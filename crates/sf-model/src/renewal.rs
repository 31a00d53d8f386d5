//! SIR-style renewal recursion with susceptible depletion.

use sf_prob::math::exp_clamped;

/// Run the discrete daily recursion over the whole simulation grid.
///
/// For each day `t >= 1`:
///
/// ```text
/// new_I[t] = exp(log_rate[t]) * I[t-1] * S[t-1] / N
/// S[t]     = max(S[t-1] - new_I[t], 0)
/// I[t]     = max(I[t-1] + new_I[t] - mu * I[t-1], 0)
/// ```
///
/// Day 0 carries the initial condition: `new_I[0] = 0`, `I[0] = i_begin`
/// (clamped to `[0, n_population]`). Returns `(new_infections,
/// active_infections)`, both of length `log_rate.len()`. All outputs are
/// non-negative by construction.
pub fn simulate(
    log_rate: &[f64],
    recovery_rate: f64,
    i_begin: f64,
    n_population: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = log_rate.len();
    let mut new_i = vec![0.0; n];
    let mut active = vec![0.0; n];
    if n == 0 {
        return (new_i, active);
    }

    let i0 = i_begin.clamp(0.0, n_population);
    active[0] = i0;
    let mut s = (n_population - i0).max(0.0);

    for t in 1..n {
        let prev = active[t - 1];
        let infections = exp_clamped(log_rate[t]) * prev * (s / n_population);
        s = (s - infections).max(0.0);
        new_i[t] = infections;
        active[t] = (prev + infections - recovery_rate * prev).max(0.0);
    }
    (new_i, active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_stay_nonnegative() {
        // Aggressive recovery and a huge rate must not push anything below 0.
        let log_rate = vec![2.0; 50];
        let (new_i, active) = simulate(&log_rate, 1.5, 100.0, 1e6);
        for t in 0..50 {
            assert!(new_i[t] >= 0.0, "new_I[{}] = {}", t, new_i[t]);
            assert!(active[t] >= 0.0, "I[{}] = {}", t, active[t]);
        }
    }

    #[test]
    fn test_growth_phase_is_exponential() {
        // With S/N ~ 1 and lambda > mu the pool grows by about
        // (1 + lambda - mu) per day.
        let lambda: f64 = 0.4;
        let mu = 0.125;
        let log_rate = vec![lambda.ln(); 20];
        let (_, active) = simulate(&log_rate, mu, 10.0, 1e12);
        let factor = 1.0 + lambda - mu;
        for t in 1..20 {
            let ratio = active[t] / active[t - 1];
            assert!((ratio - factor).abs() < 1e-9, "day {}: ratio {}", t, ratio);
        }
    }

    #[test]
    fn test_susceptible_depletion_caps_outbreak() {
        let n_pop = 1000.0;
        let log_rate = vec![0.8f64.ln(); 200];
        let (new_i, _) = simulate(&log_rate, 0.1, 10.0, n_pop);
        let total: f64 = new_i.iter().sum();
        assert!(total <= n_pop + 1e-6, "cumulative infections {} exceed population", total);
        // The epidemic must actually burn out.
        assert!(new_i[199] < 1e-3, "still spreading at the end: {}", new_i[199]);
    }

    #[test]
    fn test_initial_condition_is_clamped() {
        let log_rate = vec![0.0; 5];
        let (_, active) = simulate(&log_rate, 0.1, -50.0, 1000.0);
        assert_eq!(active[0], 0.0);
        let (_, active) = simulate(&log_rate, 0.1, 1e9, 1000.0);
        assert_eq!(active[0], 1000.0);
    }

    #[test]
    fn test_empty_grid() {
        let (new_i, active) = simulate(&[], 0.1, 10.0, 1e6);
        assert!(new_i.is_empty());
        assert!(active.is_empty());
    }
}
