//! Change points: dated policy interventions with priors on when the
//! spreading rate shifts, how long the transition takes, and where it lands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};

/// Prior specification for one change point.
///
/// The transition center and length are sampled per evaluation; the fields
/// here are prior hyperparameters, fixed at model construction. A schedule
/// of change points must have strictly increasing centers (checked by
/// [`validate_schedule`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePoint {
    /// Prior mean of the transition-center date.
    pub center: NaiveDate,
    /// Prior standard deviation of the center, in days.
    pub center_sigma_days: f64,
    /// Prior median of the spreading rate after the transition.
    pub rate_median: f64,
    /// Log-scale prior width of the post-transition rate.
    pub rate_log_sigma: f64,
    /// Prior median of the transition length, in days.
    pub length_median_days: f64,
    /// Log-scale prior width of the transition length.
    pub length_log_sigma: f64,
}

impl ChangePoint {
    /// Create a change point with default transition-shape priors.
    ///
    /// Defaults: center sigma 1.5 days, rate log-sigma 0.5, transition
    /// length median 4 days with log-sigma 0.5.
    pub fn new(center: NaiveDate, rate_median: f64) -> Result<Self> {
        let cp = Self {
            center,
            center_sigma_days: 1.5,
            rate_median,
            rate_log_sigma: 0.5,
            length_median_days: 4.0,
            length_log_sigma: 0.5,
        };
        cp.validate()?;
        Ok(cp)
    }

    /// Check all hyperparameters are in-domain.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("center_sigma_days", self.center_sigma_days),
            ("rate_median", self.rate_median),
            ("rate_log_sigma", self.rate_log_sigma),
            ("length_median_days", self.length_median_days),
            ("length_log_sigma", self.length_log_sigma),
        ];
        for (name, v) in checks {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::Validation(format!(
                    "change point {}: {} must be finite and > 0, got {}",
                    self.center, name, v
                )));
            }
        }
        Ok(())
    }
}

/// Validate an ordered change-point schedule.
///
/// Centers must be strictly increasing; each point must be individually
/// valid. Overlapping transition *windows* are allowed — composition is
/// sequential on the log scale — but identical centers are not.
pub fn validate_schedule(change_points: &[ChangePoint]) -> Result<()> {
    for cp in change_points {
        cp.validate()?;
    }
    for w in change_points.windows(2) {
        if w[1].center <= w[0].center {
            return Err(Error::Validation(format!(
                "change point centers must be strictly increasing: {} then {}",
                w[0].center, w[1].center
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_new_applies_defaults() {
        let cp = ChangePoint::new(d(2020, 4, 6), 0.2).unwrap();
        assert_eq!(cp.length_median_days, 4.0);
        assert_eq!(cp.center_sigma_days, 1.5);
    }

    #[test]
    fn test_rejects_nonpositive_hyperparameters() {
        assert!(ChangePoint::new(d(2020, 4, 6), 0.0).is_err());
        let mut cp = ChangePoint::new(d(2020, 4, 6), 0.2).unwrap();
        cp.length_median_days = -1.0;
        assert!(cp.validate().is_err());
    }

    #[test]
    fn test_schedule_ordering() {
        let a = ChangePoint::new(d(2020, 4, 6), 0.2).unwrap();
        let b = ChangePoint::new(d(2020, 5, 7), 0.125).unwrap();
        assert!(validate_schedule(&[a.clone(), b.clone()]).is_ok());
        assert!(validate_schedule(&[b, a]).is_err());
    }

    #[test]
    fn test_schedule_rejects_duplicate_centers() {
        let a = ChangePoint::new(d(2020, 4, 6), 0.2).unwrap();
        let b = ChangePoint::new(d(2020, 4, 6), 0.1).unwrap();
        assert!(validate_schedule(&[a, b]).is_err());
    }
}
