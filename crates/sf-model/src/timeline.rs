//! Calendar grid for the simulation: observed case series and the
//! simulation window with its burn-in buffer and forecast tail.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};

/// Observed daily case counts on a contiguous daily grid.
///
/// Values are non-negative reals (counts); the start date anchors the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl CaseSeries {
    /// Create a series from a start date and daily values.
    ///
    /// Fails if the series is empty or any value is negative or non-finite.
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::Validation("case series must not be empty".into()));
        }
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Validation(format!(
                    "case count at day {} must be finite and >= 0, got {}",
                    i, v
                )));
            }
        }
        Ok(Self { start, values })
    }

    /// Create a series from dated observations.
    ///
    /// Dates must be strictly increasing with no gaps (exactly one day
    /// apart); anything else is a contract violation from the data source.
    pub fn from_pairs(pairs: &[(NaiveDate, f64)]) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::Validation("case series must not be empty".into()));
        }
        for w in pairs.windows(2) {
            let gap = (w[1].0 - w[0].0).num_days();
            if gap != 1 {
                return Err(Error::Validation(format!(
                    "dates must be contiguous and increasing: {} -> {} (gap {} days)",
                    w[0].0, w[1].0, gap
                )));
            }
        }
        Self::new(pairs[0].0, pairs.iter().map(|&(_, v)| v).collect())
    }

    /// First date of the series.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Daily values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observed days.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty (never true for a constructed series).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The simulation grid: a burn-in buffer, the observed data range, and a
/// forecast tail.
///
/// Grid index 0 is `diff_data_sim` days before `data_begin`. The buffer
/// exists so the renewal recursion and the delay convolution have enough
/// history that no output point inside the data range reads before the
/// grid start; [`crate::model::EpidemicModel::new`] checks the buffer
/// against the delay kernel's effective support.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationWindow {
    /// First observed date.
    pub data_begin: NaiveDate,
    /// Number of observed days.
    pub n_data: usize,
    /// Burn-in days simulated before `data_begin` and discarded from output.
    pub diff_data_sim: usize,
    /// Forecast days appended after the observed range.
    pub fcast_len: usize,
}

impl SimulationWindow {
    /// Create a window, validating basic shape.
    pub fn new(
        data_begin: NaiveDate,
        n_data: usize,
        diff_data_sim: usize,
        fcast_len: usize,
    ) -> Result<Self> {
        if n_data == 0 {
            return Err(Error::Validation("window must cover at least one observed day".into()));
        }
        if diff_data_sim == 0 {
            return Err(Error::Validation(
                "diff_data_sim must be >= 1 so the recursion has burn-in history".into(),
            ));
        }
        Ok(Self { data_begin, n_data, diff_data_sim, fcast_len })
    }

    /// Total number of grid days (burn-in + data + forecast).
    pub fn total_len(&self) -> usize {
        self.diff_data_sim + self.n_data + self.fcast_len
    }

    /// Number of output days (data + forecast).
    pub fn output_len(&self) -> usize {
        self.n_data + self.fcast_len
    }

    /// First date of the simulation grid.
    pub fn sim_begin(&self) -> NaiveDate {
        self.data_begin - Duration::days(self.diff_data_sim as i64)
    }

    /// Calendar date of a grid index.
    pub fn date_at(&self, grid_idx: usize) -> NaiveDate {
        self.sim_begin() + Duration::days(grid_idx as i64)
    }

    /// Weekday of a grid index.
    pub fn weekday_at(&self, grid_idx: usize) -> Weekday {
        self.date_at(grid_idx).weekday()
    }

    /// Grid index (possibly fractional, possibly negative) of a date.
    pub fn grid_day_of(&self, date: NaiveDate) -> f64 {
        (date - self.sim_begin()).num_days() as f64
    }

    /// Grid index of the first observed day.
    pub fn data_start_idx(&self) -> usize {
        self.diff_data_sim
    }
}
