//! Weekday reporting modulation: fewer cases get reported on weekends.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::timeline::SimulationWindow;

/// Shape of the weekly reporting-bias factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModulationKind {
    /// Smooth `1 - amplitude * |sin(pi * (d + phase) / 7)|`, where `d` is
    /// the number of days since Monday. The trough drifts with `phase`.
    AbsSine,
    /// Hard step: multiply by `1 - amplitude` on the listed weekdays,
    /// leave every other day untouched. Ignores the phase parameter.
    Step {
        /// Weekdays treated as reduced-reporting days.
        weekend_days: Vec<Weekday>,
    },
}

impl ModulationKind {
    /// Reporting factor for one calendar day.
    ///
    /// `amplitude` in `[0, 1]`; `phase` in days (only AbsSine uses it).
    pub fn factor(&self, weekday: Weekday, amplitude: f64, phase: f64) -> f64 {
        match self {
            ModulationKind::AbsSine => {
                let d = weekday.num_days_from_monday() as f64;
                1.0 - amplitude * (std::f64::consts::PI * (d + phase) / 7.0).sin().abs()
            }
            ModulationKind::Step { weekend_days } => {
                if weekend_days.contains(&weekday) {
                    1.0 - amplitude
                } else {
                    1.0
                }
            }
        }
    }
}

impl Default for ModulationKind {
    fn default() -> Self {
        ModulationKind::AbsSine
    }
}

/// Apply weekday modulation and slice the grid down to the output range.
///
/// Takes the delayed expected cases on the full simulation grid and returns
/// the modulated series for the data range plus forecast
/// (`window.output_len()` days). An amplitude of zero passes the series
/// through unchanged.
pub fn modulate(
    delayed_grid: &[f64],
    window: &SimulationWindow,
    amplitude: f64,
    phase: f64,
    kind: &ModulationKind,
) -> Vec<f64> {
    let start = window.data_start_idx();
    let end = window.total_len().min(delayed_grid.len());
    (start..end)
        .map(|idx| delayed_grid[idx] * kind.factor(window.weekday_at(idx), amplitude, phase))
        .collect()
}
