//! The assembled epidemic model: configuration, forward evaluation, and the
//! log-density interface a sampler drives.

use serde::{Deserialize, Serialize};
use sf_core::traits::LogDensityModel;
use sf_core::{Error, Result};

use crate::changepoint::{validate_schedule, ChangePoint};
use crate::growth::{self, Transition};
use crate::likelihood::{self, LikelihoodConfig};
use crate::modulation::{self, ModulationKind};
use crate::params::{ParameterLayout, ParamsView};
use crate::timeline::{CaseSeries, SimulationWindow};
use crate::{delay, renewal};

/// Spreading-rate configuration: baseline prior and change-point schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Prior median of the baseline spreading rate `lambda_0`.
    pub baseline_rate_median: f64,
    /// Log-scale prior width of `lambda_0`.
    pub baseline_rate_log_sigma: f64,
    /// Dated change points, strictly increasing centers.
    pub change_points: Vec<ChangePoint>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self { baseline_rate_median: 0.4, baseline_rate_log_sigma: 0.5, change_points: Vec::new() }
    }
}

/// How the initial infection pool is parameterized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum InitialInfections {
    /// Sample `I_begin` directly with a half-Cauchy prior.
    Direct {
        /// Half-Cauchy scale.
        prior_scale: f64,
    },
    /// Sample `log(I_begin / reference)` with a wide normal prior, where the
    /// reference is derived from the first observed days. This removes the
    /// strong posterior correlation between `I_begin` and `lambda_0`.
    Decorrelated {
        /// Standard deviation of the log-ratio prior.
        ratio_log_sigma: f64,
        /// Number of leading observed days averaged into the reference.
        n_data_points: usize,
    },
}

impl Default for InitialInfections {
    fn default() -> Self {
        InitialInfections::Direct { prior_scale: 100.0 }
    }
}

/// Recovery-rate prior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Prior median of `mu` (1 / infectious period in days).
    pub rate_median: f64,
    /// Log-scale prior width.
    pub rate_log_sigma: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self { rate_median: 0.125, rate_log_sigma: 0.2 }
    }
}

/// Reporting-delay priors and kernel truncation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Prior median of the delay median, in days.
    pub median_prior_median: f64,
    /// Log-scale prior width of the delay median.
    pub median_prior_log_sigma: f64,
    /// Prior median of the delay width.
    pub width_prior_median: f64,
    /// Log-scale prior width of the delay width.
    pub width_prior_log_sigma: f64,
    /// Tail mass below which the kernel is truncated.
    pub tail_mass: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            median_prior_median: 3.0,
            median_prior_log_sigma: 0.2,
            width_prior_median: 0.3,
            width_prior_log_sigma: 0.3,
            tail_mass: 1e-4,
        }
    }
}

/// Weekday-modulation shape and amplitude prior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulationConfig {
    /// Weekly factor shape.
    pub kind: ModulationKind,
    /// Beta prior shape `a` for the weekend amplitude.
    pub weekend_factor_a: f64,
    /// Beta prior shape `b` for the weekend amplitude.
    pub weekend_factor_b: f64,
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self { kind: ModulationKind::AbsSine, weekend_factor_a: 1.5, weekend_factor_b: 3.5 }
    }
}

/// Full model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Spreading-rate priors and change points.
    pub growth: GrowthConfig,
    /// Total population size `N`.
    pub population: f64,
    /// Initial-infections parameterization.
    pub initial: InitialInfections,
    /// Recovery-rate prior.
    pub recovery: RecoveryConfig,
    /// Reporting-delay priors.
    pub delay: DelayConfig,
    /// Weekday modulation.
    pub modulation: ModulationConfig,
    /// Observation model.
    pub likelihood: LikelihoodConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            growth: GrowthConfig::default(),
            population: 50_000_000.0,
            initial: InitialInfections::default(),
            recovery: RecoveryConfig::default(),
            delay: DelayConfig::default(),
            modulation: ModulationConfig::default(),
            likelihood: LikelihoodConfig::default(),
        }
    }
}

/// Everything the forward pass produces for one parameter vector.
///
/// When the parameters drive the pipeline out of its domain (for example a
/// delay putting all kernel mass beyond the burn-in buffer),
/// `log_likelihood` is `-inf` and the series may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Expected reported cases on the output range (data days then forecast).
    pub expected_cases: Vec<f64>,
    /// Latent daily new infections on the full simulation grid.
    pub new_infections: Vec<f64>,
    /// Latent active infection pool on the full simulation grid.
    pub active_infections: Vec<f64>,
    /// Log spreading rate on the full simulation grid.
    pub log_growth_rate: Vec<f64>,
    /// Student-t log-likelihood over the observed days.
    pub log_likelihood: f64,
}

impl Evaluation {
    fn rejected() -> Self {
        Self {
            expected_cases: Vec::new(),
            new_infections: Vec::new(),
            active_infections: Vec::new(),
            log_growth_rate: Vec::new(),
            log_likelihood: f64::NEG_INFINITY,
        }
    }
}

/// The epidemic change-point model, ready for evaluation and sampling.
///
/// Construction validates all fixed structure; [`EpidemicModel::evaluate`]
/// is then pure and re-entrant, with no interior mutability, so chains can
/// share one model across threads.
#[derive(Debug, Clone)]
pub struct EpidemicModel {
    observed: CaseSeries,
    window: SimulationWindow,
    config: ModelConfig,
    layout: ParameterLayout,
    /// Reference infection count for the decorrelated parameterization;
    /// zero when the direct parameterization is used.
    initial_reference: f64,
}

impl EpidemicModel {
    /// Build a model, validating the configuration against the window.
    pub fn new(
        observed: CaseSeries,
        window: SimulationWindow,
        config: ModelConfig,
    ) -> Result<Self> {
        if observed.len() != window.n_data {
            return Err(Error::Validation(format!(
                "window covers {} observed days but the series has {}",
                window.n_data,
                observed.len()
            )));
        }
        if observed.start() != window.data_begin {
            return Err(Error::Validation(format!(
                "series starts {} but the window expects {}",
                observed.start(),
                window.data_begin
            )));
        }
        if !config.population.is_finite() || config.population <= 0.0 {
            return Err(Error::Validation(format!(
                "population must be finite and > 0, got {}",
                config.population
            )));
        }
        validate_schedule(&config.growth.change_points)?;

        // At the prior medians the delay kernel must fit inside the burn-in
        // buffer, otherwise reported cases on the first data days would need
        // infections from before the simulation starts.
        let k = delay::kernel(
            config.delay.median_prior_median,
            config.delay.width_prior_median,
            4 * window.diff_data_sim,
            config.delay.tail_mass,
        )?;
        if k.len() > window.diff_data_sim {
            return Err(Error::Validation(format!(
                "delay kernel spans {} days at the prior median but diff_data_sim is only {}",
                k.len(),
                window.diff_data_sim
            )));
        }

        let initial_reference = match config.initial {
            InitialInfections::Direct { prior_scale } => {
                if !prior_scale.is_finite() || prior_scale <= 0.0 {
                    return Err(Error::Validation(format!(
                        "I_begin prior scale must be finite and > 0, got {}",
                        prior_scale
                    )));
                }
                0.0
            }
            InitialInfections::Decorrelated { ratio_log_sigma, n_data_points } => {
                if !ratio_log_sigma.is_finite() || ratio_log_sigma <= 0.0 {
                    return Err(Error::Validation(format!(
                        "ratio_log_sigma must be finite and > 0, got {}",
                        ratio_log_sigma
                    )));
                }
                if n_data_points == 0 || n_data_points > observed.len() {
                    return Err(Error::Validation(format!(
                        "decorrelated reference needs 1..={} leading days, got {}",
                        observed.len(),
                        n_data_points
                    )));
                }
                Self::decorrelated_reference(&observed, &window, &config, n_data_points)
            }
        };

        let layout = ParameterLayout::new(&config, &window)?;
        Ok(Self { observed, window, config, layout, initial_reference })
    }

    /// Reference `I_begin` derived from early observed counts: the mean of
    /// the first days, converted from reports to infections by dividing out
    /// the baseline growth accumulated over the burn-in plus typical delay.
    fn decorrelated_reference(
        observed: &CaseSeries,
        window: &SimulationWindow,
        config: &ModelConfig,
        n_data_points: usize,
    ) -> f64 {
        let mean: f64 = observed.values()[..n_data_points].iter().sum::<f64>()
            / n_data_points as f64;
        let lambda_med = config.growth.baseline_rate_median;
        let mu_med = config.recovery.rate_median;
        let days = window.diff_data_sim as f64 + config.delay.median_prior_median;
        let reference = mean / lambda_med * (-(lambda_med - mu_med) * days).exp();
        reference.max(1.0)
    }

    /// Observed series.
    pub fn observed(&self) -> &CaseSeries {
        &self.observed
    }

    /// Simulation window.
    pub fn window(&self) -> &SimulationWindow {
        &self.window
    }

    /// Configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Parameter manifest.
    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    /// Run the full forward pass for one parameter vector.
    ///
    /// Errors only on a wrong-length vector; parameters outside the model's
    /// domain yield an [`Evaluation`] with `log_likelihood = -inf`, which a
    /// sampler treats as a rejected draw.
    pub fn evaluate(&self, params: &[f64]) -> Result<Evaluation> {
        let view = self.layout.view(params)?;
        Ok(self.forward(&view).unwrap_or_else(Evaluation::rejected))
    }

    fn forward(&self, view: &ParamsView) -> Option<Evaluation> {
        if !(view.lambda_0.is_finite() && view.lambda_0 > 0.0) {
            return None;
        }
        if !(view.mu.is_finite() && view.mu > 0.0) {
            return None;
        }
        if !(0.0..=1.0).contains(&view.weekend_factor) || !view.weekday_phase.is_finite() {
            return None;
        }

        let mut transitions = Vec::with_capacity(view.change_points.len());
        for cp in &view.change_points {
            if !(cp.rate.is_finite() && cp.rate > 0.0) || !cp.transient_day.is_finite() {
                return None;
            }
            transitions.push(Transition {
                new_log_rate: cp.rate.ln(),
                center_day: cp.transient_day,
                length_days: cp.transient_len,
            });
        }

        let log_growth_rate =
            growth::log_rate_series(self.window.total_len(), view.lambda_0.ln(), &transitions);

        let i_begin = match self.config.initial {
            InitialInfections::Direct { .. } => view.initial_raw,
            InitialInfections::Decorrelated { .. } => {
                if !view.initial_raw.is_finite() {
                    return None;
                }
                self.initial_reference * view.initial_raw.exp()
            }
        };
        if !i_begin.is_finite() || i_begin < 0.0 {
            return None;
        }

        let (new_infections, active_infections) =
            renewal::simulate(&log_growth_rate, view.mu, i_begin, self.config.population);

        let kernel = delay::kernel(
            view.delay,
            view.delay_width,
            self.window.diff_data_sim,
            self.config.delay.tail_mass,
        )
        .ok()?;
        let delayed = delay::convolve(&new_infections, &kernel);

        let expected_cases = modulation::modulate(
            &delayed,
            &self.window,
            view.weekend_factor,
            view.weekday_phase,
            &self.config.modulation.kind,
        );

        let log_likelihood = likelihood::log_likelihood(
            self.observed.values(),
            &expected_cases,
            view.sigma_obs,
            &self.config.likelihood,
        );

        Some(Evaluation {
            expected_cases,
            new_infections,
            active_infections,
            log_growth_rate,
            log_likelihood,
        })
    }
}

impl LogDensityModel for EpidemicModel {
    fn dim(&self) -> usize {
        self.layout.dim()
    }

    fn parameter_names(&self) -> Vec<String> {
        self.layout.names()
    }

    fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        self.layout.bounds()
    }

    fn parameter_init(&self) -> Vec<f64> {
        self.layout.init()
    }

    fn nll(&self, params: &[f64]) -> Result<f64> {
        let log_prior = self.layout.log_prior(params)?;
        if log_prior == f64::NEG_INFINITY {
            return Ok(f64::INFINITY);
        }
        let eval = self.evaluate(params)?;
        let log_post = log_prior + eval.log_likelihood;
        if log_post.is_finite() {
            Ok(-log_post)
        } else {
            Ok(f64::INFINITY)
        }
    }
}
