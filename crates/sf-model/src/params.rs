//! Parameter manifest: names, bounds, priors, and structured access to the
//! flat parameter vector a sampler hands back.

use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};
use sf_prob::{beta, half_cauchy, lognormal, normal};

use crate::model::{InitialInfections, ModelConfig};
use crate::timeline::SimulationWindow;

/// Prior distribution of one scalar parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Prior {
    /// Log-normal, parameterized by the log of the median.
    LogNormal {
        /// Log of the prior median.
        log_median: f64,
        /// Log-scale standard deviation.
        sigma: f64,
    },
    /// Gaussian.
    Normal {
        /// Mean.
        mu: f64,
        /// Standard deviation.
        sigma: f64,
    },
    /// Half-Cauchy on `[0, inf)`.
    HalfCauchy {
        /// Scale (the prior median).
        scale: f64,
    },
    /// Beta on `(0, 1)`.
    Beta {
        /// First shape parameter.
        a: f64,
        /// Second shape parameter.
        b: f64,
    },
    /// Uniform on `(lo, hi)`.
    Uniform {
        /// Lower edge.
        lo: f64,
        /// Upper edge.
        hi: f64,
    },
}

impl Prior {
    /// Log-density at `x`; out-of-support values give `-inf`.
    pub fn logpdf(&self, x: f64) -> Result<f64> {
        match *self {
            Prior::LogNormal { log_median, sigma } => lognormal::logpdf(x, log_median, sigma),
            Prior::Normal { mu, sigma } => normal::logpdf(x, mu, sigma),
            Prior::HalfCauchy { scale } => half_cauchy::logpdf(x, scale),
            Prior::Beta { a, b } => beta::logpdf(x, a, b),
            Prior::Uniform { lo, hi } => {
                if hi <= lo {
                    return Err(Error::Validation(format!(
                        "uniform prior needs lo < hi, got ({}, {})",
                        lo, hi
                    )));
                }
                if x >= lo && x <= hi {
                    Ok(-(hi - lo).ln())
                } else {
                    Ok(f64::NEG_INFINITY)
                }
            }
        }
    }

    /// Support of the prior, used to pick the sampler-side bijector.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Prior::LogNormal { .. } | Prior::HalfCauchy { .. } => (0.0, f64::INFINITY),
            Prior::Normal { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            Prior::Beta { .. } => (0.0, 1.0),
            Prior::Uniform { lo, hi } => (lo, hi),
        }
    }

    /// A central value used as the default chain start.
    pub fn init(&self) -> f64 {
        match *self {
            Prior::LogNormal { log_median, .. } => log_median.exp(),
            Prior::Normal { mu, .. } => mu,
            Prior::HalfCauchy { scale } => scale,
            Prior::Beta { a, b } => a / (a + b),
            Prior::Uniform { lo, hi } => 0.5 * (lo + hi),
        }
    }
}

/// One named parameter with its prior and support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Stable name, used in draws and diagnostics output.
    pub name: String,
    /// Open support interval.
    pub bounds: (f64, f64),
    /// Default chain start.
    pub init: f64,
    /// Prior distribution.
    pub prior: Prior,
}

impl ParameterSpec {
    fn from_prior(name: impl Into<String>, prior: Prior) -> Self {
        Self { name: name.into(), bounds: prior.bounds(), init: prior.init(), prior }
    }
}

/// Sampled transition parameters for one change point.
#[derive(Debug, Clone, Copy)]
pub struct ChangePointSample {
    /// Spreading rate after the transition.
    pub rate: f64,
    /// Transition center as a grid day.
    pub transient_day: f64,
    /// Transition length in days.
    pub transient_len: f64,
}

/// Structured view over a flat parameter vector.
#[derive(Debug, Clone)]
pub struct ParamsView {
    /// Baseline spreading rate before any change point.
    pub lambda_0: f64,
    /// Recovery rate.
    pub mu: f64,
    /// Per-change-point transition parameters, in schedule order.
    pub change_points: Vec<ChangePointSample>,
    /// Initial infections: direct count, or the log-ratio against the
    /// data-derived reference when the decorrelated parameterization is on.
    pub initial_raw: f64,
    /// Reporting-delay median in days.
    pub delay: f64,
    /// Reporting-delay log-scale width.
    pub delay_width: f64,
    /// Weekend reporting-reduction amplitude in `[0, 1]`.
    pub weekend_factor: f64,
    /// Weekly modulation phase in days.
    pub weekday_phase: f64,
    /// Observation-noise scale.
    pub sigma_obs: f64,
}

/// The full ordered parameter manifest of an epidemic model.
///
/// Order is fixed: `lambda_0, mu`, then `lambda_i, transient_day_i,
/// transient_len_i` per change point in schedule order, then the initial
/// infections, `delay, delay_width, weekend_factor, weekday_phase,
/// sigma_obs`.
#[derive(Debug, Clone)]
pub struct ParameterLayout {
    specs: Vec<ParameterSpec>,
    n_change_points: usize,
    decorrelated: bool,
}

impl ParameterLayout {
    /// Build the manifest from the model configuration and window.
    pub fn new(config: &ModelConfig, window: &SimulationWindow) -> Result<Self> {
        let mut specs = Vec::with_capacity(8 + 3 * config.growth.change_points.len());

        specs.push(ParameterSpec::from_prior(
            "lambda_0",
            Prior::LogNormal {
                log_median: config.growth.baseline_rate_median.ln(),
                sigma: config.growth.baseline_rate_log_sigma,
            },
        ));
        specs.push(ParameterSpec::from_prior(
            "mu",
            Prior::LogNormal {
                log_median: config.recovery.rate_median.ln(),
                sigma: config.recovery.rate_log_sigma,
            },
        ));

        for (i, cp) in config.growth.change_points.iter().enumerate() {
            let n = i + 1;
            specs.push(ParameterSpec::from_prior(
                format!("lambda_{}", n),
                Prior::LogNormal { log_median: cp.rate_median.ln(), sigma: cp.rate_log_sigma },
            ));
            specs.push(ParameterSpec::from_prior(
                format!("transient_day_{}", n),
                Prior::Normal { mu: window.grid_day_of(cp.center), sigma: cp.center_sigma_days },
            ));
            specs.push(ParameterSpec::from_prior(
                format!("transient_len_{}", n),
                Prior::LogNormal {
                    log_median: cp.length_median_days.ln(),
                    sigma: cp.length_log_sigma,
                },
            ));
        }

        match config.initial {
            InitialInfections::Direct { prior_scale } => {
                specs.push(ParameterSpec::from_prior(
                    "I_begin",
                    Prior::HalfCauchy { scale: prior_scale },
                ));
            }
            InitialInfections::Decorrelated { ratio_log_sigma, .. } => {
                specs.push(ParameterSpec::from_prior(
                    "I_begin_ratio_log",
                    Prior::Normal { mu: 0.0, sigma: ratio_log_sigma },
                ));
            }
        }

        specs.push(ParameterSpec::from_prior(
            "delay",
            Prior::LogNormal {
                log_median: config.delay.median_prior_median.ln(),
                sigma: config.delay.median_prior_log_sigma,
            },
        ));
        specs.push(ParameterSpec::from_prior(
            "delay_width",
            Prior::LogNormal {
                log_median: config.delay.width_prior_median.ln(),
                sigma: config.delay.width_prior_log_sigma,
            },
        ));
        specs.push(ParameterSpec::from_prior(
            "weekend_factor",
            Prior::Beta {
                a: config.modulation.weekend_factor_a,
                b: config.modulation.weekend_factor_b,
            },
        ));
        specs.push(ParameterSpec::from_prior(
            "weekday_phase",
            Prior::Uniform { lo: 0.0, hi: 7.0 },
        ));
        specs.push(ParameterSpec::from_prior(
            "sigma_obs",
            Prior::HalfCauchy { scale: config.likelihood.sigma_obs_prior_scale },
        ));

        for spec in &specs {
            if !spec.init.is_finite() {
                return Err(Error::Validation(format!(
                    "parameter {} has a non-finite prior center",
                    spec.name
                )));
            }
        }

        Ok(Self {
            specs,
            n_change_points: config.growth.change_points.len(),
            decorrelated: matches!(config.initial, InitialInfections::Decorrelated { .. }),
        })
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.specs.len()
    }

    /// Whether the initial-infections parameter is the decorrelated
    /// log-ratio rather than a direct count.
    pub fn is_decorrelated(&self) -> bool {
        self.decorrelated
    }

    /// Per-parameter specs in sampling order.
    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    /// Parameter names in sampling order.
    pub fn names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name.clone()).collect()
    }

    /// Support bounds in sampling order.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.specs.iter().map(|s| s.bounds).collect()
    }

    /// Default chain start in sampling order.
    pub fn init(&self) -> Vec<f64> {
        self.specs.iter().map(|s| s.init).collect()
    }

    /// Joint log-prior of a parameter vector.
    ///
    /// Out-of-support values give `-inf`; a wrong-length vector is a caller
    /// bug and errors.
    pub fn log_prior(&self, params: &[f64]) -> Result<f64> {
        self.check_len(params)?;
        let mut total = 0.0;
        for (spec, &x) in self.specs.iter().zip(params) {
            let lp = spec.prior.logpdf(x)?;
            if lp == f64::NEG_INFINITY {
                return Ok(f64::NEG_INFINITY);
            }
            total += lp;
        }
        Ok(total)
    }

    /// Decode a flat parameter vector into named fields.
    pub fn view(&self, params: &[f64]) -> Result<ParamsView> {
        self.check_len(params)?;
        let mut it = params.iter().copied();
        // check_len guarantees every next() below succeeds.
        let mut next = || it.next().unwrap_or(f64::NAN);

        let lambda_0 = next();
        let mu = next();
        let change_points = (0..self.n_change_points)
            .map(|_| ChangePointSample {
                rate: next(),
                transient_day: next(),
                transient_len: next(),
            })
            .collect();
        Ok(ParamsView {
            lambda_0,
            mu,
            change_points,
            initial_raw: next(),
            delay: next(),
            delay_width: next(),
            weekend_factor: next(),
            weekday_phase: next(),
            sigma_obs: next(),
        })
    }

    fn check_len(&self, params: &[f64]) -> Result<()> {
        if params.len() != self.specs.len() {
            return Err(Error::Validation(format!(
                "expected {} parameters, got {}",
                self.specs.len(),
                params.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changepoint::ChangePoint;
    use crate::model::GrowthConfig;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn layout_with(n_cp: usize, initial: InitialInfections) -> (ParameterLayout, ModelConfig) {
        let change_points: Vec<ChangePoint> = (0..n_cp)
            .map(|i| ChangePoint::new(d(2020, 4, 6 + 7 * i as u32), 0.2).unwrap())
            .collect();
        let config = ModelConfig {
            growth: GrowthConfig { change_points, ..GrowthConfig::default() },
            initial,
            ..ModelConfig::default()
        };
        let window = SimulationWindow::new(d(2020, 4, 2), 30, 16, 0).unwrap();
        let layout = ParameterLayout::new(&config, &window).unwrap();
        (layout, config)
    }

    #[test]
    fn test_dimension_and_names() {
        let (layout, _) = layout_with(2, InitialInfections::Direct { prior_scale: 100.0 });
        assert_eq!(layout.dim(), 2 + 3 * 2 + 6);
        let names = layout.names();
        assert_eq!(names[0], "lambda_0");
        assert_eq!(names[1], "mu");
        assert_eq!(names[2], "lambda_1");
        assert_eq!(names[3], "transient_day_1");
        assert_eq!(names[4], "transient_len_1");
        assert_eq!(names[5], "lambda_2");
        assert_eq!(names[8], "I_begin");
        assert_eq!(names[13], "sigma_obs");
    }

    #[test]
    fn test_decorrelated_swaps_initial_parameter() {
        let (layout, _) = layout_with(
            0,
            InitialInfections::Decorrelated { ratio_log_sigma: 2.0, n_data_points: 5 },
        );
        assert!(layout.is_decorrelated());
        let names = layout.names();
        assert_eq!(names[2], "I_begin_ratio_log");
        // Unbounded, so the sampler uses an identity bijector.
        assert_eq!(layout.bounds()[2], (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_transient_day_prior_centers_on_grid_day() {
        let (layout, _) = layout_with(1, InitialInfections::Direct { prior_scale: 100.0 });
        // 2020-04-06 is 20 days after sim begin 2020-03-17.
        match layout.specs()[3].prior {
            Prior::Normal { mu, sigma } => {
                assert_eq!(mu, 20.0);
                assert_eq!(sigma, 1.5);
            }
            ref p => panic!("unexpected prior {:?}", p),
        }
    }

    #[test]
    fn test_view_roundtrips_ordering() {
        let (layout, _) = layout_with(1, InitialInfections::Direct { prior_scale: 100.0 });
        let params: Vec<f64> = (0..layout.dim()).map(|i| i as f64 + 1.0).collect();
        let v = layout.view(&params).unwrap();
        assert_eq!(v.lambda_0, 1.0);
        assert_eq!(v.mu, 2.0);
        assert_eq!(v.change_points[0].rate, 3.0);
        assert_eq!(v.change_points[0].transient_day, 4.0);
        assert_eq!(v.change_points[0].transient_len, 5.0);
        assert_eq!(v.initial_raw, 6.0);
        assert_eq!(v.delay, 7.0);
        assert_eq!(v.delay_width, 8.0);
        assert_eq!(v.weekend_factor, 9.0);
        assert_eq!(v.weekday_phase, 10.0);
        assert_eq!(v.sigma_obs, 11.0);
    }

    #[test]
    fn test_log_prior_at_init_is_finite() {
        let (layout, _) = layout_with(2, InitialInfections::Direct { prior_scale: 100.0 });
        let lp = layout.log_prior(&layout.init()).unwrap();
        assert!(lp.is_finite(), "log-prior at the prior centers: {}", lp);
    }

    #[test]
    fn test_log_prior_rejects_out_of_support() {
        let (layout, _) = layout_with(0, InitialInfections::Direct { prior_scale: 100.0 });
        let mut params = layout.init();
        params[0] = -0.1; // lambda_0 must be positive
        assert_eq!(layout.log_prior(&params).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_wrong_length_is_an_error() {
        let (layout, _) = layout_with(0, InitialInfections::Direct { prior_scale: 100.0 });
        assert!(layout.log_prior(&[1.0, 2.0]).is_err());
        assert!(layout.view(&[1.0]).is_err());
    }
}
