//! # sf-model
//!
//! The generative epidemic model: a pure, re-entrant pipeline from a
//! parameter vector to an expected daily-case series, compared to observed
//! counts through a Student-t likelihood.
//!
//! Pipeline stages, data flowing strictly forward:
//!
//! 1. [`growth`] — time-varying log spreading rate with sigmoid change-point
//!    transitions.
//! 2. [`renewal`] — SIR-style renewal recursion producing latent new and
//!    active infections.
//! 3. [`delay`] — causal convolution with a discretized log-normal
//!    reporting-delay kernel.
//! 4. [`modulation`] — periodic weekday reporting-bias factor.
//! 5. [`likelihood`] — Student-t observation model over the observed range.
//!
//! [`model::EpidemicModel`] assembles the stages, declares every prior
//! through [`params::ParameterLayout`], and implements
//! [`sf_core::traits::LogDensityModel`] so any sampling engine can drive it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod changepoint;
pub mod delay;
pub mod growth;
pub mod likelihood;
pub mod model;
pub mod modulation;
pub mod params;
pub mod renewal;
pub mod timeline;

pub use changepoint::ChangePoint;
pub use model::{EpidemicModel, Evaluation, ModelConfig};
pub use params::{ParameterLayout, Prior};
pub use timeline::{CaseSeries, SimulationWindow};
