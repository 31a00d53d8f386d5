//! # sf-inference
//!
//! Sampling engines and convergence diagnostics for anything implementing
//! [`sf_core::traits::LogDensityModel`].
//!
//! The reference engine is an adaptive random-walk Metropolis sampler
//! ([`metropolis`]): gradient-free, so it works with forward models whose
//! derivatives are impractical, with step-size and per-parameter scale
//! adaptation during warmup. [`chain`] holds the draws; [`diagnostics`]
//! computes split R-hat and effective sample size over a multi-chain run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod diagnostics;
pub mod metropolis;

pub use chain::{Chain, SamplerRun};
pub use diagnostics::{summarize, DiagnosticsReport};
pub use metropolis::{sample_chain, sample_chains, MetropolisConfig};
