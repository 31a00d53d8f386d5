//! The model/sampler seam.
//!
//! Sampling engines depend on this trait, never on a concrete model type, so
//! the generative pipeline can be driven by any posterior-exploration
//! strategy (random-walk Metropolis, HMC variants, optimizers).

use crate::Result;

/// A statistical model exposing an unnormalized negative log-density.
///
/// Implementations must be pure: `nll` is a deterministic function of
/// `params` and the model's fixed data, holds no mutable state between
/// calls, and is safe to evaluate concurrently from parallel chains.
///
/// Parameter vectors live in *constrained* (natural) space; the declared
/// bounds tell samplers which bijection to apply for unconstrained
/// exploration. A proposed vector that drives the model outside its valid
/// domain must yield `+inf` NLL, not an error — `Err` is reserved for
/// malformed input (e.g. wrong parameter count).
pub trait LogDensityModel: Send + Sync {
    /// Number of parameters.
    fn dim(&self) -> usize;

    /// Parameter names (stable order).
    fn parameter_names(&self) -> Vec<String>;

    /// Parameter bounds `(min, max)` (stable order).
    fn parameter_bounds(&self) -> Vec<(f64, f64)>;

    /// Suggested initial values (stable order).
    fn parameter_init(&self) -> Vec<f64>;

    /// Negative log-density (likelihood plus priors, up to a constant).
    fn nll(&self, params: &[f64]) -> Result<f64>;
}
