//! Probability building blocks for spreadfit.
//!
//! This crate hosts reusable probability math shared by the generative model
//! and the sampling engine:
//! - log-densities of the prior and noise families the model declares
//! - bijective transforms for unconstrained parameterization
//! - small numerically-stable primitives (sigmoid/log1pexp/clamped exp)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod beta;
pub mod half_cauchy;
pub mod lognormal;
pub mod math;
pub mod normal;
pub mod student_t;
pub mod transforms;
