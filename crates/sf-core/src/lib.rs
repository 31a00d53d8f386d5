//! # sf-core
//!
//! Shared foundation for the spreadfit workspace: the error type used across
//! crates and the [`traits::LogDensityModel`] trait that separates model
//! evaluation from the sampling engine driving it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;

pub use error::{Error, Result};
