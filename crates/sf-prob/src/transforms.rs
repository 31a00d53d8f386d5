//! Bijective transforms (bijectors) for unconstrained parameterization.
//!
//! Samplers explore in unconstrained space `z ∈ R^n`; these transforms map
//! between `z` and constrained parameters `theta`, providing the Jacobian
//! correction needed for densities stated in constrained space.

use crate::math::{log_sigmoid, sigmoid};

/// A scalar bijection from unconstrained `z` to constrained `theta`.
pub trait Bijector: Send + Sync {
    /// Map unconstrained -> constrained: `theta = forward(z)`.
    fn forward(&self, z: f64) -> f64;
    /// Map constrained -> unconstrained: `z = inverse(theta)`.
    fn inverse(&self, theta: f64) -> f64;
    /// `log|dtheta/dz|` at `z`.
    fn log_abs_det_jacobian(&self, z: f64) -> f64;
}

/// Identity: `(-inf, inf) -> (-inf, inf)`.
pub struct IdentityBijector;

impl Bijector for IdentityBijector {
    #[inline]
    fn forward(&self, z: f64) -> f64 {
        z
    }
    #[inline]
    fn inverse(&self, theta: f64) -> f64 {
        theta
    }
    #[inline]
    fn log_abs_det_jacobian(&self, _z: f64) -> f64 {
        0.0
    }
}

/// Exp: `(-inf, inf) -> (0, inf)`, `theta = exp(z)`.
pub struct ExpBijector;

impl Bijector for ExpBijector {
    #[inline]
    fn forward(&self, z: f64) -> f64 {
        z.exp()
    }
    #[inline]
    fn inverse(&self, theta: f64) -> f64 {
        theta.max(f64::MIN_POSITIVE).ln()
    }
    #[inline]
    fn log_abs_det_jacobian(&self, z: f64) -> f64 {
        z
    }
}

/// Shifted exp: `(-inf, inf) -> (lower, inf)`, `theta = lower + exp(z)`.
pub struct LowerBoundedBijector {
    lower: f64,
}

impl LowerBoundedBijector {
    /// Create a bijector onto `(lower, inf)`.
    pub fn new(lower: f64) -> Self {
        Self { lower }
    }
}

impl Bijector for LowerBoundedBijector {
    #[inline]
    fn forward(&self, z: f64) -> f64 {
        self.lower + z.exp()
    }
    #[inline]
    fn inverse(&self, theta: f64) -> f64 {
        (theta - self.lower).max(f64::MIN_POSITIVE).ln()
    }
    #[inline]
    fn log_abs_det_jacobian(&self, z: f64) -> f64 {
        z
    }
}

/// Scaled sigmoid: `(-inf, inf) -> (lower, upper)`.
pub struct SigmoidBijector {
    lower: f64,
    width: f64,
    log_width: f64,
}

impl SigmoidBijector {
    /// Create a bijector onto the open interval `(lower, upper)`.
    pub fn new(lower: f64, upper: f64) -> Self {
        let width = upper - lower;
        Self { lower, width, log_width: width.ln() }
    }
}

impl Bijector for SigmoidBijector {
    #[inline]
    fn forward(&self, z: f64) -> f64 {
        self.lower + self.width * sigmoid(z)
    }

    #[inline]
    fn inverse(&self, theta: f64) -> f64 {
        let p = ((theta - self.lower) / self.width).clamp(1e-15, 1.0 - 1e-15);
        (p / (1.0 - p)).ln()
    }

    #[inline]
    fn log_abs_det_jacobian(&self, z: f64) -> f64 {
        // dtheta/dz = width * sigmoid(z) * (1 - sigmoid(z))
        self.log_width + log_sigmoid(z) + log_sigmoid(-z)
    }
}

/// Per-parameter transform for a whole parameter vector.
pub struct ParameterTransform {
    bijectors: Vec<Box<dyn Bijector>>,
}

impl ParameterTransform {
    /// Build a transform from parameter bounds.
    ///
    /// Selection: `(-inf, inf)` -> identity; `(a, inf)` -> (shifted) exp;
    /// finite `(a, b)` -> sigmoid. Degenerate bounds fall back to identity.
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Self {
        let bijectors: Vec<Box<dyn Bijector>> = bounds
            .iter()
            .map(|&(lo, hi)| -> Box<dyn Bijector> {
                match (lo.is_finite(), hi.is_finite()) {
                    (false, false) => Box::new(IdentityBijector),
                    (true, false) => {
                        if lo == 0.0 {
                            Box::new(ExpBijector)
                        } else {
                            Box::new(LowerBoundedBijector::new(lo))
                        }
                    }
                    (true, true) if hi > lo => Box::new(SigmoidBijector::new(lo, hi)),
                    _ => Box::new(IdentityBijector),
                }
            })
            .collect();
        Self { bijectors }
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.bijectors.len()
    }

    /// Map unconstrained -> constrained.
    pub fn forward(&self, z: &[f64]) -> Vec<f64> {
        z.iter().zip(&self.bijectors).map(|(&zi, b)| b.forward(zi)).collect()
    }

    /// Map constrained -> unconstrained.
    pub fn inverse(&self, theta: &[f64]) -> Vec<f64> {
        theta.iter().zip(&self.bijectors).map(|(&ti, b)| b.inverse(ti)).collect()
    }

    /// Sum of `log|J|` over all parameters.
    pub fn log_abs_det_jacobian(&self, z: &[f64]) -> f64 {
        z.iter().zip(&self.bijectors).map(|(&zi, b)| b.log_abs_det_jacobian(zi)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(b: &dyn Bijector, zs: &[f64], tol: f64) {
        for &z in zs {
            let theta = b.forward(z);
            let back = b.inverse(theta);
            assert!(
                (z - back).abs() / z.abs().max(1.0) < tol,
                "z={}, theta={}, back={}",
                z,
                theta,
                back
            );
        }
    }

    fn log_jac_matches_fd(b: &dyn Bijector, zs: &[f64], tol: f64) {
        let eps = 1e-6;
        for &z in zs {
            let fd = ((b.forward(z + eps) - b.forward(z - eps)) / (2.0 * eps)).abs().ln();
            let lj = b.log_abs_det_jacobian(z);
            assert!((lj - fd).abs() < tol, "z={}: analytic={}, fd={}", z, lj, fd);
        }
    }

    #[test]
    fn test_identity() {
        let b = IdentityBijector;
        roundtrip(&b, &[-4.0, 0.0, 2.5], 1e-15);
        assert_eq!(b.log_abs_det_jacobian(3.0), 0.0);
    }

    #[test]
    fn test_exp_bijector() {
        let b = ExpBijector;
        roundtrip(&b, &[-6.0, -0.5, 0.0, 1.0, 4.0], 1e-10);
        log_jac_matches_fd(&b, &[-2.0, 0.0, 2.0], 1e-5);
    }

    #[test]
    fn test_lower_bounded_bijector() {
        let b = LowerBoundedBijector::new(1.5);
        roundtrip(&b, &[-3.0, 0.0, 2.0], 1e-10);
        assert!(b.forward(-30.0) > 1.5);
        log_jac_matches_fd(&b, &[-2.0, 0.0, 2.0], 1e-5);
    }

    #[test]
    fn test_sigmoid_bijector_stays_inside() {
        let b = SigmoidBijector::new(0.0, 7.0);
        roundtrip(&b, &[-5.0, -0.2, 0.0, 0.2, 5.0], 1e-10);
        log_jac_matches_fd(&b, &[-2.0, 0.0, 2.0], 1e-5);
        for z in [-50.0, 0.0, 50.0] {
            let theta = b.forward(z);
            assert!((0.0..=7.0).contains(&theta), "theta={} for z={}", theta, z);
        }
    }

    #[test]
    fn test_parameter_transform_selection_and_roundtrip() {
        let bounds = vec![
            (f64::NEG_INFINITY, f64::INFINITY),
            (0.0, f64::INFINITY),
            (0.0, 1.0),
            (2.0, f64::INFINITY),
        ];
        let t = ParameterTransform::from_bounds(&bounds);
        assert_eq!(t.dim(), 4);

        let theta = vec![-1.2, 0.7, 0.3, 5.0];
        let z = t.inverse(&theta);
        let back = t.forward(&z);
        for (i, (&a, &b)) in theta.iter().zip(back.iter()).enumerate() {
            assert!((a - b).abs() < 1e-10, "roundtrip failed at [{}]: {} vs {}", i, a, b);
        }
        assert!(t.log_abs_det_jacobian(&z).is_finite());
    }
}
