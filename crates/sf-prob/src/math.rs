//! Numerically-stable math primitives used across probability code.

/// Stable `log(1 + exp(x))`.
///
/// Uses the identity `log(1+exp(x)) = max(x,0) + log(1+exp(-|x|))`, so the
/// exponential argument is never positive and cannot overflow.
#[inline]
pub fn log1pexp(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    x.max(0.0) + e.ln_1p()
}

/// Stable sigmoid `1 / (1 + exp(-x))`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    let recip = 1.0 / (1.0 + e);
    // x >= 0: 1/(1+exp(-x)); x < 0: exp(x)/(1+exp(x))
    if x >= 0.0 { recip } else { e * recip }
}

/// Stable `log(sigmoid(x))`.
#[inline]
pub fn log_sigmoid(x: f64) -> f64 {
    if x >= 0.0 { -(-x).exp().ln_1p() } else { x - x.exp().ln_1p() }
}

/// Exponential with a conservative two-sided clamp on the argument.
///
/// Keeps renewal-recursion and likelihood intermediates finite when a
/// sampler proposes extreme log-rates; a clamped value yields an enormous
/// (but finite) NLL, which the sampler rejects cleanly instead of crashing
/// a multi-thousand-iteration run.
#[inline]
pub fn exp_clamped(x: f64) -> f64 {
    x.clamp(-700.0, 700.0).exp()
}
