//! Interpolation helpers

/// Decay rate reached at `decay_speed == 1.0`.
///
/// Keeps useful speeds within a 0..1 input range.
pub const DECAY_RATE_SCALE: f32 = 30.0;

/// Linear interpolation between `a` and `b`.
///
/// Not suitable for per-frame smoothing (`a = lerp(a, b, t)` every frame),
/// which depends on the frame rate. Use [`exp_decay`] for that.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Move `a` toward `b` by exponential decay over `dt`.
///
/// Splitting `dt` into several smaller steps gives the same result, since the
/// remaining gap shrinks by a constant factor per unit of time.
pub fn exp_decay(a: f32, b: f32, decay_speed: f32, dt: f32) -> f32 {
    let rate = lerp(0.0, DECAY_RATE_SCALE, decay_speed);
    b + (a - b) * (-rate * dt).exp()
}
