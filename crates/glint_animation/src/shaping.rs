//! Shaping functions
//!
//! See <https://iquilezles.org/articles/functions>.

/// Smooth bump of half-width `width` centred on `center`.
///
/// 1.0 at `center`, falling to 0.0 at `center ± width` and staying there.
pub fn cubic_pulse(center: f32, width: f32, x: f32) -> f32 {
    let distance = (x - center).abs();
    if distance > width {
        return 0.0;
    }
    let x = distance / width;
    1.0 - x * x * (3.0 - 2.0 * x)
}
