//! Easing functions for animations
//!
//! Named curves resolve through a fixed table of function pointers. Anything
//! else (power curves with a custom exponent, elastic curves, user closures)
//! goes through [`Easing`].

use std::f32::consts::PI;
use std::fmt;
use std::rc::Rc;

/// Plain easing function pointer
pub type EaseFn = fn(f32) -> f32;

/// Exponent used by the named power curves
pub const DEFAULT_POWER: f32 = 2.5;

/// Named easing curves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EaseKind {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseBoth,
}

/// Indexed by `EaseKind as usize`
const EASE_TABLE: [EaseFn; 4] = [linear, ease_in, ease_out, ease_both];

impl EaseKind {
    pub const ALL: [EaseKind; 4] = [
        EaseKind::Linear,
        EaseKind::EaseIn,
        EaseKind::EaseOut,
        EaseKind::EaseBoth,
    ];

    /// Look up the function backing this curve
    pub fn ease_fn(self) -> EaseFn {
        EASE_TABLE[self as usize]
    }

    pub fn apply(self, progress: f32) -> f32 {
        self.ease_fn()(progress)
    }
}

pub fn linear(progress: f32) -> f32 {
    progress
}

pub fn ease_in(progress: f32) -> f32 {
    power_in(progress, DEFAULT_POWER)
}

pub fn ease_out(progress: f32) -> f32 {
    power_out(progress, DEFAULT_POWER)
}

pub fn ease_both(progress: f32) -> f32 {
    power_both(progress, DEFAULT_POWER)
}

/// `p^s`
pub fn power_in(progress: f32, strength: f32) -> f32 {
    progress.powf(strength)
}

/// `1 - (1-p)^s`
pub fn power_out(progress: f32, strength: f32) -> f32 {
    1.0 - (1.0 - progress).powf(strength)
}

/// Ease in on the first half, mirrored ease in on the second half.
///
/// Continuous at 0.5 and point-symmetric around (0.5, 0.5).
pub fn power_both(progress: f32, strength: f32) -> f32 {
    if progress < 0.5 {
        power_in(progress * 2.0, strength) * 0.5
    } else {
        1.0 - power_in((1.0 - progress) * 2.0, strength) * 0.5
    }
}

/// Which end(s) of a power curve are eased
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerCurve {
    In,
    Out,
    Both,
}

// ============================================================================
// Elastic
// ============================================================================

/// Damped-sine overshoot curve
///
/// Oscillates around the start and settles into 1 at the end, leaving [0, 1]
/// on the way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Elastic {
    amplitude: f32,
    period: f32,
    phase: f32,
    frequency: f32,
}

impl Elastic {
    pub const AMPLITUDE_RANGE: (f32, f32) = (1.0, 10.0);
    pub const PERIOD_RANGE: (f32, f32) = (0.1, 2.0);

    /// Build an elastic curve, clamping amplitude and period into range.
    pub fn new(amplitude: f32, period: f32) -> Self {
        let (min_amp, max_amp) = Self::AMPLITUDE_RANGE;
        let (min_period, max_period) = Self::PERIOD_RANGE;

        let a = amplitude.clamp(min_amp, max_amp);
        let p = period.clamp(min_period, max_period);

        if a != amplitude || p != period {
            tracing::warn!(
                amplitude,
                period,
                clamped_amplitude = a,
                clamped_period = p,
                "elastic easing parameters out of range, clamping"
            );
        }

        Self {
            amplitude: a,
            period: p,
            phase: p / (2.0 * PI) * (1.0 / a).asin(),
            frequency: 2.0 * PI / p,
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn apply(&self, t: f32) -> f32 {
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let shifted = t - 1.0;
        let decay = 2f32.powf(10.0 * shifted);
        -self.amplitude * decay * ((shifted - self.phase) * self.frequency).sin()
    }
}

impl Default for Elastic {
    fn default() -> Self {
        Self::new(1.0, 0.3)
    }
}

// ============================================================================
// Easing parameter
// ============================================================================

/// Any easing an animation can be driven by
#[derive(Clone)]
pub enum Easing {
    Kind(EaseKind),
    Power { curve: PowerCurve, strength: f32 },
    Elastic(Elastic),
    Custom(Rc<dyn Fn(f32) -> f32>),
}

impl Easing {
    /// Wrap an arbitrary function.
    ///
    /// Custom functions should map 0 to 0 and 1 to 1; the final callback of
    /// an [`AnimatedValue`](crate::AnimatedValue) otherwise lands off target.
    pub fn custom<F: Fn(f32) -> f32 + 'static>(f: F) -> Self {
        Easing::Custom(Rc::new(f))
    }

    pub fn power(curve: PowerCurve, strength: f32) -> Self {
        Easing::Power { curve, strength }
    }

    pub fn elastic(amplitude: f32, period: f32) -> Self {
        Easing::Elastic(Elastic::new(amplitude, period))
    }

    /// Apply the easing to a linear progress value (0.0 to 1.0)
    pub fn apply(&self, progress: f32) -> f32 {
        match self {
            Easing::Kind(kind) => kind.apply(progress),
            Easing::Power { curve, strength } => match curve {
                PowerCurve::In => power_in(progress, *strength),
                PowerCurve::Out => power_out(progress, *strength),
                PowerCurve::Both => power_both(progress, *strength),
            },
            Easing::Elastic(elastic) => elastic.apply(progress),
            Easing::Custom(f) => f(progress),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Kind(EaseKind::Linear)
    }
}

impl From<EaseKind> for Easing {
    fn from(kind: EaseKind) -> Self {
        Easing::Kind(kind)
    }
}

impl From<Elastic> for Easing {
    fn from(elastic: Elastic) -> Self {
        Easing::Elastic(elastic)
    }
}

impl From<EaseFn> for Easing {
    fn from(f: EaseFn) -> Self {
        Easing::Custom(Rc::new(f))
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Easing::Power { curve, strength } => f
                .debug_struct("Power")
                .field("curve", curve)
                .field("strength", strength)
                .finish(),
            Easing::Elastic(elastic) => f.debug_tuple("Elastic").field(elastic).finish(),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
