//! Glint Animation System
//!
//! Frame-driven animation primitives, advanced by caller-supplied time deltas.
//!
//! # Features
//!
//! - **Timing**: delay/duration/progress tracking with seeking and pausing
//! - **Easing**: named power curves, elastic overshoot, and custom functions
//! - **Animation Engine**: ordered tracking with start/finish/tick events and autodispose
//! - **Animated Values**: eased progress forwarded to an update callback
//! - **Smooth Values**: frame-rate independent exponential approach to a target
//!
//! Everything here is single-threaded; the caller ticks it once per frame.

pub mod animated_value;
pub mod easing;
pub mod engine;
pub mod error;
pub mod interpolation;
pub mod shaping;
pub mod smooth;
pub mod timing;

pub use animated_value::{AnimatedValue, AnimatedValueSettings};
pub use easing::{EaseFn, EaseKind, Easing, Elastic, PowerCurve};
pub use engine::{AnimationEngine, AnimationEvents, AnimationHandle, AnimationId, TrackedAnimation};
pub use error::{AnimationError, Result};
pub use interpolation::{exp_decay, lerp};
pub use shaping::cubic_pulse;
pub use smooth::{AutonomousSmoothValue, SmoothValueEvent, SubscriberId};
pub use timing::{Timing, TimingConfig};
