//! Animation timing
//!
//! A [`Timing`] tracks where an animation is along its delay and duration.
//! `progress` is always derived from `time`, except when seeking with
//! [`Timing::set_progress`].

use crate::error::{AnimationError, Result};

/// Default duration used when an animation does not specify one
pub const DEFAULT_DURATION: f32 = 1000.0;

/// Delay/duration pair used to construct a [`Timing`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Time before progress starts moving
    pub delay: f32,
    /// Length of the active part of the animation
    pub duration: f32,
}

impl TimingConfig {
    pub fn new(delay: f32, duration: f32) -> Self {
        Self { delay, duration }
    }

    /// Builder: set delay
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Builder: set duration
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Validate the config and build a fresh [`Timing`]
    pub fn build(self) -> Result<Timing> {
        Timing::new(self.delay, self.duration)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            delay: 0.0,
            duration: DEFAULT_DURATION,
        }
    }
}

/// Timing state of a single animation
///
/// Units are whatever the caller feeds to [`Timing::tick`]; they only need to
/// be consistent with `delay` and `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    delay: f32,
    duration: f32,
    time: f32,
    progress: f32,
    paused: bool,
}

impl Timing {
    /// Create a timing at time zero.
    ///
    /// Fails if either value is negative or not finite.
    pub fn new(delay: f32, duration: f32) -> Result<Self> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(AnimationError::InvalidDelay(delay));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(AnimationError::InvalidDuration(duration));
        }

        Ok(Self {
            delay,
            duration,
            time: 0.0,
            progress: 0.0,
            paused: false,
        })
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Absolute elapsed time, including the delay
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Linear progress through the active duration (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Total time span covered, delay included
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True once progress has reached exactly 1
    pub fn is_finished(&self) -> bool {
        self.progress == 1.0
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance by `dt`.
    ///
    /// Zero-length timings jump straight to the end. `dt` is not clamped;
    /// callers must not pass negative deltas.
    pub fn tick(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.time = self.end_time();
            self.progress = 1.0;
            return;
        }

        self.time = (self.time + dt).min(self.end_time());
        self.progress = self.derive_progress();
    }

    /// Seek to a progress value without firing any events
    pub fn set_progress(&mut self, progress: f32) {
        self.time = self.delay + progress * self.duration;
        self.progress = progress;
    }

    /// Seek to an absolute time, clamped to the timing's span
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.end_time());
        self.progress = if self.duration <= 0.0 {
            1.0
        } else {
            self.derive_progress()
        };
    }

    fn derive_progress(&self) -> f32 {
        (self.time - self.delay).max(0.0) / self.duration
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            delay: 0.0,
            duration: DEFAULT_DURATION,
            time: 0.0,
            progress: 0.0,
            paused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_settings() {
        assert_eq!(
            Timing::new(-1.0, 100.0),
            Err(AnimationError::InvalidDelay(-1.0))
        );
        assert_eq!(
            Timing::new(0.0, -5.0),
            Err(AnimationError::InvalidDuration(-5.0))
        );
        assert!(Timing::new(0.0, f32::NAN).is_err());
        assert!(Timing::new(f32::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_tick_advances_progress() {
        let mut timing = Timing::new(0.0, 100.0).unwrap();
        timing.tick(25.0);
        assert_eq!(timing.time(), 25.0);
        assert_eq!(timing.progress(), 0.25);
    }

    #[test]
    fn test_tick_clamps_to_end() {
        let mut timing = Timing::new(50.0, 100.0).unwrap();
        timing.tick(1000.0);
        assert_eq!(timing.time(), 150.0);
        assert_eq!(timing.progress(), 1.0);
        assert!(timing.is_finished());
    }

    #[test]
    fn test_delay_holds_progress_at_zero() {
        let mut timing = Timing::new(200.0, 100.0).unwrap();
        timing.tick(150.0);
        assert_eq!(timing.progress(), 0.0);
        timing.tick(100.0);
        assert_eq!(timing.progress(), 0.5);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let mut timing = Timing::new(30.0, 0.0).unwrap();
        timing.tick(0.0);
        assert_eq!(timing.progress(), 1.0);
        assert_eq!(timing.time(), 30.0);

        // Idempotent
        timing.tick(10.0);
        assert_eq!(timing.progress(), 1.0);
        assert_eq!(timing.time(), 30.0);
    }

    #[test]
    fn test_set_progress_seeks() {
        let mut timing = Timing::new(100.0, 200.0).unwrap();
        timing.set_progress(0.5);
        assert_eq!(timing.time(), 200.0);
        assert_eq!(timing.progress(), 0.5);

        timing.set_progress(0.0);
        assert_eq!(timing.time(), 100.0);
        assert_eq!(timing.progress(), 0.0);
    }

    #[test]
    fn test_set_time_rederives_progress() {
        let mut timing = Timing::new(100.0, 200.0).unwrap();
        timing.set_time(50.0);
        assert_eq!(timing.progress(), 0.0);
        timing.set_time(200.0);
        assert_eq!(timing.progress(), 0.5);
        timing.set_time(10_000.0);
        assert_eq!(timing.time(), 300.0);
        assert_eq!(timing.progress(), 1.0);
    }

    #[test]
    fn test_config_defaults_and_build() {
        let config = TimingConfig::default();
        assert_eq!(config.delay, 0.0);
        assert_eq!(config.duration, DEFAULT_DURATION);

        let timing = TimingConfig::default()
            .with_delay(10.0)
            .with_duration(20.0)
            .build()
            .unwrap();
        assert_eq!(timing.end_time(), 30.0);
        assert_eq!(timing, Timing::new(10.0, 20.0).unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_keeps_timing_state() {
        let mut timing = Timing::new(100.0, 200.0).unwrap();
        timing.tick(150.0);
        timing.pause();

        let json = serde_json::to_string(&timing).unwrap();
        let restored: Timing = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, timing);
        assert_eq!(restored.progress(), 0.25);
        assert!(restored.is_paused());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_config_fills_missing_fields() {
        let config: TimingConfig = serde_json::from_str(r#"{"duration":250.0}"#).unwrap();
        assert_eq!(config, TimingConfig::new(0.0, 250.0));

        let json = serde_json::to_string(&TimingConfig::new(10.0, 20.0)).unwrap();
        let restored: TimingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, TimingConfig::new(10.0, 20.0));
    }
}
