//! Autonomous exponential smoothing
//!
//! An [`AutonomousSmoothValue`] chases its target on every tick without caring
//! when the motion started. It is not registered with the engine; whoever owns
//! it ticks it.

use crate::interpolation::exp_decay;
use slotmap::{new_key_type, SlotMap};
use std::fmt;

new_key_type! {
    /// Handle returned by [`AutonomousSmoothValue::subscribe`]
    pub struct SubscriberId;
}

/// Approach speed used by [`AutonomousSmoothValue::new`]
pub const DEFAULT_STRENGTH: f32 = 0.1;

/// Distance to target treated as "arrived"
pub const DEFAULT_FINISH_THRESHOLD: f32 = 0.0001;

/// Notifications sent to subscribers at the end of a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SmoothValueEvent {
    /// The value moved this tick
    Progress,
    /// The value came within the finish threshold of the target
    Finished,
}

/// Subscriber callback, receiving the event and the current value
pub type SmoothValueSubscriber = Box<dyn FnMut(SmoothValueEvent, f32)>;

/// A value that decays toward a target, independent of frame rate.
pub struct AutonomousSmoothValue {
    value: f32,
    target: f32,
    strength: f32,
    enabled: bool,
    subscribers: SlotMap<SubscriberId, SmoothValueSubscriber>,
}

impl AutonomousSmoothValue {
    /// Create a value at rest: `value` and `target` both start at `value`.
    pub fn new(value: f32) -> Self {
        Self::with_strength(value, DEFAULT_STRENGTH)
    }

    pub fn with_strength(value: f32, strength: f32) -> Self {
        Self {
            value,
            target: value,
            strength,
            enabled: true,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Slow, floaty approach
    pub fn gentle(value: f32) -> Self {
        Self::with_strength(value, 0.05)
    }

    /// Quick approach that still reads as motion
    pub fn snappy(value: f32) -> Self {
        Self::with_strength(value, 0.3)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value`, cancelling any approach in flight
    pub fn set_absolute(&mut self, value: f32) {
        self.value = value;
        self.target = value;
    }

    /// Approach speed; 0 never moves, 1 is very fast.
    ///
    /// Values outside 0..1 are accepted but give odd speeds.
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Move toward the target by `dt`. Call once per frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        let previous = self.value;
        let was_finished = self.is_finished();
        self.value = exp_decay(self.value, self.target, self.strength, dt);

        if self.subscribers.is_empty() || self.value == previous {
            return;
        }
        self.notify(SmoothValueEvent::Progress);
        if self.is_finished() && !was_finished {
            tracing::trace!(value = self.value, "smooth value reached target");
            self.notify(SmoothValueEvent::Finished);
        }
    }

    /// Check whether the value is within [`DEFAULT_FINISH_THRESHOLD`] of the target
    pub fn is_finished(&self) -> bool {
        self.is_finished_within(DEFAULT_FINISH_THRESHOLD)
    }

    pub fn is_finished_within(&self, threshold: f32) -> bool {
        (self.value - self.target).abs() < threshold
    }

    /// Register a callback fired synchronously at the end of each tick
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriberId
    where
        F: FnMut(SmoothValueEvent, f32) + 'static,
    {
        self.subscribers.insert(Box::new(subscriber))
    }

    /// Returns whether the subscriber was still registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    fn notify(&mut self, event: SmoothValueEvent) {
        let value = self.value;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event, value);
        }
    }
}

impl Default for AutonomousSmoothValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for AutonomousSmoothValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutonomousSmoothValue")
            .field("value", &self.value)
            .field("target", &self.target)
            .field("strength", &self.strength)
            .field("enabled", &self.enabled)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
