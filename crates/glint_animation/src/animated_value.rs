//! Eased values driven by the animation engine

use crate::easing::Easing;
use crate::engine::{AnimationEvents, AnimationHandle, EventCallback, TrackedAnimation};
use crate::error::Result;
use crate::timing::{Timing, TimingConfig, DEFAULT_DURATION};
use std::fmt;
use std::rc::{Rc, Weak};

/// Receives the eased progress and the value that produced it
pub type UpdateCallback = Box<dyn Fn(f32, &AnimatedValue)>;

/// Settings for an [`AnimatedValue`]
pub struct AnimatedValueSettings {
    pub delay: f32,
    pub duration: f32,
    pub ease: Easing,
    /// Drop out of the engine once finished
    pub autodispose: bool,
    on_start: Option<EventCallback>,
    on_finish: Option<EventCallback>,
}

impl AnimatedValueSettings {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    /// Builder: set delay and duration from a timing config
    pub fn with_timing(mut self, config: TimingConfig) -> Self {
        self.delay = config.delay;
        self.duration = config.duration;
        self
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

    /// Builder: set easing
    pub fn with_ease(mut self, ease: impl Into<Easing>) -> Self {
        self.ease = ease.into();
        self
    }

    /// Builder: set autodispose
    pub fn with_autodispose(mut self, autodispose: bool) -> Self {
        self.autodispose = autodispose;
        self
    }

    /// Builder: start callback passed through to the tracked animation
    pub fn on_start<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Builder: finish callback passed through to the tracked animation
    pub fn on_finish<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }
}

impl Default for AnimatedValueSettings {
    fn default() -> Self {
        Self {
            delay: 0.0,
            duration: DEFAULT_DURATION,
            ease: Easing::default(),
            autodispose: true,
            on_start: None,
            on_finish: None,
        }
    }
}

/// A value eased from 0 to 1 over a timed animation.
///
/// Register [`AnimatedValue::animation`] with an
/// [`AnimationEngine`](crate::AnimationEngine); the update callback then runs
/// on every engine tick with the eased progress, including once at progress 1.
///
/// The tracked animation only holds a weak reference back to the value, so
/// dropping the returned `Rc` silences the callback.
pub struct AnimatedValue {
    animation: AnimationHandle,
    ease: Easing,
    update: UpdateCallback,
}

impl AnimatedValue {
    pub fn new<F>(update: F, settings: AnimatedValueSettings) -> Result<Rc<Self>>
    where
        F: Fn(f32, &AnimatedValue) + 'static,
    {
        let timing = Timing::new(settings.delay, settings.duration)?;
        let AnimatedValueSettings {
            ease,
            autodispose,
            on_start,
            on_finish,
            ..
        } = settings;

        Ok(Rc::new_cyclic(|this: &Weak<Self>| {
            let this = this.clone();
            let mut events = AnimationEvents::new().on_tick(move |progress| {
                if let Some(value) = this.upgrade() {
                    value.handle_tick(progress);
                }
            });
            events.set_start(on_start);
            events.set_finish(on_finish);

            Self {
                animation: TrackedAnimation::new(timing, events, autodispose),
                ease,
                update: Box::new(update),
            }
        }))
    }

    /// Handle to register with the engine
    pub fn animation(&self) -> &AnimationHandle {
        &self.animation
    }

    pub fn timing(&self) -> Timing {
        self.animation.timing()
    }

    /// Raw linear progress
    pub fn progress(&self) -> f32 {
        self.animation.progress()
    }

    /// Progress with easing applied
    pub fn eased_progress(&self) -> f32 {
        self.ease.apply(self.progress())
    }

    pub fn easing(&self) -> &Easing {
        &self.ease
    }

    fn handle_tick(&self, progress: f32) {
        (self.update)(self.ease.apply(progress), self);
    }
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("animation", &self.animation)
            .field("ease", &self.ease)
            .finish_non_exhaustive()
    }
}
