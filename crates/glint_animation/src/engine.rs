//! Animation engine
//!
//! Tracks timed animations and advances them once per frame. Animations are
//! shared with their creator through [`AnimationHandle`]s and membership is
//! keyed on each animation's [`AnimationId`], so the handle used to `add` is
//! the same one used to `remove`.
//!
//! ```ignore
//! let engine = AnimationEngine::new();
//! engine.add(value.animation());
//! loop {
//!     engine.tick(frame_dt);
//! }
//! ```

use crate::timing::Timing;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identity of a tracked animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        AnimationId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Lifecycle callback
pub type EventCallback = Box<dyn Fn()>;

/// Per-tick callback receiving raw linear progress
pub type TickCallback = Box<dyn Fn(f32)>;

/// Lifecycle callbacks fired by the engine
#[derive(Default)]
pub struct AnimationEvents {
    on_start: Option<EventCallback>,
    on_finish: Option<EventCallback>,
    on_tick: Option<TickCallback>,
}

impl AnimationEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired on every tick that begins with progress at exactly 0
    pub fn on_start<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Fired once, on the tick that brings progress to 1
    pub fn on_finish<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// Fired on every tick after the timing has advanced
    pub fn on_tick<F: Fn(f32) + 'static>(mut self, callback: F) -> Self {
        self.on_tick = Some(Box::new(callback));
        self
    }

    pub(crate) fn set_start(&mut self, callback: Option<EventCallback>) {
        self.on_start = callback;
    }

    pub(crate) fn set_finish(&mut self, callback: Option<EventCallback>) {
        self.on_finish = callback;
    }

    fn fire_start(&self) {
        if let Some(callback) = &self.on_start {
            callback();
        }
    }

    fn fire_finish(&self) {
        if let Some(callback) = &self.on_finish {
            callback();
        }
    }

    fn fire_tick(&self, progress: f32) {
        if let Some(callback) = &self.on_tick {
            callback(progress);
        }
    }
}

/// An animation the engine can track
pub struct TrackedAnimation {
    id: AnimationId,
    timing: Cell<Timing>,
    events: AnimationEvents,
    autodispose: Cell<bool>,
}

/// Shared reference to a tracked animation
pub type AnimationHandle = Rc<TrackedAnimation>;

impl TrackedAnimation {
    pub fn new(timing: Timing, events: AnimationEvents, autodispose: bool) -> AnimationHandle {
        Rc::new(Self {
            id: AnimationId::next(),
            timing: Cell::new(timing),
            events,
            autodispose: Cell::new(autodispose),
        })
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    /// Snapshot of the current timing
    pub fn timing(&self) -> Timing {
        self.timing.get()
    }

    pub fn set_timing(&self, timing: Timing) {
        self.timing.set(timing);
    }

    /// Mutate the timing in place
    pub fn update_timing<R>(&self, f: impl FnOnce(&mut Timing) -> R) -> R {
        let mut timing = self.timing.get();
        let result = f(&mut timing);
        self.timing.set(timing);
        result
    }

    pub fn progress(&self) -> f32 {
        self.timing.get().progress()
    }

    /// Seek without firing events
    pub fn set_progress(&self, progress: f32) {
        self.update_timing(|timing| timing.set_progress(progress));
    }

    pub fn is_paused(&self) -> bool {
        self.timing.get().is_paused()
    }

    pub fn pause(&self) {
        self.update_timing(Timing::pause);
    }

    pub fn resume(&self) {
        self.update_timing(Timing::resume);
    }

    pub fn autodispose(&self) -> bool {
        self.autodispose.get()
    }

    pub fn set_autodispose(&self, autodispose: bool) {
        self.autodispose.set(autodispose);
    }

    pub fn events(&self) -> &AnimationEvents {
        &self.events
    }
}

impl fmt::Debug for TrackedAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedAnimation")
            .field("id", &self.id)
            .field("timing", &self.timing.get())
            .field("autodispose", &self.autodispose.get())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tracked set
// ============================================================================

/// Insertion-ordered set of handles.
///
/// Removal leaves a tombstone so slot positions stay stable while a tick pass
/// is walking them; tombstones are compacted away between passes.
#[derive(Default)]
struct TrackSet {
    slots: Vec<Option<AnimationHandle>>,
    index: FxHashMap<AnimationId, usize>,
    tombstones: usize,
}

impl TrackSet {
    fn insert(&mut self, animation: &AnimationHandle) -> bool {
        if self.index.contains_key(&animation.id) {
            return false;
        }
        self.index.insert(animation.id, self.slots.len());
        self.slots.push(Some(Rc::clone(animation)));
        true
    }

    fn remove(&mut self, id: AnimationId) -> bool {
        let Some(slot) = self.index.remove(&id) else {
            return false;
        };
        self.slots[slot] = None;
        self.tombstones += 1;
        true
    }

    fn contains(&self, id: AnimationId) -> bool {
        self.index.contains_key(&id)
    }

    fn get(&self, slot: usize) -> Option<AnimationHandle> {
        self.slots.get(slot).and_then(Clone::clone)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn compact(&mut self) {
        if self.tombstones == 0 {
            return;
        }
        tracing::debug!(tombstones = self.tombstones, "compacting tracked animations");

        self.slots.retain(Option::is_some);
        for (slot, animation) in self.slots.iter().enumerate() {
            if let Some(animation) = animation {
                self.index.insert(animation.id, slot);
            }
        }
        self.tombstones = 0;
    }

    fn clear(&mut self) {
        self.tombstones += self.index.len();
        self.index.clear();
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Advances tracked animations once per frame.
///
/// All methods take `&self` so callbacks may hold an `Rc<AnimationEngine>` and
/// add or remove animations while a tick is in progress.
#[derive(Default)]
pub struct AnimationEngine {
    tracked: RefCell<TrackSet>,
    /// Number of `tick` passes currently on the stack
    passes: Cell<u32>,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an animation. Adding it twice is a no-op.
    pub fn add(&self, animation: &AnimationHandle) {
        if self.tracked.borrow_mut().insert(animation) {
            tracing::trace!(id = ?animation.id(), "animation added");
        }
    }

    /// Stop tracking an animation.
    ///
    /// Returns whether it was tracked. Takes effect immediately, including for
    /// the rest of a tick pass in progress.
    pub fn remove(&self, animation: &AnimationHandle) -> bool {
        self.remove_id(animation.id())
    }

    pub fn remove_id(&self, id: AnimationId) -> bool {
        let mut tracked = self.tracked.borrow_mut();
        let removed = tracked.remove(id);
        if removed {
            tracing::trace!(?id, "animation removed");
            if self.passes.get() == 0 && tracked.tombstones * 2 > tracked.slots.len() {
                tracked.compact();
            }
        }
        removed
    }

    pub fn contains(&self, animation: &AnimationHandle) -> bool {
        self.tracked.borrow().contains(animation.id())
    }

    /// Number of tracked animations
    pub fn len(&self) -> usize {
        self.tracked.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop tracking everything
    pub fn clear(&self) {
        let mut tracked = self.tracked.borrow_mut();
        tracked.clear();
        if self.passes.get() == 0 {
            tracked.compact();
        }
    }

    /// Tracked handles in registration order
    pub fn animations(&self) -> Vec<AnimationHandle> {
        self.tracked.borrow().slots.iter().flatten().cloned().collect()
    }

    /// Check if any tracked animation is unpaused and not yet finished
    pub fn has_active_animations(&self) -> bool {
        self.tracked.borrow().slots.iter().flatten().any(|animation| {
            let timing = animation.timing();
            !timing.is_paused() && !timing.is_finished()
        })
    }

    /// Advance every tracked animation by `dt`.
    ///
    /// Animations are visited in registration order. Ones added during this
    /// pass are first visited on the next tick; ones removed during this pass
    /// get no further events.
    pub fn tick(&self, dt: f32) {
        let _pass = PassGuard::enter(self);
        let pass_len = self.tracked.borrow().slots.len();

        for slot in 0..pass_len {
            let animation = self.tracked.borrow().get(slot);
            let Some(animation) = animation else {
                continue;
            };
            self.step(&animation, dt);
        }
    }

    fn step(&self, animation: &AnimationHandle, dt: f32) {
        let timing = animation.timing();
        if timing.is_paused() {
            return;
        }

        let was_finished = timing.progress() == 1.0;

        // Fires on every tick spent at zero, delay window included
        if timing.progress() == 0.0 {
            animation.events.fire_start();
            if !self.contains(animation) {
                return;
            }
        }

        let progress = animation.update_timing(|timing| {
            timing.tick(dt);
            timing.progress()
        });

        if progress == 1.0 && !was_finished {
            tracing::trace!(id = ?animation.id(), "animation finished");
            if animation.autodispose() {
                // Already deregistered when the callback runs, even if it panics
                if self.tracked.borrow_mut().remove(animation.id()) {
                    tracing::debug!(id = ?animation.id(), "animation autodisposed");
                }
                animation.events.fire_finish();
            } else {
                animation.events.fire_finish();
                if !self.contains(animation) {
                    return;
                }
            }
        }

        animation.events.fire_tick(progress);
    }
}

/// Marks a tick pass in progress; compacts the tracked set once the
/// outermost pass ends, even when unwinding from a callback panic.
struct PassGuard<'a> {
    engine: &'a AnimationEngine,
}

impl<'a> PassGuard<'a> {
    fn enter(engine: &'a AnimationEngine) -> Self {
        engine.passes.set(engine.passes.get() + 1);
        Self { engine }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        let passes = self.engine.passes.get() - 1;
        self.engine.passes.set(passes);
        if passes == 0 {
            if let Ok(mut tracked) = self.engine.tracked.try_borrow_mut() {
                tracked.compact();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn timing(delay: f32, duration: f32) -> Timing {
        Timing::new(delay, duration).unwrap()
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, move || count_clone.set(count_clone.get() + 1))
    }

    #[test]
    fn test_does_not_tick_paused_animations() {
        let engine = AnimationEngine::new();
        let (starts, on_start) = counter();
        let animation = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_start(on_start),
            true,
        );
        animation.pause();
        engine.add(&animation);

        let before = animation.timing();
        for _ in 0..5 {
            engine.tick(100.0);
        }

        assert_eq!(animation.timing(), before);
        assert_eq!(starts.get(), 0);
        assert!(engine.contains(&animation));
    }

    #[test]
    fn test_ticks_unpaused_animations() {
        let engine = AnimationEngine::new();
        let animation = TrackedAnimation::new(timing(0.0, 200.0), AnimationEvents::new(), true);
        engine.add(&animation);

        engine.tick(100.0);

        assert_eq!(animation.timing().time(), 100.0);
        assert_eq!(animation.progress(), 0.5);
    }

    #[test]
    fn test_start_fires_while_progress_is_zero() {
        let engine = AnimationEngine::new();
        let (starts, on_start) = counter();
        let animation = TrackedAnimation::new(
            timing(100.0, 100.0),
            AnimationEvents::new().on_start(on_start),
            false,
        );
        engine.add(&animation);

        assert_eq!(starts.get(), 0);

        // Both ticks begin inside the delay window
        engine.tick(50.0);
        engine.tick(50.0);
        assert_eq!(starts.get(), 2);

        // Third tick still begins at zero, the fourth does not
        engine.tick(50.0);
        engine.tick(10.0);
        assert_eq!(starts.get(), 3);
    }

    #[test]
    fn test_finish_fires_exactly_once() {
        let engine = AnimationEngine::new();
        let (finishes, on_finish) = counter();
        let animation = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_finish(on_finish),
            false,
        );
        engine.add(&animation);

        engine.tick(50.0);
        assert_eq!(finishes.get(), 0);

        engine.tick(50.0);
        assert_eq!(finishes.get(), 1);

        engine.tick(100.0);
        engine.tick(100.0);
        assert_eq!(finishes.get(), 1);
    }

    #[test]
    fn test_tick_receives_raw_progress_in_order() {
        let engine = AnimationEngine::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let start_log = log.clone();
        let finish_log = log.clone();
        let tick_log = log.clone();
        let animation = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new()
                .on_start(move || start_log.borrow_mut().push("start".to_string()))
                .on_finish(move || finish_log.borrow_mut().push("finish".to_string()))
                .on_tick(move |p| tick_log.borrow_mut().push(format!("tick {p}"))),
            true,
        );
        engine.add(&animation);

        engine.tick(100.0);

        assert_eq!(*log.borrow(), vec!["start", "finish", "tick 1"]);
    }

    #[test]
    fn test_autodispose_removes_finished() {
        let engine = AnimationEngine::new();
        let (ticks, on_tick) = counter();
        let animation = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_tick(move |_| on_tick()),
            true,
        );
        engine.add(&animation);

        engine.tick(100.0);
        assert_eq!(ticks.get(), 1);
        assert!(!engine.contains(&animation));
        assert!(engine.is_empty());

        animation.set_progress(0.0);
        engine.tick(100.0);
        assert_eq!(ticks.get(), 1);
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let engine = AnimationEngine::new();
        let animation = TrackedAnimation::new(timing(0.0, 100.0), AnimationEvents::new(), true);

        engine.add(&animation);
        engine.add(&animation);
        assert_eq!(engine.len(), 1);

        assert!(engine.remove(&animation));
        assert!(!engine.remove(&animation));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_iteration_follows_registration_order() {
        let engine = AnimationEngine::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let order = order.clone();
                TrackedAnimation::new(
                    timing(0.0, 100.0),
                    AnimationEvents::new().on_tick(move |_| order.borrow_mut().push(i)),
                    false,
                )
            })
            .collect();

        for handle in handles.iter().rev() {
            engine.add(handle);
        }
        engine.remove(&handles[2]);
        engine.add(&handles[2]);

        engine.tick(10.0);

        assert_eq!(*order.borrow(), vec![3, 1, 0, 2]);
        let ids: Vec<_> = engine.animations().iter().map(|a| a.id()).collect();
        assert_eq!(
            ids,
            vec![handles[3].id(), handles[1].id(), handles[0].id(), handles[2].id()]
        );
    }

    #[test]
    fn test_remove_sibling_from_callback() {
        let engine = Rc::new(AnimationEngine::new());
        let (second_ticks, on_second_tick) = counter();

        let second = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_tick(move |_| on_second_tick()),
            false,
        );

        let engine_clone = engine.clone();
        let second_clone = second.clone();
        let first = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_tick(move |_| {
                engine_clone.remove(&second_clone);
            }),
            false,
        );

        engine.add(&first);
        engine.add(&second);

        engine.tick(10.0);

        assert_eq!(second_ticks.get(), 0);
        assert_eq!(engine.len(), 1);
        assert!(engine.contains(&first));
    }

    #[test]
    fn test_add_from_callback_waits_for_next_pass() {
        let engine = Rc::new(AnimationEngine::new());
        let (late_ticks, on_late_tick) = counter();

        let late = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_tick(move |_| on_late_tick()),
            false,
        );

        let engine_clone = engine.clone();
        let late_clone = late.clone();
        let early = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_start(move || engine_clone.add(&late_clone)),
            false,
        );
        engine.add(&early);

        engine.tick(10.0);
        assert_eq!(late_ticks.get(), 0);
        assert!(engine.contains(&late));

        engine.tick(10.0);
        assert_eq!(late_ticks.get(), 1);
    }

    #[test]
    fn test_self_removal_in_start_skips_remaining_events() {
        let engine = Rc::new(AnimationEngine::new());
        let (ticks, on_tick) = counter();
        let slot: Rc<RefCell<Option<AnimationHandle>>> = Rc::new(RefCell::new(None));

        let engine_clone = engine.clone();
        let slot_clone = slot.clone();
        let animation = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new()
                .on_start(move || {
                    if let Some(me) = slot_clone.borrow().as_ref() {
                        engine_clone.remove(me);
                    }
                })
                .on_tick(move |_| on_tick()),
            false,
        );
        *slot.borrow_mut() = Some(animation.clone());
        engine.add(&animation);

        engine.tick(10.0);

        assert_eq!(ticks.get(), 0);
        assert_eq!(animation.progress(), 0.0);
        assert!(engine.is_empty());
        slot.borrow_mut().take();
    }

    #[test]
    fn test_panicking_finish_still_disposes() {
        let engine = AnimationEngine::new();
        let animation = TrackedAnimation::new(
            timing(0.0, 100.0),
            AnimationEvents::new().on_finish(|| panic!("finish callback failed")),
            true,
        );
        engine.add(&animation);

        let result = catch_unwind(AssertUnwindSafe(|| engine.tick(100.0)));
        assert!(result.is_err());
        assert!(!engine.contains(&animation));

        // Engine is still usable afterwards
        let other = TrackedAnimation::new(timing(0.0, 100.0), AnimationEvents::new(), true);
        engine.add(&other);
        engine.tick(50.0);
        assert_eq!(other.progress(), 0.5);
    }

    #[test]
    fn test_has_active_animations() {
        let engine = AnimationEngine::new();
        assert!(!engine.has_active_animations());

        let animation = TrackedAnimation::new(timing(0.0, 100.0), AnimationEvents::new(), false);
        engine.add(&animation);
        assert!(engine.has_active_animations());

        animation.pause();
        assert!(!engine.has_active_animations());

        animation.resume();
        engine.tick(100.0);
        assert!(engine.contains(&animation));
        assert!(!engine.has_active_animations());
    }

    #[test]
    fn test_clear() {
        let engine = AnimationEngine::new();
        let a = TrackedAnimation::new(timing(0.0, 100.0), AnimationEvents::new(), false);
        let b = TrackedAnimation::new(timing(0.0, 100.0), AnimationEvents::new(), false);
        engine.add(&a);
        engine.add(&b);

        engine.clear();
        assert!(engine.is_empty());
        assert!(engine.animations().is_empty());

        engine.add(&b);
        assert_eq!(engine.animations()[0].id(), b.id());
    }
}
