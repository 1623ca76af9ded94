//! Animation Engine Demo
//!
//! Drives a few animated values and a smooth value from a simulated 60fps
//! frame loop and prints their values:
//! - A linear value and a delayed elastic value sharing one engine
//! - A smooth value chasing the elastic value's output
//!
//! Run with: RUST_LOG=trace cargo run -p glint_animation --example engine_demo

use glint_animation::{
    AnimatedValue, AnimatedValueSettings, AnimationEngine, AutonomousSmoothValue, EaseKind,
    Easing, Result,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const FRAME_MS: f32 = 1000.0 / 60.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = AnimationEngine::new();

    let fade = Rc::new(Cell::new(0.0f32));
    let fade_out = fade.clone();
    let fade_value = AnimatedValue::new(
        move |eased, _| fade_out.set(eased),
        AnimatedValueSettings::new(400.0).with_ease(EaseKind::EaseBoth),
    )?;

    let follower = Rc::new(RefCell::new(AutonomousSmoothValue::new(0.0)));
    let follower_target = follower.clone();
    let bounce_value = AnimatedValue::new(
        move |eased, _| follower_target.borrow_mut().set_target(eased * 100.0),
        AnimatedValueSettings::new(600.0)
            .with_delay(200.0)
            .with_ease(Easing::elastic(1.5, 0.4))
            .on_finish(|| tracing::info!("bounce finished")),
    )?;

    engine.add(fade_value.animation());
    engine.add(bounce_value.animation());

    let mut frame = 0;
    while engine.has_active_animations() || !follower.borrow().is_finished_within(0.5) {
        engine.tick(FRAME_MS);
        follower.borrow_mut().tick(FRAME_MS / 1000.0);

        if frame % 6 == 0 {
            tracing::info!(
                frame,
                fade = fade.get(),
                bounce = bounce_value.eased_progress(),
                follower = follower.borrow().value(),
                "frame"
            );
        }
        frame += 1;
    }

    tracing::info!(frames = frame, "all animations settled");
    Ok(())
}
