//! Console simulator of Earth, Moon and Sun orbital geometry and eclipse conditions.
//!
//! The model ([`animation::AnimationDriver`]) owns the two orbit angles and
//! advances them frame by frame; the view ([`widget::SimulatorWidget`])
//! only receives derived positions and notifications.

pub mod animation;
pub mod config;
pub mod controls;
pub mod eclipse;
pub mod error;
pub mod graphics;
pub mod math;
pub mod notify;
pub mod sprite;
pub mod state;
pub mod widget;
