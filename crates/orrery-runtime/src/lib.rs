//! Orrery Runtime - Frame loop building blocks
//!
//! - `AnimationClock` - elapsed time driving the animations, plus frame delta
//! - `InputState` - keyboard tracking with named action bindings

mod clock;
mod input;

pub use clock::AnimationClock;
pub use input::InputState;
