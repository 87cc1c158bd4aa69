//! Orrery Player - windowed and offscreen front ends
//!
//! `PlayerApp` runs a demo in a winit window; `render_to_png` draws a
//! single frame offscreen and saves it.

mod player_app;
mod screenshot;

pub use player_app::PlayerApp;
pub use screenshot::{render_frame, render_to_png};
