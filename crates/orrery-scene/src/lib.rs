//! Orrery Scene - What to draw each frame
//!
//! Each demo turns the current animation time and its interactive state into
//! a `FrameDesc`: an ordered list of textured meshes with model matrices, plus
//! optional lines, skybox and lighting. The renderer consumes the description
//! without knowing which demo produced it.

mod camera;
mod demo;
mod frame;
mod light;
mod shadows;
mod solar;

pub use camera::FlyCamera;
pub use demo::{actions, Demo, DemoEvent, DemoState};
pub use frame::{
    DrawItem, FrameDesc, LightingDesc, LineItem, MeshKey, Shading, SkyboxItem, TextureSpec,
};
pub use light::{Material, PositionalLight};
pub use shadows::{LightState, ShadowScene};
pub use solar::SolarSystem;
