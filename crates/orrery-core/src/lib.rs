//! Orrery Core - Foundational types for the Orrery demos
//!
//! This crate provides the types every other Orrery crate depends on:
//! - `Vec3`, `Color` - Spatial and color types
//! - `math` - Column-major 4x4 matrix helpers
//! - `MatrixStack` - Hierarchical transform stack
//! - `OrreryConfig` - Layered TOML configuration
//! - Error types and Result alias

mod config;
mod error;
pub mod math;
mod matrix_stack;
mod types;

pub use config::{
    AssetsConfig, CameraConfig, OrreryConfig, ShadowSceneConfig, SolarConfig, WindowConfig,
};
pub use error::{OrreryError, Result};
pub use math::Mat4;
pub use matrix_stack::MatrixStack;
pub use types::{Color, Vec3};
