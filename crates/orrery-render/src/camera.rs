//! Perspective projection settings

use orrery_core::math::{self, Mat4};
use orrery_core::CameraConfig;

/// Vertical field of view and clip planes, plus the current viewport aspect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
        }
    }
}

impl Projection {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            aspect,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        math::perspective(self.fov_degrees, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_sets_aspect() {
        let mut p = Projection::default();
        p.set_viewport(1600, 800);
        assert_eq!(p.aspect, 2.0);
        let m = p.matrix();
        assert!((m[1][1] / m[0][0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_from_config_defaults() {
        let p = Projection::from_config(&CameraConfig::default(), 1.0);
        assert_eq!(p, Projection::default());
    }
}
