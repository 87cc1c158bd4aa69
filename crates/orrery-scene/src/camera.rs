//! Free-fly camera driven by yaw and pitch

use orrery_core::math::{self, Mat4};
use orrery_core::{CameraConfig, Vec3};

/// Largest pitch magnitude, just short of straight up or down
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// A camera that moves along its own axes. Yaw and pitch are in radians;
/// yaw 0 and pitch 0 look down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 15.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl FlyCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cp * sy, sp, -cp * cy).normalized()
    }

    /// Rightward direction, kept level with the horizon
    pub fn side(&self) -> Vec3 {
        self.forward().cross(&Vec3::UP).normalized()
    }

    pub fn up(&self) -> Vec3 {
        self.side().cross(&self.forward())
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    pub fn move_side(&mut self, distance: f32) {
        self.position += self.side() * distance;
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position += self.up() * distance;
    }

    pub fn turn(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn view_matrix(&self) -> Mat4 {
        math::look_at(self.position, self.position + self.forward(), Vec3::UP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_default_basis() {
        let cam = FlyCamera::default();
        assert!(approx(cam.forward(), Vec3::new(0.0, 0.0, -1.0)));
        assert!(approx(cam.side(), Vec3::X));
        assert!(approx(cam.up(), Vec3::UP));
    }

    #[test]
    fn test_yaw_right_turns_towards_positive_x() {
        let mut cam = FlyCamera::default();
        cam.turn(std::f32::consts::FRAC_PI_2, 0.0);
        assert!(approx(cam.forward(), Vec3::X));
        assert!(approx(cam.side(), Vec3::Z));
    }

    #[test]
    fn test_movement_along_axes() {
        let mut cam = FlyCamera::default();
        cam.move_forward(0.5);
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, 14.5)));
        cam.move_side(-0.5);
        assert!(approx(cam.position, Vec3::new(-0.5, 0.0, 14.5)));
        cam.move_up(0.5);
        assert!(approx(cam.position, Vec3::new(-0.5, 0.5, 14.5)));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = FlyCamera::default();
        cam.turn(0.0, 10.0);
        assert!((cam.pitch - PITCH_LIMIT).abs() < 1e-6);
        assert!(cam.side().length() > 0.99);
        assert!(cam.view_matrix().iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_view_matrix_puts_origin_in_front() {
        let cam = FlyCamera::default();
        let p = math::transform_point(&cam.view_matrix(), Vec3::ZERO);
        assert!(approx(p, Vec3::new(0.0, 0.0, -15.0)));
    }
}
