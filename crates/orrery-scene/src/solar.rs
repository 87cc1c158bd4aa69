//! Animated solar system
//!
//! A sun with an earth and moon, mars with phobos, and a pentagonal prism,
//! all built as a transform hierarchy. Orbits are driven by elapsed seconds
//! and spins by elapsed milliseconds.

use crate::frame::{DrawItem, FrameDesc, LineItem, MeshKey, TextureSpec};
use orrery_core::{Color, MatrixStack, Result, SolarConfig, Vec3};

pub const SUN: &str = "sun";
pub const EARTH: &str = "earth";
pub const MOON: &str = "moon";
pub const MARS: &str = "mars";
pub const PHOBOS: &str = "phobos";
pub const PRISM: &str = "me";

/// Degrees turned after `ms` milliseconds at one degree per `period_ms`
fn spin(ms: f64, period_ms: f64) -> f32 {
    ((ms / period_ms) % 360.0) as f32
}

#[derive(Debug, Clone)]
pub struct SolarSystem {
    pub show_axes: bool,
    pub axis_length: f32,
}

impl SolarSystem {
    pub fn new(config: &SolarConfig) -> Self {
        Self {
            show_axes: config.show_axes,
            axis_length: config.axis_length,
        }
    }

    pub fn textures() -> Vec<TextureSpec> {
        vec![
            TextureSpec::new(SUN, "sun.jpg", Color::new(1.0, 0.8, 0.2, 1.0)),
            TextureSpec::new(EARTH, "earth.jpg", Color::new(0.2, 0.4, 0.9, 1.0)),
            TextureSpec::new(MOON, "moon.jpg", Color::gray(0.7)),
            TextureSpec::new(MARS, "mars.jpg", Color::new(0.8, 0.35, 0.2, 1.0)),
            TextureSpec::new(PHOBOS, "phobos.jpg", Color::new(0.5, 0.45, 0.4, 1.0)),
            TextureSpec::new(PRISM, "me.jpg", Color::new(0.9, 0.9, 0.9, 1.0)),
        ]
    }

    /// Returns the new axes visibility
    pub fn toggle_axes(&mut self) -> bool {
        self.show_axes = !self.show_axes;
        self.show_axes
    }

    /// Describe the system at `seconds` after start
    pub fn frame(&self, seconds: f64) -> Result<FrameDesc> {
        let t = seconds;
        let ms = seconds * 1000.0;
        let mut frame = FrameDesc::default();
        let mut stack = MatrixStack::new();

        // Sun
        stack.push();
        stack.translate(0.0, 0.0, 0.0);
        stack.push();
        stack.rotate_y(spin(ms, 100.0));
        frame.objects.push(DrawItem::unlit(MeshKey::Sphere, SUN, *stack.top()));
        stack.pop()?;

        // Earth and moon
        stack.push();
        stack.translate((t.sin() * 4.0) as f32, 0.0, (t.cos() * 4.0) as f32);
        stack.push();
        stack.rotate_y(spin(ms, 50.0));
        stack.scale(0.75, 0.75, 0.75);
        frame.objects.push(DrawItem::unlit(MeshKey::Sphere, EARTH, *stack.top()));
        stack.pop()?;

        stack.push();
        stack.translate(0.0, (t.sin() * 2.0) as f32, (t.cos() * 2.0) as f32);
        stack.rotate_z(spin(ms, 10.0));
        stack.scale(0.25, 0.25, 0.25);
        frame.objects.push(DrawItem::unlit(MeshKey::Sphere, MOON, *stack.top()));
        stack.pop()?;
        stack.pop()?;

        // Mars and phobos
        let m = 1.5 * t;
        stack.push();
        stack.translate((m.sin() * 7.0) as f32, (m.sin() * 7.0) as f32, (m.cos() * 7.0) as f32);
        stack.push();
        stack.rotate_y(spin(ms, 40.0));
        stack.scale(0.6, 0.6, 0.6);
        frame.objects.push(DrawItem::unlit(MeshKey::Sphere, MARS, *stack.top()));
        stack.pop()?;

        let p = 2.0 * t;
        stack.push();
        stack.translate((p.cos() * 1.5) as f32, (p.sin() * 1.5) as f32, (p.cos() * 1.5) as f32);
        stack.rotate(spin(ms, 25.0), Vec3::new(0.0, 1.0, 1.0));
        stack.scale(0.2, 0.2, 0.2);
        frame.objects.push(DrawItem::unlit(MeshKey::Sphere, PHOBOS, *stack.top()));
        stack.pop()?;
        stack.pop()?;

        // Prism
        stack.push();
        stack.translate(0.0, (p.sin() * 8.0) as f32, (p.cos() * 8.0) as f32);
        stack.push();
        stack.rotate_y(spin(ms, 40.0));
        stack.scale(0.5, 0.5, 0.5);
        frame.objects.push(DrawItem::unlit(
            MeshKey::PentagonalPrism,
            PRISM,
            *stack.top(),
        ));
        stack.pop()?;
        stack.pop()?;

        stack.pop()?;

        if self.show_axes {
            let l = self.axis_length;
            frame.lines = vec![
                LineItem {
                    from: Vec3::ZERO,
                    to: Vec3::new(l, 0.0, 0.0),
                    color: Color::RED,
                },
                LineItem {
                    from: Vec3::ZERO,
                    to: Vec3::new(0.0, l, 0.0),
                    color: Color::GREEN,
                },
                LineItem {
                    from: Vec3::ZERO,
                    to: Vec3::new(0.0, 0.0, l),
                    color: Color::BLUE,
                },
            ];
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Shading;
    use orrery_core::math::transform_point;

    fn system() -> SolarSystem {
        SolarSystem::new(&SolarConfig::default())
    }

    fn center(item: &DrawItem) -> Vec3 {
        transform_point(&item.model, Vec3::ZERO)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_draw_order_and_textures() {
        let frame = system().frame(0.0).unwrap();
        let textures: Vec<&str> = frame.objects.iter().map(|o| o.texture.as_str()).collect();
        assert_eq!(textures, vec![SUN, EARTH, MOON, MARS, PHOBOS, PRISM]);
        assert!(frame.objects.iter().all(|o| o.shading == Shading::Unlit && !o.casts_shadow));
        assert_eq!(frame.objects[5].mesh, MeshKey::PentagonalPrism);
        assert!(frame.lighting.is_none());
    }

    #[test]
    fn test_positions_at_start() {
        let frame = system().frame(0.0).unwrap();
        assert!(approx(center(&frame.objects[0]), Vec3::ZERO));
        assert!(approx(center(&frame.objects[1]), Vec3::new(0.0, 0.0, 4.0)));
        // Moon sits 2 units out from the earth along z
        assert!(approx(center(&frame.objects[2]), Vec3::new(0.0, 0.0, 6.0)));
        assert!(approx(center(&frame.objects[3]), Vec3::new(0.0, 0.0, 7.0)));
        assert!(approx(center(&frame.objects[4]), Vec3::new(1.5, 0.0, 8.5)));
        assert!(approx(center(&frame.objects[5]), Vec3::new(0.0, 0.0, 8.0)));
    }

    #[test]
    fn test_earth_orbit_quarter_turn() {
        let t = std::f64::consts::FRAC_PI_2;
        let frame = system().frame(t).unwrap();
        assert!(approx(center(&frame.objects[1]), Vec3::new(4.0, 0.0, 0.0)));
        // Moon orbits in the earth's yz plane and ignores the earth's spin
        assert!(approx(center(&frame.objects[2]), Vec3::new(4.0, 2.0, 0.0)));
    }

    #[test]
    fn test_scales_apply_to_bodies() {
        let frame = system().frame(0.0).unwrap();
        let earth = &frame.objects[1];
        let rim = transform_point(&earth.model, Vec3::new(0.0, 1.0, 0.0));
        assert!(((rim - center(earth)).length() - 0.75).abs() < 1e-5);

        let phobos = &frame.objects[4];
        let rim = transform_point(&phobos.model, Vec3::new(1.0, 0.0, 0.0));
        assert!(((rim - center(phobos)).length() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_sun_spin_wraps() {
        // 36 seconds at one degree per 100 ms is a full turn
        let a = system().frame(0.0).unwrap();
        let b = system().frame(36.0).unwrap();
        for (x, y) in a.objects[0].model.iter().flatten().zip(b.objects[0].model.iter().flatten()) {
            assert!((x - y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_axes_toggle() {
        let mut solar = system();
        let frame = solar.frame(1.0).unwrap();
        assert_eq!(frame.lines.len(), 3);
        assert_eq!(frame.lines[1].to, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(frame.lines[2].color, Color::BLUE);

        assert!(!solar.toggle_axes());
        assert!(solar.frame(1.0).unwrap().lines.is_empty());
    }
}
