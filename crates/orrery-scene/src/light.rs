//! Lights and surface materials

use orrery_core::{Color, Vec3};

/// Diffuse and specular intensity of a switched-on light
const LIGHT_ON: Color = Color::WHITE;
/// Diffuse and specular intensity of a switched-off light
const LIGHT_OFF: Color = Color::BLACK;

/// A point light with separate ambient, diffuse and specular intensities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionalLight {
    pub position: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Default for PositionalLight {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl PositionalLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ambient: Color::BLACK,
            diffuse: LIGHT_ON,
            specular: LIGHT_ON,
        }
    }

    /// Switching off zeroes diffuse and specular; ambient is untouched
    pub fn set_enabled(&mut self, enabled: bool) {
        let value = if enabled { LIGHT_ON } else { LIGHT_OFF };
        self.diffuse = value;
        self.specular = value;
    }

    pub fn is_enabled(&self) -> bool {
        self.diffuse != LIGHT_OFF || self.specular != LIGHT_OFF
    }
}

/// Ambient, diffuse and specular reflectance plus shininess
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Material {
    /// Polished silver
    pub const SILVER: Self = Self {
        ambient: Color::new(0.1923, 0.1923, 0.1923, 1.0),
        diffuse: Color::new(0.5075, 0.5075, 0.5075, 1.0),
        specular: Color::new(0.5083, 0.5083, 0.5083, 1.0),
        shininess: 51.2,
    };
}

impl Default for Material {
    /// Neutral gray that leaves a surface texture's colors intact
    fn default() -> Self {
        Self {
            ambient: Color::gray(0.5),
            diffuse: Color::gray(0.8),
            specular: Color::gray(0.3),
            shininess: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_defaults() {
        let light = PositionalLight::at(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(light.ambient, Color::BLACK);
        assert_eq!(light.diffuse, Color::WHITE);
        assert_eq!(light.specular, Color::WHITE);
        assert!(light.is_enabled());
    }

    #[test]
    fn test_toggle_keeps_ambient() {
        let mut light = PositionalLight::default();
        light.ambient = Color::gray(0.2);

        light.set_enabled(false);
        assert!(!light.is_enabled());
        assert_eq!(light.diffuse, Color::BLACK);
        assert_eq!(light.specular, Color::BLACK);
        assert_eq!(light.ambient, Color::gray(0.2));

        light.set_enabled(true);
        assert!(light.is_enabled());
        assert_eq!(light.diffuse, Color::WHITE);
    }
}
