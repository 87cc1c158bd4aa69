//! Lit scene with a movable positional light, a skybox, an imported shuttle
//! model and single-map shadows

use crate::frame::{DrawItem, FrameDesc, LightingDesc, MeshKey, SkyboxItem, TextureSpec};
use crate::light::{Material, PositionalLight};
use orrery_core::math::{self, Mat4};
use orrery_core::{Color, MatrixStack, Result, ShadowSceneConfig, Vec3};

pub const EARTH: &str = "earth";
pub const SUN: &str = "sun";
pub const SKYBOX: &str = "interstellar";
pub const SHUTTLE: &str = "shuttle";
pub const LIGHT_MARKER: &str = "light";

/// Edge scale of the cube drawn at the light position
const LIGHT_MARKER_SCALE: f32 = 0.1;

fn spin(ms: f64, period_ms: f64) -> f32 {
    ((ms / period_ms) % 360.0) as f32
}

/// Where the light is and whether it is switched on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub position: Vec3,
    pub enabled: bool,
}

impl LightState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            enabled: true,
        }
    }

    pub fn nudge(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Returns the new on/off state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn light(&self) -> PositionalLight {
        let mut light = PositionalLight::at(self.position);
        light.set_enabled(self.enabled);
        light
    }
}

#[derive(Debug, Clone)]
pub struct ShadowScene {
    pub light: LightState,
    pub global_ambient: f32,
    pub skybox_scale: f32,
    pub model_file: String,
}

impl ShadowScene {
    pub fn new(config: &ShadowSceneConfig) -> Self {
        Self {
            light: LightState::new(Vec3::from_array(config.light_position)),
            global_ambient: config.global_ambient,
            skybox_scale: config.skybox_scale,
            model_file: config.model.clone(),
        }
    }

    pub fn textures() -> Vec<TextureSpec> {
        vec![
            TextureSpec::new(EARTH, "earth.jpg", Color::new(0.2, 0.4, 0.9, 1.0)),
            TextureSpec::new(SUN, "sun.jpg", Color::new(1.0, 0.8, 0.2, 1.0)),
            TextureSpec::new(SKYBOX, "interstellar.jpg", Color::new(0.02, 0.02, 0.06, 1.0)),
            TextureSpec::new(SHUTTLE, "shuttle.jpg", Color::gray(0.85)),
            TextureSpec::new(LIGHT_MARKER, "light.jpg", Color::new(1.0, 1.0, 0.6, 1.0)),
        ]
    }

    fn shuttle_model(ms: f64) -> Mat4 {
        let angle = spin(ms, 10.0);
        let mut stack = MatrixStack::new();
        stack.translate(-5.0, 0.0, 0.0);
        stack.rotate_x(angle);
        stack.rotate_y(angle);
        stack.rotate_z(angle);
        *stack.top()
    }

    /// Describe the scene at `seconds` after start
    pub fn frame(&self, seconds: f64) -> Result<FrameDesc> {
        let ms = seconds * 1000.0;
        let mut frame = FrameDesc {
            skybox: Some(SkyboxItem {
                texture: SKYBOX.to_string(),
                scale: self.skybox_scale,
            }),
            lighting: Some(LightingDesc {
                light: self.light.light(),
                global_ambient: Color::gray(self.global_ambient),
                shadows: true,
            }),
            ..Default::default()
        };

        if self.light.enabled {
            let p = self.light.position;
            let mut stack = MatrixStack::new();
            stack.translate(p.x, p.y, p.z);
            stack.scale(LIGHT_MARKER_SCALE, LIGHT_MARKER_SCALE, LIGHT_MARKER_SCALE);
            frame
                .objects
                .push(DrawItem::unlit(MeshKey::Cube, LIGHT_MARKER, *stack.top()));
        }

        frame.objects.push(DrawItem::lit(
            MeshKey::Sphere,
            SUN,
            math::rotation_y(spin(ms, 100.0)),
            Material::default(),
        ));

        frame.objects.push(DrawItem::lit(
            MeshKey::Model(self.model_file.clone()),
            SHUTTLE,
            Self::shuttle_model(ms),
            Material::SILVER,
        ));

        let mut stack = MatrixStack::new();
        stack.push();
        stack.translate(5.0, 0.0, 0.0);
        stack.rotate_y(spin(ms, 50.0));
        stack.scale(0.75, 0.75, 0.75);
        frame.objects.push(DrawItem::lit(
            MeshKey::Sphere,
            EARTH,
            *stack.top(),
            Material::default(),
        ));
        stack.pop()?;

        Ok(frame)
    }
}
