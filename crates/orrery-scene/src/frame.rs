//! Renderer-agnostic frame description

use crate::light::{Material, PositionalLight};
use orrery_core::{Color, Mat4, Vec3};
use std::fmt;

/// Which mesh an item draws
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeshKey {
    Sphere,
    PentagonalPrism,
    /// Outward-facing unit cube spanning [-1, 1]
    Cube,
    /// A model imported from the given file name
    Model(String),
}

impl fmt::Display for MeshKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshKey::Sphere => write!(f, "sphere"),
            MeshKey::PentagonalPrism => write!(f, "pentagonal_prism"),
            MeshKey::Cube => write!(f, "cube"),
            MeshKey::Model(name) => write!(f, "model:{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Texture color only
    Unlit,
    /// Ambient, diffuse and specular lighting with shadow lookup
    Lit,
}

/// One textured mesh instance
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshKey,
    pub texture: String,
    /// World transform
    pub model: Mat4,
    pub shading: Shading,
    pub material: Material,
    pub casts_shadow: bool,
}

impl DrawItem {
    pub fn unlit(mesh: MeshKey, texture: &str, model: Mat4) -> Self {
        Self {
            mesh,
            texture: texture.to_string(),
            model,
            shading: Shading::Unlit,
            material: Material::default(),
            casts_shadow: false,
        }
    }

    pub fn lit(mesh: MeshKey, texture: &str, model: Mat4, material: Material) -> Self {
        Self {
            mesh,
            texture: texture.to_string(),
            model,
            shading: Shading::Lit,
            material,
            casts_shadow: true,
        }
    }
}

/// A world-space line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
}

/// Cube-mapped background drawn behind everything
#[derive(Debug, Clone, PartialEq)]
pub struct SkyboxItem {
    pub texture: String,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingDesc {
    pub light: PositionalLight,
    pub global_ambient: Color,
    pub shadows: bool,
}

/// Everything needed to draw one frame, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDesc {
    pub clear_color: Color,
    pub objects: Vec<DrawItem>,
    pub lines: Vec<LineItem>,
    pub skybox: Option<SkyboxItem>,
    pub lighting: Option<LightingDesc>,
}

impl Default for FrameDesc {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            objects: Vec::new(),
            lines: Vec::new(),
            skybox: None,
            lighting: None,
        }
    }
}

impl FrameDesc {
    /// Items rendered into the shadow map
    pub fn shadow_casters(&self) -> impl Iterator<Item = &DrawItem> {
        self.objects.iter().filter(|o| o.casts_shadow)
    }

    pub fn wants_shadow_pass(&self) -> bool {
        self.lighting.is_some_and(|l| l.shadows) && self.shadow_casters().next().is_some()
    }
}

/// A texture a demo needs: its cache name, file name, and the solid color
/// used when the file cannot be loaded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSpec {
    pub name: &'static str,
    pub file: &'static str,
    pub fallback: Color,
}

impl TextureSpec {
    pub const fn new(name: &'static str, file: &'static str, fallback: Color) -> Self {
        Self {
            name,
            file,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::math;

    #[test]
    fn test_mesh_key_names_are_distinct() {
        let keys = [
            MeshKey::Sphere,
            MeshKey::PentagonalPrism,
            MeshKey::Cube,
            MeshKey::Model("shuttle.obj".into()),
        ];
        let names: std::collections::HashSet<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(names.len(), keys.len());
        assert_eq!(MeshKey::Model("a.obj".into()).to_string(), "model:a.obj");
    }

    #[test]
    fn test_shadow_pass_needs_lighting_and_casters() {
        let mut frame = FrameDesc::default();
        frame
            .objects
            .push(DrawItem::unlit(MeshKey::Cube, "light", math::IDENTITY));
        assert!(!frame.wants_shadow_pass());

        frame.lighting = Some(LightingDesc {
            light: PositionalLight::default(),
            global_ambient: Color::gray(0.7),
            shadows: true,
        });
        assert!(!frame.wants_shadow_pass());

        frame.objects.push(DrawItem::lit(
            MeshKey::Sphere,
            "sun",
            math::IDENTITY,
            Material::default(),
        ));
        assert!(frame.wants_shadow_pass());
        assert_eq!(frame.shadow_casters().count(), 1);
    }
}
