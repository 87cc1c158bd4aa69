//! Layered configuration
//!
//! Config is resolved with three layers of precedence (highest wins):
//! 1. Command-line flags, applied by the player
//! 2. An explicit `--config` file, or `orrery.toml` in the working directory
//! 3. Built-in defaults
//!
//! Every field carries a serde default, so partial files are valid.

use crate::{OrreryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "orrery.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_size")]
    pub width: u32,
    #[serde(default = "default_window_size")]
    pub height: u32,
    /// `None` leaves the choice to the demo
    #[serde(default)]
    pub resizable: Option<bool>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_size(),
            height: default_window_size(),
            resizable: None,
        }
    }
}

fn default_window_size() -> u32 {
    800
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Radians
    #[serde(default)]
    pub yaw: f32,
    /// Radians
    #[serde(default)]
    pub pitch: f32,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// World units per second while a movement key is held
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Radians per second while a turn key is held
    #[serde(default = "default_turn_speed")]
    pub turn_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            move_speed: default_move_speed(),
            turn_speed: default_turn_speed(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 15.0]
}
fn default_fov() -> f32 {
    60.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    1000.0
}
fn default_move_speed() -> f32 {
    15.0
}
fn default_turn_speed() -> f32 {
    3.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_assets_root")]
    pub root: PathBuf,
    #[serde(default = "default_textures_dir")]
    pub textures: PathBuf,
    #[serde(default = "default_models_dir")]
    pub models: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
            textures: default_textures_dir(),
            models: default_models_dir(),
        }
    }
}

impl AssetsConfig {
    pub fn texture_path(&self, file: &str) -> PathBuf {
        self.root.join(&self.textures).join(file)
    }

    pub fn model_path(&self, file: &str) -> PathBuf {
        self.root.join(&self.models).join(file)
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_textures_dir() -> PathBuf {
    PathBuf::from("textures")
}
fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

/// Settings for the animated solar system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarConfig {
    #[serde(default = "default_sphere_precision")]
    pub sphere_precision: u32,
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default = "default_axis_length")]
    pub axis_length: f32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            sphere_precision: default_sphere_precision(),
            show_axes: true,
            axis_length: default_axis_length(),
        }
    }
}

fn default_sphere_precision() -> u32 {
    24
}
fn default_true() -> bool {
    true
}
fn default_axis_length() -> f32 {
    5.0
}

/// Settings for the lit, shadow-mapped scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSceneConfig {
    #[serde(default = "default_light_position")]
    pub light_position: [f32; 3],
    /// World units per second while a light key is held
    #[serde(default = "default_move_speed")]
    pub light_speed: f32,
    #[serde(default = "default_global_ambient")]
    pub global_ambient: f32,
    #[serde(default = "default_skybox_scale")]
    pub skybox_scale: f32,
    /// Shadow map edge length in texels; 0 follows the window size
    #[serde(default)]
    pub shadow_map_size: u32,
    #[serde(default = "default_depth_bias_constant")]
    pub depth_bias_constant: i32,
    #[serde(default = "default_depth_bias_slope")]
    pub depth_bias_slope: f32,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ShadowSceneConfig {
    fn default() -> Self {
        Self {
            light_position: default_light_position(),
            light_speed: default_move_speed(),
            global_ambient: default_global_ambient(),
            skybox_scale: default_skybox_scale(),
            shadow_map_size: 0,
            depth_bias_constant: default_depth_bias_constant(),
            depth_bias_slope: default_depth_bias_slope(),
            model: default_model(),
        }
    }
}

fn default_light_position() -> [f32; 3] {
    [0.0, 5.0, 0.0]
}
fn default_global_ambient() -> f32 {
    0.7
}
fn default_skybox_scale() -> f32 {
    250.0
}
fn default_depth_bias_constant() -> i32 {
    2
}
fn default_depth_bias_slope() -> f32 {
    4.0
}
fn default_model() -> String {
    "shuttle.obj".to_string()
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrreryConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub solar: SolarConfig,
    #[serde(default)]
    pub shadows: ShadowSceneConfig,
}

impl OrreryConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| OrreryError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the file layer: an explicit path must exist, the implicit
    /// `orrery.toml` is optional.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::load_from_file(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(OrreryError::ConfigError(
                "window width and height must be non-zero".into(),
            ));
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(OrreryError::ConfigError(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(OrreryError::ConfigError(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if self.solar.sphere_precision < 3 {
            return Err(OrreryError::ConfigError(format!(
                "solar.sphere_precision must be at least 3, got {}",
                self.solar.sphere_precision
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = OrreryConfig::from_toml_str("").unwrap();
        assert_eq!(config, OrreryConfig::default());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.camera.position, [0.0, 0.0, 15.0]);
        assert_eq!(config.solar.sphere_precision, 24);
        assert_eq!(config.shadows.light_position, [0.0, 5.0, 0.0]);
        assert_eq!(config.shadows.depth_bias_constant, 2);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = OrreryConfig::from_toml_str(
            r#"
            [camera]
            fov_degrees = 45.0

            [shadows]
            shadow_map_size = 2048
            "#,
        )
        .unwrap();
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.shadows.shadow_map_size, 2048);
        assert_eq!(config.shadows.model, "shuttle.obj");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = OrreryConfig::from_toml_str("[window\nwidth = 3").unwrap_err();
        assert!(matches!(err, OrreryError::ConfigError(_)));
    }

    #[test]
    fn test_validation_rejects_bad_clip_planes() {
        let err = OrreryConfig::from_toml_str("[camera]\nnear = 5.0\nfar = 1.0").unwrap_err();
        assert!(err.to_string().contains("near"));
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let err = OrreryConfig::load_layered(Some(Path::new("/definitely/not/here.toml")))
            .unwrap_err();
        assert!(matches!(err, OrreryError::IoError(_)));
    }

    #[test]
    fn test_asset_paths_join_root() {
        let assets = AssetsConfig {
            root: PathBuf::from("data"),
            ..Default::default()
        };
        assert_eq!(
            assets.texture_path("earth.jpg"),
            PathBuf::from("data").join("textures").join("earth.jpg")
        );
        assert_eq!(
            assets.model_path("shuttle.obj"),
            PathBuf::from("data").join("models").join("shuttle.obj")
        );
    }
}
