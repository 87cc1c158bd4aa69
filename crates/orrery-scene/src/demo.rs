//! Demo selection, controls and interactive state

use crate::camera::FlyCamera;
use crate::frame::{FrameDesc, TextureSpec};
use crate::shadows::ShadowScene;
use crate::solar::SolarSystem;
use orrery_core::{Mat4, OrreryConfig, OrreryError, Result, Vec3};
use orrery_runtime::InputState;
use std::fmt;
use std::str::FromStr;
use winit::keyboard::KeyCode;

/// Action names bound in `InputState`
pub mod actions {
    pub const MOVE_FORWARD: &str = "move_forward";
    pub const MOVE_BACKWARD: &str = "move_backward";
    pub const MOVE_LEFT: &str = "move_left";
    pub const MOVE_RIGHT: &str = "move_right";
    pub const MOVE_UP: &str = "move_up";
    pub const MOVE_DOWN: &str = "move_down";
    pub const YAW_LEFT: &str = "yaw_left";
    pub const YAW_RIGHT: &str = "yaw_right";
    pub const PITCH_UP: &str = "pitch_up";
    pub const PITCH_DOWN: &str = "pitch_down";
    pub const TOGGLE_AXES: &str = "toggle_axes";
    pub const LIGHT_FORWARD: &str = "light_forward";
    pub const LIGHT_BACK: &str = "light_back";
    pub const LIGHT_LEFT: &str = "light_left";
    pub const LIGHT_RIGHT: &str = "light_right";
    pub const LIGHT_UP: &str = "light_up";
    pub const LIGHT_DOWN: &str = "light_down";
    pub const TOGGLE_LIGHT: &str = "toggle_light";
}

use actions::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    /// Animated solar system with a free camera
    Solar,
    /// Lit scene with skybox, imported model and shadows
    Shadows,
}

impl FromStr for Demo {
    type Err = OrreryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "solar" | "project2" => Ok(Demo::Solar),
            "shadows" | "project3" => Ok(Demo::Shadows),
            other => Err(OrreryError::ConfigError(format!(
                "unknown demo '{}' (expected 'solar' or 'shadows')",
                other
            ))),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Demo::Solar => write!(f, "solar"),
            Demo::Shadows => write!(f, "shadows"),
        }
    }
}

impl Demo {
    pub fn title(&self) -> &'static str {
        match self {
            Demo::Solar => "Project 2 - 3D Modeling and Camera Manipulation",
            Demo::Shadows => "Project 3 - Lights, Materials, Textures, Shadows, and Skyboxes",
        }
    }

    pub fn default_resizable(&self) -> bool {
        matches!(self, Demo::Solar)
    }

    pub fn textures(&self) -> Vec<TextureSpec> {
        match self {
            Demo::Solar => SolarSystem::textures(),
            Demo::Shadows => ShadowScene::textures(),
        }
    }

    /// Key help lines shown at startup
    pub fn controls(&self) -> Vec<(&'static str, &'static str)> {
        let mut lines = vec![
            ("W / S", "Move forward / backward"),
            ("A / D", "Strafe left / right"),
            ("E / Q", "Move up / down"),
            ("Left / Right", "Yaw"),
            ("Up / Down", "Pitch"),
        ];
        match self {
            Demo::Solar => lines.push(("Space", "Toggle world axes")),
            Demo::Shadows => lines.extend([
                ("I / K", "Move light along -z / +z"),
                ("J / L", "Move light along -x / +x"),
                ("U / O", "Move light up / down"),
                ("P", "Toggle positional light"),
            ]),
        }
        lines.push(("Escape", "Quit"));
        lines
    }

    pub fn bind_controls(&self, input: &mut InputState) {
        input.bind_action(MOVE_FORWARD, vec![KeyCode::KeyW]);
        input.bind_action(MOVE_BACKWARD, vec![KeyCode::KeyS]);
        input.bind_action(MOVE_LEFT, vec![KeyCode::KeyA]);
        input.bind_action(MOVE_RIGHT, vec![KeyCode::KeyD]);
        input.bind_action(MOVE_UP, vec![KeyCode::KeyE]);
        input.bind_action(MOVE_DOWN, vec![KeyCode::KeyQ]);
        input.bind_action(YAW_LEFT, vec![KeyCode::ArrowLeft]);
        input.bind_action(YAW_RIGHT, vec![KeyCode::ArrowRight]);
        input.bind_action(PITCH_UP, vec![KeyCode::ArrowUp]);
        input.bind_action(PITCH_DOWN, vec![KeyCode::ArrowDown]);

        match self {
            Demo::Solar => {
                input.bind_action(TOGGLE_AXES, vec![KeyCode::Space]);
            }
            Demo::Shadows => {
                input.bind_action(LIGHT_FORWARD, vec![KeyCode::KeyI]);
                input.bind_action(LIGHT_BACK, vec![KeyCode::KeyK]);
                input.bind_action(LIGHT_LEFT, vec![KeyCode::KeyJ]);
                input.bind_action(LIGHT_RIGHT, vec![KeyCode::KeyL]);
                input.bind_action(LIGHT_UP, vec![KeyCode::KeyU]);
                input.bind_action(LIGHT_DOWN, vec![KeyCode::KeyO]);
                input.bind_action(TOGGLE_LIGHT, vec![KeyCode::KeyP]);
            }
        }
    }
}

/// State changes worth reporting to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoEvent {
    AxesToggled(bool),
    LightToggled(bool),
}

#[derive(Debug, Clone)]
enum DemoScene {
    Solar(SolarSystem),
    Shadows(ShadowScene),
}

/// Camera plus the running demo's interactive state
#[derive(Debug, Clone)]
pub struct DemoState {
    demo: Demo,
    pub camera: FlyCamera,
    move_speed: f32,
    turn_speed: f32,
    light_speed: f32,
    scene: DemoScene,
}

impl DemoState {
    pub fn new(demo: Demo, config: &OrreryConfig) -> Self {
        let scene = match demo {
            Demo::Solar => DemoScene::Solar(SolarSystem::new(&config.solar)),
            Demo::Shadows => DemoScene::Shadows(ShadowScene::new(&config.shadows)),
        };
        Self {
            demo,
            camera: FlyCamera::from_config(&config.camera),
            move_speed: config.camera.move_speed,
            turn_speed: config.camera.turn_speed,
            light_speed: config.shadows.light_speed,
            scene,
        }
    }

    pub fn demo(&self) -> Demo {
        self.demo
    }

    /// Model files the current demo draws
    pub fn model_files(&self) -> Vec<String> {
        match &self.scene {
            DemoScene::Solar(_) => Vec::new(),
            DemoScene::Shadows(s) => vec![s.model_file.clone()],
        }
    }

    /// Apply held and newly pressed actions for a frame lasting `dt` seconds
    pub fn apply(&mut self, input: &InputState, dt: f32) -> Vec<DemoEvent> {
        let mut events = Vec::new();
        let step = self.move_speed * dt;
        let turn = self.turn_speed * dt;

        let forward = input.axis(MOVE_BACKWARD, MOVE_FORWARD);
        if forward != 0.0 {
            self.camera.move_forward(forward * step);
        }
        let side = input.axis(MOVE_LEFT, MOVE_RIGHT);
        if side != 0.0 {
            self.camera.move_side(side * step);
        }
        let vertical = input.axis(MOVE_DOWN, MOVE_UP);
        if vertical != 0.0 {
            self.camera.move_up(vertical * step);
        }
        self.camera.turn(
            input.axis(YAW_LEFT, YAW_RIGHT) * turn,
            input.axis(PITCH_DOWN, PITCH_UP) * turn,
        );

        match &mut self.scene {
            DemoScene::Solar(solar) => {
                if input.is_action_just_pressed(TOGGLE_AXES) {
                    events.push(DemoEvent::AxesToggled(solar.toggle_axes()));
                }
            }
            DemoScene::Shadows(scene) => {
                let delta = Vec3::new(
                    input.axis(LIGHT_LEFT, LIGHT_RIGHT),
                    input.axis(LIGHT_DOWN, LIGHT_UP),
                    input.axis(LIGHT_FORWARD, LIGHT_BACK),
                );
                if delta != Vec3::ZERO {
                    scene.light.nudge(delta * (self.light_speed * dt));
                }
                if input.is_action_just_pressed(TOGGLE_LIGHT) {
                    events.push(DemoEvent::LightToggled(scene.light.toggle()));
                }
            }
        }

        events
    }

    pub fn frame(&self, seconds: f64) -> Result<FrameDesc> {
        match &self.scene {
            DemoScene::Solar(solar) => solar.frame(seconds),
            DemoScene::Shadows(scene) => scene.frame(seconds),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn light_position(&self) -> Option<Vec3> {
        match &self.scene {
            DemoScene::Solar(_) => None,
            DemoScene::Shadows(scene) => Some(scene.light.position),
        }
    }
}
