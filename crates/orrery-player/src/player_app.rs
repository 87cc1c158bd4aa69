//! Player application implementing winit ApplicationHandler
//!
//! Runs the chosen demo: keyboard input moves the camera (and the light in
//! the shadows demo), the clock drives the animation, and every redraw
//! renders a fresh frame description.

use anyhow::Context;
use orrery_core::OrreryConfig;
use orrery_render::{Projection, RenderContext, SceneRenderer};
use orrery_runtime::{AnimationClock, InputState};
use orrery_scene::{Demo, DemoEvent, DemoState};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

pub struct PlayerApp {
    pub config: OrreryConfig,
    pub state: DemoState,

    pub clock: AnimationClock,
    pub input: InputState,

    // Rendering
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    scene_renderer: Option<SceneRenderer>,
    projection: Projection,

    /// Set when startup failed; the event loop exits and `main` reports it
    failure: Option<anyhow::Error>,
}

impl PlayerApp {
    pub fn new(demo: Demo, config: OrreryConfig) -> Self {
        let mut input = InputState::new();
        demo.bind_controls(&mut input);

        let aspect = config.window.width as f32 / config.window.height as f32;
        Self {
            state: DemoState::new(demo, &config),
            projection: Projection::from_config(&config.camera, aspect),
            config,
            clock: AnimationClock::new(),
            input,
            window: None,
            render_context: None,
            scene_renderer: None,
            failure: None,
        }
    }

    /// The startup error, if the window or GPU could not be set up
    pub fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let demo = self.state.demo();
        let resizable = self
            .config
            .window
            .resizable
            .unwrap_or_else(|| demo.default_resizable());

        let window_attrs = Window::default_attributes()
            .with_title(demo.title())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(resizable);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );
        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize rendering")?;

        self.projection
            .set_viewport(render_context.config.width, render_context.config.height);

        let mut scene_renderer = SceneRenderer::new(
            &render_context.device,
            &render_context.queue,
            render_context.config.format,
            render_context.config.width,
            render_context.config.height,
            &self.config,
        );
        scene_renderer.load_assets(
            &render_context.device,
            &render_context.queue,
            &self.state,
            &self.config,
        );

        self.render_context = Some(render_context);
        self.scene_renderer = Some(scene_renderer);

        tracing::info!("Running the {} demo", demo);
        Ok(())
    }

    fn tick(&mut self) {
        self.clock.tick();

        for event in self.state.apply(&self.input, self.clock.delta()) {
            match event {
                DemoEvent::AxesToggled(on) => {
                    tracing::info!("World axes {}", if on { "shown" } else { "hidden" })
                }
                DemoEvent::LightToggled(on) => {
                    tracing::info!("Positional light {}", if on { "on" } else { "off" })
                }
            }
        }

        self.input.end_frame();
    }

    fn render(&mut self) {
        let Some(context) = &self.render_context else {
            return;
        };
        let Some(renderer) = &mut self.scene_renderer else {
            return;
        };

        let frame = match self.state.frame(self.clock.total_time) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to build frame: {}", e);
                return;
            }
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.reconfigure();
                return;
            }
            Err(e) => {
                tracing::warn!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(
            &context.device,
            &context.queue,
            &view,
            &context.depth_view,
            &self.state.view_matrix(),
            &self.projection,
            &frame,
        );

        output.present();
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                tracing::error!("{:#}", e);
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.projection
                        .set_viewport(context.config.width, context.config.height);
                    if let Some(renderer) = &mut self.scene_renderer {
                        renderer.resize(&context.device, context.config.width, context.config.height);
                    }
                }
            }

            WindowEvent::Focused(false) => {
                self.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if key_code == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            self.input.process_key_down(key_code);
                        }
                        ElementState::Released => {
                            self.input.process_key_up(key_code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
