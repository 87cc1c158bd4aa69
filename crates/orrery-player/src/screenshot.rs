//! Headless demo-to-PNG rendering

use anyhow::{Context, Result};
use orrery_core::OrreryConfig;
use orrery_render::{HeadlessContext, Projection, SceneRenderer};
use orrery_scene::{Demo, DemoState};
use std::path::Path;

/// Render one frame of `demo` at `seconds` after start, from the configured
/// camera, into an RGBA image of the given size
pub fn render_frame(
    demo: Demo,
    config: &OrreryConfig,
    seconds: f64,
    width: u32,
    height: u32,
) -> Result<image::RgbaImage> {
    let ctx = pollster::block_on(HeadlessContext::new(width, height))
        .context("Failed to create headless render context")?;

    let state = DemoState::new(demo, config);
    let projection = Projection::from_config(&config.camera, ctx.aspect_ratio());

    let mut renderer = SceneRenderer::new(
        &ctx.device,
        &ctx.queue,
        ctx.format,
        ctx.width,
        ctx.height,
        config,
    );
    renderer.load_assets(&ctx.device, &ctx.queue, &state, config);

    let frame = state
        .frame(seconds)
        .context("Failed to build frame description")?;
    renderer.render(
        &ctx.device,
        &ctx.queue,
        &ctx.color_view,
        &ctx.depth_view,
        &state.view_matrix(),
        &projection,
        &frame,
    );

    let pixels = ctx
        .read_pixels()
        .context("Failed to read rendered pixels")?;
    image::RgbaImage::from_raw(ctx.width, ctx.height, pixels)
        .context("Failed to create image from pixel data")
}

/// Render one frame and save it as a PNG at `path`
pub fn render_to_png(
    demo: Demo,
    config: &OrreryConfig,
    seconds: f64,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<()> {
    let img = render_frame(demo, config, seconds, width, height)?;
    img.save(path)
        .with_context(|| format!("Failed to save image to {}", path.display()))?;

    tracing::info!(
        "Rendered {} at t={:.2}s as {}x{} image to {}",
        demo,
        seconds,
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
