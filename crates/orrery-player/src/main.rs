//! Orrery - interactive solar system and shadow-mapping demos
//!
//! Usage:
//!   orrery [solar|shadows] [--config <orrery.toml>] [--assets <dir>]
//!   orrery shadows --screenshot out.png --time 2.5

use anyhow::{Context, Result};
use clap::Parser;
use orrery_core::OrreryConfig;
use orrery_player::{render_to_png, PlayerApp};
use orrery_scene::Demo;
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "orrery")]
#[command(about = "Orrery - animated solar system and lit, shadowed scene demos")]
struct Args {
    /// Demo to run: solar (project2) or shadows (project3)
    #[arg(default_value = "solar")]
    demo: Demo,

    /// Config file; orrery.toml in the working directory is used when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset root containing textures/ and models/
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Window or image width
    #[arg(long)]
    width: Option<u32>,

    /// Window or image height
    #[arg(long)]
    height: Option<u32>,

    /// Render a single frame offscreen to this PNG instead of opening a window
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Animation time in seconds for --screenshot
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let directive = if verbose { "orrery=debug" } else { "orrery=info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();
    Ok(())
}

/// File layer first, then command-line overrides
fn resolve_config(args: &Args) -> Result<OrreryConfig> {
    let mut config =
        OrreryConfig::load_layered(args.config.as_deref()).context("Failed to load config")?;

    if let Some(root) = &args.assets {
        config.assets.root = root.clone();
    }
    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }
    config.validate().context("Invalid settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = resolve_config(&args)?;
    let demo = args.demo;

    if let Some(path) = &args.screenshot {
        return render_to_png(
            demo,
            &config,
            args.time,
            config.window.width,
            config.window.height,
            path,
        );
    }

    tracing::info!("{}", demo.title());
    tracing::info!("Controls:");
    for (keys, action) in demo.controls() {
        tracing::info!("  {:<14} {}", keys, action);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(demo, config);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.take_failure() {
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_demo_aliases() {
        let args = Args::try_parse_from(["orrery", "project3"]).unwrap();
        assert_eq!(args.demo, Demo::Shadows);
        let args = Args::try_parse_from(["orrery"]).unwrap();
        assert_eq!(args.demo, Demo::Solar);
        assert!(Args::try_parse_from(["orrery", "galaxy"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from([
            "orrery",
            "shadows",
            "--config",
            "/definitely/not/here/orrery.toml",
        ])
        .unwrap();
        assert!(resolve_config(&args).is_err());

        let dir = std::env::temp_dir().join("orrery_cli_override_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("orrery.toml");
        std::fs::write(
            &path,
            "[window]\nwidth = 1024\nheight = 768\n\n[assets]\nroot = \"/from/file\"\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "orrery",
            "--config",
            path.to_str().unwrap(),
            "--assets",
            "/srv/orrery",
            "--width",
            "640",
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.assets.root, PathBuf::from("/srv/orrery"));
        assert_eq!(config.window.width, 640);
        // Not overridden, so the file value stands
        assert_eq!(config.window.height, 768);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let args = Args::try_parse_from(["orrery", "--width", "0"]).unwrap();
        assert!(resolve_config(&args).is_err());
    }
}
