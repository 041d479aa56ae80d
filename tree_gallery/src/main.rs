//! tree_gallery — interactive entry point.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tree_gallery::app::run;
use tree_gallery::config::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = args.resolve()?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Gesture Tree — hand-controlled gallery              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cfg.detector.command {
        Some(cmd) => println!("  Detector: {cmd}"),
        None      => println!("  Detector: keyboard/mouse simulation  (use --detector-cmd for a camera)"),
    }
    if !cfg.camera_enabled {
        println!("  Camera starts switched off (press C)");
    }
    println!();

    info!(images = cfg.images.len(), camera = cfg.camera_enabled, "opening visualizer window");
    run(cfg)
}
