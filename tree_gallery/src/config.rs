//! Application configuration: an optional TOML file overlaid by CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use interaction::InteractionConfig;
use scene_params::SceneConfig;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// External detector command line; simulation when absent.
    pub command:           Option<String>,
    /// Frame cadence of the simulated detector.
    pub sim_interval_ms:   u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig { command: None, sim_interval_ms: 33 }
    }
}

impl DetectorConfig {
    pub fn sim_interval(&self) -> Duration {
        Duration::from_millis(self.sim_interval_ms.max(1))
    }
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera_enabled: bool,
    pub detector:       DetectorConfig,
    pub interaction:    InteractionConfig,
    pub scene:          SceneConfig,
    /// Images added to the gallery at startup.
    pub images:         Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            camera_enabled: true,
            detector:       DetectorConfig::default(),
            interaction:    InteractionConfig::default(),
            scene:          SceneConfig::default(),
            images:         Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CLI
// ════════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug, Default)]
#[command(name = "tree_gallery", about = "Hand-gesture controlled gallery tree")]
pub struct Args {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// External detector command emitting JSON-lines landmark frames
    #[arg(long)]
    pub detector_cmd: Option<String>,

    /// Start with the camera switched off
    #[arg(long)]
    pub no_camera: bool,

    /// Debug-level logging (RUST_LOG still wins when set)
    #[arg(long, short)]
    pub verbose: bool,

    /// Images to add to the gallery
    pub images: Vec<String>,
}

impl Args {
    /// Load the config file if given and apply flag overrides.
    pub fn resolve(&self) -> anyhow::Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None       => AppConfig::default(),
        };
        if let Some(cmd) = &self.detector_cmd {
            cfg.detector.command = Some(cmd.clone());
        }
        if self.no_camera {
            cfg.camera_enabled = false;
        }
        cfg.images.extend(self.images.iter().cloned());
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn nested_sections_override_single_fields() {
        let cfg = AppConfig::from_toml(
            r#"
            camera_enabled = false
            images = ["a.png"]

            [interaction]
            lock_hold_ms = 1500

            [scene]
            ring_radius = 9.0

            [detector]
            command = "python3 detect.py"
            "#,
        )
        .unwrap();
        assert!(!cfg.camera_enabled);
        assert_eq!(cfg.images, ["a.png"]);
        assert_eq!(cfg.interaction.lock_hold_ms, 1500);
        assert_eq!(cfg.interaction.auto_advance_ms, 2500);
        assert_eq!(cfg.scene.ring_radius, 9.0);
        assert_eq!(cfg.scene.tree_spin, 0.15);
        assert_eq!(cfg.detector.command.as_deref(), Some("python3 detect.py"));
        assert_eq!(cfg.detector.sim_interval_ms, 33);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(AppConfig::from_toml("camera_enabled = [").is_err());
        assert!(AppConfig::from_toml("camera_enabled = 3").is_err());
    }

    #[test]
    fn flags_override_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "camera_enabled = true\nimages = [\"x.png\"]").unwrap();

        let args = Args::parse_from([
            "tree_gallery",
            "--config", file.path().to_str().unwrap(),
            "--no-camera",
            "--detector-cmd", "detect --fast",
            "y.png",
        ]);
        let cfg = args.resolve().unwrap();
        assert!(!cfg.camera_enabled);
        assert_eq!(cfg.detector.command.as_deref(), Some("detect --fast"));
        assert_eq!(cfg.images, ["x.png", "y.png"]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = AppConfig::load(Path::new("/nonexistent/tree.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tree.toml"));
    }
}
