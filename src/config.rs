//! Startup configuration
//!
//! Fixed for the whole run: framebuffer size, projection parameters, light,
//! frame pacing, and optional asset paths. Loaded from a RON file once at
//! startup; a missing or unreadable file falls back to the defaults.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Vec3, HEIGHT, WIDTH};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Framebuffer dimensions in pixels
    pub width: usize,
    pub height: usize,
    /// Vertical field of view in radians
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
    pub light_direction: Vec3,
    pub light_color: Color,
    /// Target frame duration in milliseconds; frames finishing early sleep
    /// the remainder
    pub frame_target_ms: f32,
    /// How far along +z the mesh sits from the camera
    pub mesh_distance: f32,
    /// OBJ model to load; the built-in cube when absent
    pub obj_path: Option<String>,
    /// Texture image to load; a checkerboard when absent
    pub texture_path: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fov: std::f32::consts::FRAC_PI_3,
            znear: 0.1,
            zfar: 100.0,
            light_direction: Vec3::new(0.0, -0.5, 1.0),
            light_color: Color::WHITE,
            frame_target_ms: 33.0,
            mesh_distance: 5.0,
            obj_path: None,
            texture_path: None,
        }
    }
}

impl RenderConfig {
    /// Projection aspect ratio, height over width
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    /// Load from `path`, falling back to defaults. A missing file is the
    /// normal no-config case; a malformed one is reported.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                println!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                eprintln!("Bad config {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aspect() {
        let config = RenderConfig::default();
        let expected = config.height as f32 / config.width as f32;
        assert!((config.aspect() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_ron_roundtrip() {
        let mut config = RenderConfig::default();
        config.width = 320;
        config.height = 240;
        config.obj_path = Some("assets/ship.obj".to_string());

        let text = ron::ser::to_string(&config).unwrap();
        let back: RenderConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.width, 320);
        assert_eq!(back.height, 240);
        assert_eq!(back.obj_path.as_deref(), Some("assets/ship.obj"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: RenderConfig = ron::from_str("(width: 320)").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, RenderConfig::default().height);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = RenderConfig::load_or_default("does/not/exist.ron");
        assert_eq!(config.width, RenderConfig::default().width);
    }
}
