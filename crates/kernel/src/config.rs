//! Scene configuration, loaded from YAML. Every field has a default, so a
//! config file only needs the values it overrides.

use glam::Vec3;
use scrollscape_common::Rgba;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertical spacing between scroll sections, in world units.
    pub object_distance: f32,
    /// Number of viewport-high sections the page scrolls through.
    pub section_count: u32,
    /// Debug-panel material tint, `#rrggbb`.
    pub material_color: String,
    /// Upper bound on the device pixel ratio used for the render surface.
    pub max_pixel_ratio: f32,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub light: LightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            object_distance: 4.0,
            section_count: 3,
            material_color: "#488ba8".into(),
            max_pixel_ratio: 2.0,
            particles: ParticleConfig::default(),
            camera: CameraConfig::default(),
            motion: MotionConfig::default(),
            light: LightConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: u32,
    pub radius: f32,
    /// Width of the x/z band the particles are scattered over, centered on 0.
    pub spread: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 30,
            radius: 0.1,
            spread: 20.0,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Local z of the camera inside its group before the first frame.
    pub start_z: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 35.0,
            near: 0.1,
            far: 100.0,
            start_z: 12.0,
        }
    }
}

/// Gains of the per-frame animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub parallax_strength: f32,
    /// Per-second rate at which the camera group closes on the parallax target.
    pub parallax_easing: f32,
    /// Camera z gain per scrolled pixel.
    pub scroll_depth_rate: f32,
    /// Swing phase (radians) per scrolled pixel.
    pub scroll_swing_rate: f32,
    pub swing_amplitude: f32,
    pub spin_rate: f32,
    pub spin_time_divisor: f32,
    /// Longest frame delta, in seconds, fed to the easing step.
    pub max_frame_delta: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            parallax_strength: 0.5,
            parallax_easing: 2.0,
            scroll_depth_rate: 0.009,
            scroll_swing_rate: 0.002,
            swing_amplitude: 2.0,
            spin_rate: 5.0,
            spin_time_divisor: 80.0,
            max_frame_delta: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: String,
    pub intensity: f32,
    pub position: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            intensity: 1.0,
            position: Vec3::new(10.0, 10.0, 10.0),
        }
    }
}

impl SceneConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&data)?;
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: String| ConfigError::Invalid { field, reason };

        if !is_positive(self.object_distance) {
            return Err(invalid("object_distance", format!("{} is not positive", self.object_distance)));
        }
        if self.section_count == 0 {
            return Err(invalid("section_count", "must be at least 1".into()));
        }
        if !is_positive(self.max_pixel_ratio) {
            return Err(invalid("max_pixel_ratio", format!("{} is not positive", self.max_pixel_ratio)));
        }
        if !(is_positive(self.camera.fov_degrees) && self.camera.fov_degrees < 180.0) {
            return Err(invalid(
                "camera.fov_degrees",
                format!("{} is outside (0, 180)", self.camera.fov_degrees),
            ));
        }
        if !is_positive(self.camera.near) {
            return Err(invalid("camera.near", format!("{} is not positive", self.camera.near)));
        }
        if self.camera.near >= self.camera.far {
            return Err(invalid(
                "camera.far",
                format!("far {} must exceed near {}", self.camera.far, self.camera.near),
            ));
        }
        if !is_positive(self.motion.spin_time_divisor) {
            return Err(invalid(
                "motion.spin_time_divisor",
                format!("{} is not positive", self.motion.spin_time_divisor),
            ));
        }
        if self.motion.max_frame_delta < 0.0 {
            return Err(invalid(
                "motion.max_frame_delta",
                format!("{} is negative", self.motion.max_frame_delta),
            ));
        }
        Rgba::from_hex(&self.material_color)
            .map_err(|e| invalid("material_color", e.to_string()))?;
        Rgba::from_hex(&self.light.color).map_err(|e| invalid("light.color", e.to_string()))?;
        Ok(())
    }

    /// Pixels of scroll between the top of the page and the last section.
    pub fn max_scroll(&self, viewport_height: f32) -> f32 {
        (self.section_count.saturating_sub(1)) as f32 * viewport_height.max(0.0)
    }
}

/// False for zero, negatives and NaN.
fn is_positive(v: f32) -> bool {
    v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.object_distance, 4.0);
        assert_eq!(config.particles.count, 30);
        assert_eq!(config.camera.fov_degrees, 35.0);
        assert_eq!(config.material_color, "#488ba8");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SceneConfig::from_yaml_str(
            "object_distance: 6.0\nparticles:\n  count: 5\n",
        )
        .unwrap();
        assert_eq!(config.object_distance, 6.0);
        assert_eq!(config.particles.count, 5);
        assert_eq!(config.particles.radius, 0.1);
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let err = SceneConfig::from_yaml_str("camera:\n  near: 10.0\n  far: 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.far", .. }));
    }

    #[test]
    fn rejects_bad_material_color() {
        let err = SceneConfig::from_yaml_str("material_color: nope\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "material_color", .. }));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases: [(&str, fn(&mut SceneConfig)); 9] = [
            ("camera.fov_degrees", |c| c.camera.fov_degrees = 0.0),
            ("camera.fov_degrees", |c| c.camera.fov_degrees = 180.0),
            ("camera.fov_degrees", |c| c.camera.fov_degrees = f32::NAN),
            ("camera.near", |c| c.camera.near = 0.0),
            ("camera.near", |c| c.camera.near = -1.0),
            ("object_distance", |c| c.object_distance = 0.0),
            ("object_distance", |c| c.object_distance = f32::NAN),
            ("max_pixel_ratio", |c| c.max_pixel_ratio = 0.0),
            ("light.color", |c| c.light.color = "#12345".into()),
        ];
        for (expected, mutate) in cases {
            let mut config = SceneConfig::default();
            mutate(&mut config);
            match config.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{expected}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_zero_sections() {
        let config = SceneConfig {
            section_count: 0,
            ..SceneConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = SceneConfig::from_yaml_str("object_distance: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn save_and_load_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = SceneConfig {
            section_count: 5,
            ..SceneConfig::default()
        };
        std::fs::write(tmp.path(), config.to_yaml_string().unwrap()).unwrap();

        let loaded = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn max_scroll_spans_all_but_the_first_section() {
        let config = SceneConfig::default();
        assert_eq!(config.max_scroll(800.0), 1600.0);
        assert_eq!(config.max_scroll(-5.0), 0.0);
    }
}
