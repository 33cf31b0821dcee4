//! Scene configuration with TOML support.
//!
//! Every section uses `#[serde(default)]` so a file that only overrides,
//! say, `[zoom]` leaves the rest at the defaults.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{Mesh, DEFAULT_FACE_COLORS};
use crate::lighting::DirectionalLight;
use crate::projection::Projection;
use crate::rotator::ViewOptions;
use crate::zoom::ZoomPolicy;

/// Top-level scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub view: ViewConfig,
    pub zoom: ZoomConfig,
    pub projection: ProjectionConfig,
    pub prism: PrismConfig,
    pub lighting: LightingConfig,
    pub display: DisplayConfig,
}

/// The standard view restored on reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Point the camera looks at the origin from.
    pub direction: [f64; 3],
    pub up: [f64; 3],
    pub distance: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            direction: [2.0, 2.0, 5.0],
            up: [0.0, 1.0, 0.0],
            distance: 8.0,
        }
    }
}

impl ViewConfig {
    pub fn options(&self) -> ViewOptions {
        ViewOptions {
            direction: Vector3::from(self.direction),
            up: Vector3::from(self.up),
            distance: Some(self.distance),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub speed: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        let policy = ZoomPolicy::default();
        Self {
            min: policy.min,
            max: policy.max,
            speed: policy.speed,
        }
    }
}

impl ZoomConfig {
    pub fn policy(&self) -> ZoomPolicy {
        ZoomPolicy {
            min: self.min,
            max: self.max,
            speed: self.speed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl ProjectionConfig {
    /// Projection for a viewport of the given size.
    pub fn projection(&self, width: f32, height: f32) -> Projection {
        Projection {
            fov_y: self.fov_y_degrees.to_radians(),
            near: self.near,
            far: self.far,
            ..Projection::default()
        }
        .with_viewport(width, height)
    }
}

/// Prism dimensions along X, Y and Z.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrismConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub face_colors: [[f32; 4]; 6],
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 12.0,
            face_colors: DEFAULT_FACE_COLORS,
        }
    }
}

impl PrismConfig {
    pub fn mesh(&self) -> Mesh {
        Mesh::prism(self.width, self.height, self.depth, &self.face_colors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub enabled: bool,
    pub ambient: [f32; 3],
    pub color: [f32; 3],
    pub direction: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        let light = DirectionalLight::default();
        Self {
            enabled: true,
            ambient: light.ambient,
            color: light.color,
            direction: light.direction,
        }
    }
}

impl LightingConfig {
    pub fn light(&self) -> DirectionalLight {
        DirectionalLight {
            ambient: self.ambient,
            color: self.color,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub background: [f32; 3],
    pub draw_axes: bool,
    pub axis_length: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            draw_axes: false,
            axis_length: 2.0,
        }
    }
}

impl SceneConfig {
    /// Load and validate a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= zoom.max) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min <= max, got [{}, {}]",
                zoom.min, zoom.max
            )));
        }

        let prism = &self.prism;
        if !(prism.width > 0.0 && prism.height > 0.0 && prism.depth > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "prism dimensions must be positive, got {} x {} x {}",
                prism.width, prism.height, prism.depth
            )));
        }

        let projection = &self.projection;
        if !(projection.near > 0.0 && projection.near < projection.far) {
            return Err(ConfigError::Invalid(format!(
                "projection planes must satisfy 0 < near < far, got near {} far {}",
                projection.near, projection.far
            )));
        }
        if !(projection.fov_y_degrees > 0.0 && projection.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view must be within (0, 180) degrees, got {}",
                projection.fov_y_degrees
            )));
        }

        // The standard view must describe an actual orientation.
        let view = self.view.options();
        crate::frame::Frame::look_from(&view.direction, &view.up)?;

        Ok(())
    }
}
