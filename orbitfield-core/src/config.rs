//! Scene tunables with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[orbit]` keeps the stock values for everything else. The defaults
//! reproduce the stock scene exactly.

use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::animation::{Motion, Orbit, SpinRates};
use crate::error::{Result, SceneError};
use crate::material::{DirectionalLight, Material, Rgb};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub spin: SpinConfig,
    pub particles: ParticleConfig,
    pub material: MaterialConfig,
    pub light: LightConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z
    pub distance: f32,
    /// Camera offset per unit of normalized cursor per second
    pub cursor_gain: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 35.0,
            near: 0.1,
            far: 100.0,
            distance: 6.0,
            cursor_gain: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub center: [f32; 3],
    pub radius: f32,
    /// Angular speed added per unit of wheel delta
    pub wheel_gain: f32,
    /// Per-tick multiplier applied to the angular speed
    pub decay: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            center: [2.0, 0.0, -3.0],
            radius: 3.8,
            wheel_gain: 0.0002,
            decay: 0.93,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Radians per second around X
    pub x: f32,
    /// Radians per second around Y
    pub y: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self { x: 0.1, y: 0.12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Side length of the cube the particles are scattered in
    pub spread: f32,
    pub seed: u64,
    pub color: Rgb,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 700,
            spread: 10.0,
            seed: 0x5eed,
            color: Rgb::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        let material = Material::default();
        Self {
            color: material.color,
            metalness: material.metalness,
            roughness: material.roughness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Rgb,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 4.0,
            position: [0.5, 1.0, 0.0],
        }
    }
}

impl SceneConfig {
    /// Load a config from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SceneError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SceneError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("camera.fov", self.camera.fov),
            ("camera.near", self.camera.near),
            ("camera.far", self.camera.far),
            ("camera.distance", self.camera.distance),
            ("camera.cursor_gain", self.camera.cursor_gain),
            ("orbit.radius", self.orbit.radius),
            ("orbit.wheel_gain", self.orbit.wheel_gain),
            ("orbit.decay", self.orbit.decay),
            ("spin.x", self.spin.x),
            ("spin.y", self.spin.y),
            ("particles.spread", self.particles.spread),
            ("light.intensity", self.light.intensity),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not a finite number")));
            }
        }
        let vectors = [
            ("orbit.center", self.orbit.center),
            ("light.position", self.light.position),
        ];
        for (field, value) in vectors {
            if value.iter().any(|c| !c.is_finite()) {
                return Err(invalid(field, format!("{value:?} has a non-finite component")));
            }
        }

        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(invalid("camera.fov", "must be between 0 and 180 degrees"));
        }
        if self.camera.near <= 0.0 {
            return Err(invalid("camera.near", "must be positive"));
        }
        if self.camera.far <= self.camera.near {
            return Err(invalid("camera.far", "must be greater than camera.near"));
        }
        if self.orbit.radius <= 0.0 {
            return Err(invalid("orbit.radius", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.orbit.decay) {
            return Err(invalid("orbit.decay", "must be in [0, 1)"));
        }
        if self.particles.spread < 0.0 {
            return Err(invalid("particles.spread", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.material.metalness) {
            return Err(invalid("material.metalness", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.material.roughness) {
            return Err(invalid("material.roughness", "must be in [0, 1]"));
        }
        if self.light.intensity < 0.0 {
            return Err(invalid("light.intensity", "must not be negative"));
        }
        Ok(())
    }

    pub fn motion(&self) -> Motion {
        Motion {
            wheel_gain: self.orbit.wheel_gain,
            decay: self.orbit.decay,
            orbit: Orbit {
                center: Point3::from(self.orbit.center),
                radius: self.orbit.radius,
            },
            spin: SpinRates {
                x: self.spin.x,
                y: self.spin.y,
            },
            cursor_gain: self.camera.cursor_gain,
        }
    }

    pub fn material(&self) -> Material {
        Material {
            color: self.material.color,
            metalness: self.material.metalness,
            roughness: self.material.roughness,
        }
    }

    pub fn light(&self) -> DirectionalLight {
        DirectionalLight {
            color: self.light.color,
            intensity: self.light.intensity,
            position: Point3::from(self.light.position),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
