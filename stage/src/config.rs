//! Configuration

use std::{fs, io, path::Path};

use serde::Deserialize;
use stage_geom::Vec3;
use thiserror::Error;

use crate::scene::{PerspectiveCamera, SceneBuilder};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    IO(#[from] io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizeable: bool,
    pub fullscreen: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Stagehand".to_owned(),
            width: 960,
            height: 540,
            resizeable: true,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Orbit damping factor; `None` moves the camera only on input.
    pub damping: Option<f32>,
}

impl Default for CameraParams {
    fn default() -> Self {
        CameraParams {
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 1.0, 5.0],
            target: [0.0, 0.0, 0.0],
            damping: None,
        }
    }
}

impl CameraParams {
    pub fn build(&self, aspect: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(self.fov, aspect, self.near, self.far);
        camera.set_position(Vec3::from(self.position));
        camera.look_at(Vec3::from(self.target));
        camera
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::Invalid(format!("camera fov {} out of range", self.fov)));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip range {}..{} is empty",
                self.near, self.far
            )));
        }
        if self.position == self.target {
            return Err(ConfigError::Invalid("camera position equals its target".into()));
        }
        match self.damping {
            Some(d) if !(d > 0.0 && d <= 1.0) => Err(ConfigError::Invalid(format!(
                "camera damping {} not in (0, 1]",
                d
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigParams {
    pub window: WindowParams,
    pub camera: CameraParams,
    pub scene: SceneBuilder,
}

impl ConfigParams {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ConfigParams, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<ConfigParams, ConfigError> {
        let params: ConfigParams = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} is empty",
                self.window.width, self.window.height
            )));
        }
        self.camera.validate()
    }
}
