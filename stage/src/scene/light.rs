//! Lights

use serde::Deserialize;
use stage_geom::Vec3;

use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Ambient,
    Directional,
    Point,
    Spot,
    Hemisphere,
}

/// One variant per light kind; [`SceneObject::new_light`](super::SceneObject::new_light)
/// is the only constructor that consumes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightConfig {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: [f32; 3],
        #[serde(default)]
        target: [f32; 3],
        #[serde(default)]
        cast_shadow: bool,
    },
    Point {
        color: Color,
        intensity: f32,
        position: [f32; 3],
        #[serde(default)]
        distance: f32,
        #[serde(default)]
        cast_shadow: bool,
    },
    Spot {
        color: Color,
        intensity: f32,
        position: [f32; 3],
        #[serde(default)]
        target: [f32; 3],
        angle: f32,
        #[serde(default)]
        penumbra: f32,
        #[serde(default)]
        cast_shadow: bool,
    },
    Hemisphere {
        sky_color: Color,
        ground_color: Color,
        intensity: f32,
    },
}

impl LightConfig {
    /// White directional light above and in front of the origin, casting shadows.
    pub fn baseline() -> LightConfig {
        LightConfig::Directional {
            color: Color::white(),
            intensity: 5.0,
            position: [3.0, 4.0, 5.0],
            target: [0.0, 0.0, 0.0],
            cast_shadow: true,
        }
    }

    pub fn mode(&self) -> LightMode {
        match self {
            LightConfig::Ambient { .. } => LightMode::Ambient,
            LightConfig::Directional { .. } => LightMode::Directional,
            LightConfig::Point { .. } => LightMode::Point,
            LightConfig::Spot { .. } => LightMode::Spot,
            LightConfig::Hemisphere { .. } => LightMode::Hemisphere,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub mode: LightMode,
    pub color: Color,
    pub intensity: f32,
    /// Look-at target for directional and spot lights.
    pub target: Option<Vec3>,
    pub ground_color: Option<Color>,
    /// Cutoff distance for point lights; zero means unbounded.
    pub distance: f32,
    pub cone: f32,
    pub penumbra: f32,
}

impl Light {
    pub(crate) fn new(mode: LightMode, color: Color, intensity: f32) -> Light {
        Light {
            mode,
            color,
            intensity,
            target: None,
            ground_color: None,
            distance: 0.0,
            cone: 0.0,
            penumbra: 0.0,
        }
    }

    /// Whether the rendering backend needs a shadow map for this kind of light.
    pub fn supports_shadow(&self) -> bool {
        matches!(
            self.mode,
            LightMode::Directional | LightMode::Point | LightMode::Spot
        )
    }
}
