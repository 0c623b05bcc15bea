//! Material definitions

use std::sync::Arc;

use lazy_static::lazy_static;
use log;
use thiserror::Error;

use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Linear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl Default for WrapMode {
    fn default() -> Self {
        WrapMode::ClampToEdge
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerInfo {
    pub mag_filter: Filter,
    pub min_filter: Filter,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Texture loading error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Texture image parse error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Texture data URI decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Unsupported texture URI: {0}")]
    UnsupportedUri(String),
    #[error("Texture \"{path}\" is unavailable: {reason}")]
    Unavailable { path: String, reason: String },
    #[error("Texture \"{0}\" was never requested")]
    NotRequested(String),
}

/// Decoded RGBA8 image plus the sampling state the backend should use.
pub struct Texture {
    pub(crate) name: Option<String>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixels: Vec<u8>,
    pub(crate) sampler: SamplerInfo,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sampler", &self.sampler)
            .finish()
    }
}

impl Texture {
    pub fn decode(
        name: Option<String>,
        bytes: &[u8],
        sampler: &SamplerInfo,
    ) -> Result<Texture, TextureError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!(
            "Decoded texture \"{}\" ({}x{})",
            name.as_deref().unwrap_or("?texture?"),
            width,
            height
        );
        Ok(Texture {
            name,
            width,
            height,
            pixels: rgba.into_raw(),
            sampler: *sampler,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn sampler(&self) -> &SamplerInfo {
        &self.sampler
    }
}

/// Lighting response model the backend shades a surface with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadingModel {
    /// Unlit flat color.
    Basic,
    /// Diffuse only.
    Lambert,
    /// Diffuse plus specular highlight.
    Phong { shininess: f32, specular: Color },
    /// Metal/roughness surface, the default for primitive meshes.
    Standard { metalness: f32, roughness: f32 },
    /// Visualizes view-space depth instead of color.
    Depth,
    /// Screen-space point sprites.
    Points { size: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

impl Default for Side {
    fn default() -> Self {
        Side::Front
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: Option<String>,
    pub color: Color,
    pub shading: ShadingModel,
    pub emissive: Color,
    pub side: Side,
    pub map: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            name: None,
            color: Color::white(),
            shading: ShadingModel::Standard {
                metalness: 0.0,
                roughness: 1.0,
            },
            emissive: Color::black(),
            side: Side::Front,
            map: None,
        }
    }
}

lazy_static! {
    static ref DEFAULT_MATERIAL: Arc<Material> = Arc::new(Material::default());
}

impl Material {
    pub fn get_default() -> Arc<Material> {
        DEFAULT_MATERIAL.clone()
    }

    pub fn standard(color: Color) -> Material {
        Material {
            color,
            ..Default::default()
        }
    }

    pub fn with_shading(color: Color, shading: ShadingModel) -> Material {
        Material {
            color,
            shading,
            ..Default::default()
        }
    }

    pub fn textured(map: Arc<Texture>) -> Material {
        Material {
            name: map.name.clone(),
            map: Some(map),
            ..Default::default()
        }
    }

    pub fn is_double_sided(&self) -> bool {
        self.side == Side::Double
    }
}
