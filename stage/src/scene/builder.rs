//! Scene builder
//!
//! Declarative description of a scene: floor, lights and an ordered list of
//! content elements. [`SceneBuilder::build`] turns it into a [`Scene`].

use std::sync::Arc;

use log;
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use stage_geom::Vec3;

use super::{
    factory::{self, FactoryError, Placement},
    material::Material,
    Geometry, LightConfig, ObjectRole, Scene, SceneObject, SceneParams,
};
use crate::{loader::TextureSource, Color};

fn default_point_size() -> f32 {
    0.05
}

fn default_scale() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub width: f32,
    pub depth: f32,
    pub color: Color,
}

impl Default for FloorConfig {
    fn default() -> Self {
        FloorConfig {
            width: 10.0,
            depth: 10.0,
            color: Color::hex(0x999999),
        }
    }
}

/// One entry per content factory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    Box {
        size: [f32; 3],
        position: [f32; 3],
        color: Color,
        #[serde(default = "default_true")]
        cast_shadow: bool,
    },
    Capsule {
        radius: f32,
        length: f32,
        position: [f32; 3],
        color: Color,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        position: [f32; 3],
        color: Color,
    },
    Torus {
        radius: f32,
        tube: f32,
        position: [f32; 3],
        color: Color,
    },
    Particles {
        count: usize,
        spread: f32,
        #[serde(default = "default_point_size")]
        size: f32,
        color: Color,
    },
    DoubleSidedBox {
        size: f32,
        position: [f32; 3],
        color: Color,
    },
    TorusKnots {
        radius: f32,
        tube: f32,
        center: [f32; 3],
        spacing: f32,
    },
    Textured {
        texture: String,
        size: [f32; 3],
        position: [f32; 3],
    },
    /// Extruded outline; the heart outline when none is given.
    Extruded {
        #[serde(default)]
        outline: Option<Vec<[f32; 2]>>,
        depth: f32,
        #[serde(default)]
        bevel: f32,
        #[serde(default = "default_scale")]
        scale: f32,
        position: [f32; 3],
        color: Color,
    },
}

impl ContentElement {
    pub fn label(&self) -> &'static str {
        match self {
            ContentElement::Box { .. } => "box",
            ContentElement::Capsule { .. } => "capsule",
            ContentElement::Cylinder { .. } => "cylinder",
            ContentElement::Torus { .. } => "torus",
            ContentElement::Particles { .. } => "particles",
            ContentElement::DoubleSidedBox { .. } => "double-sided box",
            ContentElement::TorusKnots { .. } => "torus-knots",
            ContentElement::Textured { .. } => "textured mesh",
            ContentElement::Extruded { .. } => "extruded shape",
        }
    }

    pub fn texture_path(&self) -> Option<&str> {
        match self {
            ContentElement::Textured { texture, .. } => Some(texture.as_str()),
            _ => None,
        }
    }

    /// Runs the matching factory. Never touches a scene.
    pub fn build(
        &self,
        textures: &dyn TextureSource,
        rng: &mut StdRng,
    ) -> Result<Vec<SceneObject>, FactoryError> {
        let standard = |color: Color| Arc::new(Material::standard(color));
        let object = match self {
            ContentElement::Box {
                size,
                position,
                color,
                cast_shadow,
            } => factory::box_mesh(
                size[0],
                size[1],
                size[2],
                standard(*color),
                Placement::at((*position).into()).shadows(*cast_shadow, false),
            )?,
            ContentElement::Capsule {
                radius,
                length,
                position,
                color,
            } => factory::capsule(
                *radius,
                *length,
                standard(*color),
                Placement::at((*position).into()),
            )?,
            ContentElement::Cylinder {
                radius_top,
                radius_bottom,
                height,
                position,
                color,
            } => factory::cylinder(
                *radius_top,
                *radius_bottom,
                *height,
                standard(*color),
                Placement::at((*position).into()),
            )?,
            ContentElement::Torus {
                radius,
                tube,
                position,
                color,
            } => factory::torus(
                *radius,
                *tube,
                standard(*color),
                Placement::at((*position).into()),
            )?,
            ContentElement::Particles {
                count,
                spread,
                size,
                color,
            } => factory::particle_cloud(*count, *spread, *size, *color, rng)?,
            ContentElement::DoubleSidedBox {
                size,
                position,
                color,
            } => factory::double_sided_box(*size, *color, Placement::at((*position).into()))?,
            ContentElement::TorusKnots {
                radius,
                tube,
                center,
                spacing,
            } => return factory::torus_knot_gallery(*radius, *tube, (*center).into(), *spacing),
            ContentElement::Textured {
                texture,
                size,
                position,
            } => factory::textured_mesh(
                textures.texture(texture)?,
                Geometry::Box {
                    width: size[0],
                    height: size[1],
                    depth: size[2],
                },
                Placement::at((*position).into()),
            )?,
            ContentElement::Extruded {
                outline,
                depth,
                bevel,
                scale,
                position,
                color,
            } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(FactoryError::InvalidDimension {
                        shape: "extrude",
                        field: "scale",
                        value: *scale,
                    });
                }
                let outline = outline
                    .clone()
                    .unwrap_or_else(|| Geometry::heart_outline(12));
                let mut shape = factory::extruded_shape(
                    outline,
                    *depth,
                    *bevel,
                    standard(*color),
                    Placement::at((*position).into()),
                )?;
                shape.set_scale(Vec3::splat(*scale));
                shape
            }
        };
        Ok(vec![object])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneBuilder {
    pub floor: FloorConfig,
    pub lights: Vec<LightConfig>,
    pub content: Vec<ContentElement>,
    pub ambient: f32,
    pub clear_color: Color,
    /// Seeds the particle generator; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::minimal()
    }
}

impl SceneBuilder {
    /// Floor, one directional light and a single cube resting on the floor.
    pub fn minimal() -> SceneBuilder {
        SceneBuilder {
            floor: FloorConfig::default(),
            lights: vec![LightConfig::baseline()],
            content: vec![ContentElement::Box {
                size: [1.0, 1.0, 1.0],
                position: [0.0, 0.5, 0.0],
                color: Color::hex(0x44aa88),
                cast_shadow: true,
            }],
            ambient: 0.0,
            clear_color: Color::black(),
            seed: None,
        }
    }

    /// Every content factory enabled.
    pub fn showcase() -> SceneBuilder {
        let mut builder = Self::minimal();
        builder.floor = FloorConfig {
            width: 20.0,
            depth: 20.0,
            ..FloorConfig::default()
        };
        builder.lights.push(LightConfig::Ambient {
            color: Color::white(),
            intensity: 0.4,
        });
        builder.ambient = 0.1;
        builder.content.extend(vec![
            ContentElement::Capsule {
                radius: 0.5,
                length: 1.0,
                position: [-2.5, 1.0, 0.0],
                color: Color::hex(0xaa4488),
            },
            ContentElement::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.0,
                position: [2.5, 0.5, 0.0],
                color: Color::hex(0x8844aa),
            },
            ContentElement::Torus {
                radius: 0.5,
                tube: 0.2,
                position: [5.0, 0.7, 0.0],
                color: Color::hex(0xaa8844),
            },
            ContentElement::Particles {
                count: 2000,
                spread: 30.0,
                size: default_point_size(),
                color: Color::white(),
            },
            ContentElement::DoubleSidedBox {
                size: 1.0,
                position: [0.0, 0.5, 2.5],
                color: Color::hex(0xffaa00),
            },
            ContentElement::TorusKnots {
                radius: 0.4,
                tube: 0.12,
                center: [0.0, 1.5, -3.0],
                spacing: 2.0,
            },
            ContentElement::Textured {
                texture: "assets/textures/crate.png".into(),
                size: [1.0, 1.0, 1.0],
                position: [-2.5, 0.5, 2.5],
            },
            ContentElement::Extruded {
                outline: None,
                depth: 2.0,
                bevel: 0.5,
                scale: 0.05,
                position: [2.5, 1.0, 2.5],
                color: Color::hex(0xff3366),
            },
        ]);
        builder
    }

    /// Paths the host has to load before calling [`build`](Self::build).
    pub fn texture_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = vec![];
        for path in self.content.iter().filter_map(ContentElement::texture_path) {
            if !paths.iter().any(|p| p == path) {
                paths.push(path.to_string());
            }
        }
        paths
    }

    pub fn build(&self, textures: &dyn TextureSource) -> Scene {
        let mut scene = Scene::new(SceneParams {
            ambient: self.ambient,
            clear_color: self.clear_color,
        });

        let floor = factory::floor(self.floor.width, self.floor.depth, self.floor.color)
            .unwrap_or_else(|e| {
                log::warn!("Floor config rejected ({}), using the default floor", e);
                let fallback = FloorConfig::default();
                let mut floor = SceneObject::new_plane(
                    fallback.width,
                    fallback.depth,
                    Arc::new(Material::standard(fallback.color)),
                );
                floor.set_name("floor");
                floor
            });
        scene.add(floor);

        for light in &self.lights {
            scene.add(SceneObject::new_light(light));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for element in &self.content {
            match element.build(textures, &mut rng) {
                Ok(objects) => objects.into_iter().for_each(|o| scene.add(o)),
                Err(e) => log::warn!("Skipping {}: {}", element.label(), e),
            }
        }

        log::info!(
            "Scene built: {} objects ({} lights, {} content)",
            scene.len(),
            scene.count_role(ObjectRole::Light),
            scene.count_role(ObjectRole::Content)
        );
        scene
    }
}
