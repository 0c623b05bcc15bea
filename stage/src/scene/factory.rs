//! Content element factories
//!
//! Every factory returns a detached object (or a small fixed set of them).
//! None of them touches a [`Scene`](super::Scene); the caller decides what
//! gets added.

use std::sync::Arc;

use rand::Rng;
use stage_geom::Vec3;
use thiserror::Error;

use super::{
    material::{Material, ShadingModel, Side, Texture, TextureError},
    Geometry, SceneObject,
};
use crate::Color;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Invalid {shape} {field}: {value}")]
    InvalidDimension {
        shape: &'static str,
        field: &'static str,
        value: f32,
    },
    #[error("Malformed shape: {0}")]
    MalformedShape(String),
    #[error("{0}")]
    Texture(#[from] TextureError),
}

/// Where an object goes and how it takes part in the shadow pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Placement {
    /// Shadow caster at `position`.
    pub fn at(position: Vec3) -> Placement {
        Placement {
            position,
            cast_shadow: true,
            receive_shadow: false,
        }
    }

    pub fn shadows(mut self, cast: bool, receive: bool) -> Placement {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }
}

fn mesh(
    geometry: Geometry,
    material: Arc<Material>,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    geometry.validate()?;
    if !placement.position.is_finite() {
        return Err(FactoryError::MalformedShape(format!(
            "{} position {:?} is not finite",
            geometry.name(),
            placement.position
        )));
    }
    let name = geometry.name();
    let mut object = SceneObject::new_mesh(geometry, material);
    object.set_name(name);
    object.set_position(placement.position);
    object.set_shadows(placement.cast_shadow, placement.receive_shadow);
    Ok(object)
}

pub fn floor(width: f32, depth: f32, color: Color) -> Result<SceneObject, FactoryError> {
    Geometry::Plane { width, depth }.validate()?;
    let mut floor = SceneObject::new_plane(width, depth, Arc::new(Material::standard(color)));
    floor.set_name("floor");
    Ok(floor)
}

pub fn box_mesh(
    width: f32,
    height: f32,
    depth: f32,
    material: Arc<Material>,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    mesh(
        Geometry::Box {
            width,
            height,
            depth,
        },
        material,
        placement,
    )
}

pub fn capsule(
    radius: f32,
    length: f32,
    material: Arc<Material>,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    mesh(Geometry::Capsule { radius, length }, material, placement)
}

pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    material: Arc<Material>,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    mesh(
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
        },
        material,
        placement,
    )
}

pub fn torus(
    radius: f32,
    tube: f32,
    material: Arc<Material>,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    mesh(Geometry::Torus { radius, tube }, material, placement)
}

/// `count` points with every coordinate drawn uniformly from
/// `[-spread / 2, spread / 2]`.
pub fn particle_cloud<R: Rng + ?Sized>(
    count: usize,
    spread: f32,
    point_size: f32,
    color: Color,
    rng: &mut R,
) -> Result<SceneObject, FactoryError> {
    for (field, value) in [("spread", spread), ("size", point_size)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(FactoryError::InvalidDimension {
                shape: "particles",
                field,
                value,
            });
        }
    }
    let half = spread * 0.5;
    let positions = (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
                rng.gen_range(-half..=half),
            )
        })
        .collect();
    let material = Material::with_shading(color, ShadingModel::Points { size: point_size });
    let mut cloud = SceneObject::new_points(positions, Arc::new(material));
    cloud.set_name("particles");
    Ok(cloud)
}

/// Cube whose faces render from both windings.
pub fn double_sided_box(
    size: f32,
    color: Color,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    let material = Material {
        side: Side::Double,
        ..Material::standard(color)
    };
    let mut object = box_mesh(size, size, size, Arc::new(material), placement)?;
    object.set_name("double-sided-box");
    Ok(object)
}

/// The same torus-knot four times, one per response model, spread along X
/// around `center`.
pub fn torus_knot_gallery(
    radius: f32,
    tube: f32,
    center: Vec3,
    spacing: f32,
) -> Result<Vec<SceneObject>, FactoryError> {
    let geometry = Geometry::TorusKnot {
        radius,
        tube,
        p: 2,
        q: 3,
    };
    geometry.validate()?;
    // The (2, 3) knot curve reaches out to 1.5 * radius from its axis.
    let extent = 1.5 * radius + tube;
    if !(spacing.is_finite() && spacing > 2.0 * extent) {
        return Err(FactoryError::MalformedShape(format!(
            "torus-knot spacing {} would overlap knots of extent {}",
            spacing, extent
        )));
    }

    let color = Color::hex(0x2194ce);
    let variants = [
        ("torus-knot-lambert", Material::with_shading(color, ShadingModel::Lambert)),
        (
            "torus-knot-emissive",
            Material {
                emissive: Color::hex(0x441100),
                ..Material::with_shading(color, ShadingModel::Lambert)
            },
        ),
        (
            "torus-knot-phong",
            Material::with_shading(
                color,
                ShadingModel::Phong {
                    shininess: 60.0,
                    specular: Color::white(),
                },
            ),
        ),
        ("torus-knot-depth", Material::with_shading(color, ShadingModel::Depth)),
    ];

    let first = -0.5 * spacing * (variants.len() - 1) as f32;
    variants
        .into_iter()
        .enumerate()
        .map(|(i, (name, material))| -> Result<SceneObject, FactoryError> {
            let position = center + Vec3::new(first + spacing * i as f32, 0.0, 0.0);
            let mut knot = mesh(geometry.clone(), Arc::new(material), Placement::at(position))?;
            knot.set_name(name);
            Ok(knot)
        })
        .collect()
}

pub fn textured_mesh(
    texture: Arc<Texture>,
    geometry: Geometry,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    let mut object = mesh(geometry, Arc::new(Material::textured(texture)), placement)?;
    object.set_name("textured");
    Ok(object)
}

pub fn extruded_shape(
    outline: Vec<[f32; 2]>,
    depth: f32,
    bevel: f32,
    material: Arc<Material>,
    placement: Placement,
) -> Result<SceneObject, FactoryError> {
    mesh(
        Geometry::Extrude {
            outline,
            depth,
            bevel,
        },
        material,
        placement,
    )
}
