//! Graphics Module
//!
//! Seam to the rendering backend. The scene graph is flattened into
//! [`RenderingData`] once per frame and handed to a [`RenderBackend`].

use std::sync::Arc;

use stage_geom::{Mat4, Vec3};
use thiserror::Error;

use crate::{
    scene::{
        material::Material, Geometry, Light, ObjectKind, PerspectiveCamera, Scene, SceneObject,
    },
    Color,
};

mod headless;
pub use headless::*;

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("Surface size {width}x{height} is not drawable")]
    ZeroSizedSurface { width: u32, height: u32 },
    #[error("Rendering backend error: {0}")]
    Backend(String),
}

pub type GraphicsResult<T> = Result<T, GraphicsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererCreateInfo {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
}

impl Default for RendererCreateInfo {
    fn default() -> Self {
        RendererCreateInfo {
            width: 0,
            height: 0,
            samples: 4,
        }
    }
}

impl RendererCreateInfo {
    pub fn sized(width: u32, height: u32) -> RendererCreateInfo {
        RendererCreateInfo {
            width,
            height,
            ..Default::default()
        }
    }

    pub(crate) fn check(&self) -> GraphicsResult<()> {
        if self.width == 0 || self.height == 0 {
            Err(GraphicsError::ZeroSizedSurface {
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(())
        }
    }
}

pub trait RenderBackend: Sized {
    fn new(create_info: &RendererCreateInfo) -> GraphicsResult<Self>;

    /// Resizes the backing surface.
    fn recreate(&mut self, create_info: &RendererCreateInfo) -> GraphicsResult<()>;

    fn render(&mut self, rendering_data: RenderingData) -> GraphicsResult<()>;
}

#[derive(Debug, Clone)]
pub struct PerFrame {
    pub view_projection: Mat4,
    pub eye: Vec3,
    pub clear_color: Color,
    pub ambient: f32,
}

#[derive(Debug, Clone)]
pub enum Primitive {
    Mesh(Arc<Geometry>),
    Points(Arc<Vec<Vec3>>),
}

#[derive(Debug, Clone)]
pub struct DrawItem {
    pub uid: usize,
    pub model: Mat4,
    pub primitive: Primitive,
    pub material: Arc<Material>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Clone)]
pub struct LightItem {
    pub light: Light,
    pub position: Vec3,
    pub cast_shadow: bool,
}

#[derive(Debug, Clone)]
pub struct RenderingData {
    pub per_frame: PerFrame,
    pub draws: Vec<DrawItem>,
    pub lights: Vec<LightItem>,
}

impl RenderingData {
    pub fn parse_scene(scene: &Scene, camera: &PerspectiveCamera) -> RenderingData {
        let mut data = RenderingData {
            per_frame: PerFrame {
                view_projection: camera.view_projection(),
                eye: camera.position(),
                clear_color: scene.params.clear_color,
                ambient: scene.params.ambient,
            },
            draws: vec![],
            lights: vec![],
        };
        data.record_render_info(scene.objects(), Mat4::identity());
        data
    }

    fn record_render_info(&mut self, objects: &[SceneObject], parent: Mat4) {
        for object in objects {
            let model = parent * object.transform().matrix();
            match object.kind() {
                ObjectKind::Mesh { geometry, material } => self.draws.push(DrawItem {
                    uid: object.uid(),
                    model,
                    primitive: Primitive::Mesh(geometry.clone()),
                    material: material.clone(),
                    cast_shadow: object.cast_shadow(),
                    receive_shadow: object.receive_shadow(),
                }),
                ObjectKind::Points {
                    positions,
                    material,
                } => self.draws.push(DrawItem {
                    uid: object.uid(),
                    model,
                    primitive: Primitive::Points(positions.clone()),
                    material: material.clone(),
                    cast_shadow: false,
                    receive_shadow: false,
                }),
                ObjectKind::Light(light) => self.lights.push(LightItem {
                    light: light.clone(),
                    position: model.translation(),
                    cast_shadow: object.cast_shadow(),
                }),
                ObjectKind::Group(children) => self.record_render_info(children, model),
            }
        }
    }

    pub fn shadow_casters(&self) -> usize {
        self.draws.iter().filter(|d| d.cast_shadow).count()
    }

    /// Shadow maps are only worth computing when a light and a mesh both opt in.
    pub fn needs_shadow_pass(&self) -> bool {
        self.lights.iter().any(|l| l.cast_shadow) && self.shadow_casters() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{LightConfig, SceneParams, Transform};

    #[test]
    fn groups_compose_transforms() {
        let mut child = SceneObject::new_mesh(
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::get_default(),
        );
        child.set_position(Vec3::new(1.0, 0.0, 0.0));
        let mut group = SceneObject::new_group(vec![child]);
        group.set_transform(Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        let mut scene = Scene::new(SceneParams::default());
        scene.add(group);
        scene.add(SceneObject::new_light(&LightConfig::baseline()));

        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        let data = RenderingData::parse_scene(&scene, &camera);
        assert_eq!(data.draws.len(), 1);
        assert_eq!(data.draws[0].model.translation(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(data.lights.len(), 1);
        assert_eq!(data.lights[0].position, Vec3::new(3.0, 4.0, 5.0));
        assert!(!data.needs_shadow_pass());
    }

    #[test]
    fn shadow_pass_needs_caster_and_light() {
        let mut cube = SceneObject::new_mesh(
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::get_default(),
        );
        cube.set_shadows(true, false);
        let mut scene = Scene::default();
        scene.add(cube);
        scene.add(SceneObject::new_light(&LightConfig::baseline()));

        let camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        let data = RenderingData::parse_scene(&scene, &camera);
        assert_eq!(data.shadow_casters(), 1);
        assert!(data.needs_shadow_pass());
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(RendererCreateInfo::sized(0, 600).check().is_err());
        assert!(RendererCreateInfo::sized(800, 600).check().is_ok());
    }
}
