//! Scene manager module

pub mod builder;
mod camera;
pub mod factory;
mod geometry;
mod light;
pub mod material;
mod node;
mod trs;

pub use builder::*;
pub use camera::*;
pub use factory::FactoryError;
pub use geometry::*;
pub use light::*;
pub use node::*;
pub use trs::Transform;

use crate::Color;

#[derive(Debug, Clone)]
pub struct SceneParams {
    pub ambient: f32,
    pub clear_color: Color,
}

impl Default for SceneParams {
    fn default() -> Self {
        SceneParams {
            ambient: 0.0,
            clear_color: Color::black(),
        }
    }
}

/// Ordered collection of top-level objects. Insertion order is draw order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    pub params: SceneParams,
}

impl Scene {
    pub fn new(params: SceneParams) -> Scene {
        Scene {
            objects: vec![],
            params,
        }
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn count_role(&self, role: ObjectRole) -> usize {
        self.objects.iter().filter(|o| o.role() == role).count()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name() == Some(name))
    }
}
