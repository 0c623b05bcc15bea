//! Scene objects

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use lazy_static::lazy_static;
use stage_geom::{Quaternion, Vec3};

use super::{
    material::Material, Geometry, Light, LightConfig, LightMode, Transform,
};

/// What an object is in the composition, independent of what it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRole {
    Floor,
    Light,
    Content,
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Mesh {
        geometry: Arc<Geometry>,
        material: Arc<Material>,
    },
    Points {
        positions: Arc<Vec<Vec3>>,
        material: Arc<Material>,
    },
    Light(Light),
    Group(Vec<SceneObject>),
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(crate) uid: usize,
    pub(crate) name: Option<String>,
    pub(crate) role: ObjectRole,
    pub(crate) transform: Transform,
    pub(crate) kind: ObjectKind,
    pub(crate) cast_shadow: bool,
    pub(crate) receive_shadow: bool,
}

lazy_static! {
    static ref NEXT_UID: AtomicUsize = AtomicUsize::new(0);
}

impl SceneObject {
    pub(super) fn gen_uid() -> usize {
        NEXT_UID.fetch_add(1, Ordering::SeqCst)
    }

    fn with_kind(role: ObjectRole, kind: ObjectKind) -> SceneObject {
        SceneObject {
            uid: Self::gen_uid(),
            name: None,
            role,
            transform: Transform::identity(),
            kind,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn new_mesh(geometry: Geometry, material: Arc<Material>) -> SceneObject {
        Self::with_kind(
            ObjectRole::Content,
            ObjectKind::Mesh {
                geometry: Arc::new(geometry),
                material,
            },
        )
    }

    pub fn new_points(positions: Vec<Vec3>, material: Arc<Material>) -> SceneObject {
        Self::with_kind(
            ObjectRole::Content,
            ObjectKind::Points {
                positions: Arc::new(positions),
                material,
            },
        )
    }

    pub fn new_group(children: Vec<SceneObject>) -> SceneObject {
        Self::with_kind(ObjectRole::Content, ObjectKind::Group(children))
    }

    /// Ground plane lying in XZ, facing +Y, receiving shadows.
    pub fn new_plane(width: f32, depth: f32, material: Arc<Material>) -> SceneObject {
        let mut plane = Self::with_kind(
            ObjectRole::Floor,
            ObjectKind::Mesh {
                geometry: Arc::new(Geometry::Plane { width, depth }),
                material,
            },
        );
        plane.transform = Transform::identity().with_rotation(Quaternion::from_axis_angle(
            Vec3::pos_x(),
            -std::f32::consts::FRAC_PI_2,
        ));
        plane.receive_shadow = true;
        plane
    }

    pub fn new_light(config: &LightConfig) -> SceneObject {
        let mode = config.mode();
        let (light, position, cast_shadow) = match *config {
            LightConfig::Ambient { color, intensity } => {
                (Light::new(mode, color, intensity), Vec3::zero(), false)
            }
            LightConfig::Directional {
                color,
                intensity,
                position,
                target,
                cast_shadow,
            } => {
                let mut light = Light::new(mode, color, intensity);
                light.target = Some(target.into());
                (light, position.into(), cast_shadow)
            }
            LightConfig::Point {
                color,
                intensity,
                position,
                distance,
                cast_shadow,
            } => {
                let mut light = Light::new(mode, color, intensity);
                light.distance = distance;
                (light, position.into(), cast_shadow)
            }
            LightConfig::Spot {
                color,
                intensity,
                position,
                target,
                angle,
                penumbra,
                cast_shadow,
            } => {
                let mut light = Light::new(mode, color, intensity);
                light.target = Some(target.into());
                light.cone = angle;
                light.penumbra = penumbra;
                (light, position.into(), cast_shadow)
            }
            LightConfig::Hemisphere {
                sky_color,
                ground_color,
                intensity,
            } => {
                let mut light = Light::new(mode, sky_color, intensity);
                light.ground_color = Some(ground_color);
                (light, Vec3::pos_y(), false)
            }
        };
        let cast_shadow = cast_shadow && light.supports_shadow();
        let mut node = Self::with_kind(ObjectRole::Light, ObjectKind::Light(light));
        node.transform = Transform::from_translation(position);
        node.cast_shadow = cast_shadow;
        node
    }

    pub fn uid(&self) -> usize {
        self.uid
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn role(&self) -> ObjectRole {
        self.role
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
    }

    pub fn cast_shadow(&self) -> bool {
        self.cast_shadow
    }

    pub fn receive_shadow(&self) -> bool {
        self.receive_shadow
    }

    pub fn set_shadows(&mut self, cast: bool, receive: bool) {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&Arc<Material>> {
        match &self.kind {
            ObjectKind::Mesh { material, .. } | ObjectKind::Points { material, .. } => {
                Some(material)
            }
            _ => None,
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            ObjectKind::Mesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    pub fn is_light_of(&self, mode: LightMode) -> bool {
        self.light().map_or(false, |l| l.mode == mode)
    }
}

impl PartialEq for SceneObject {
    fn eq(&self, other: &SceneObject) -> bool {
        self.uid == other.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn uids_are_unique() {
        let a = SceneObject::new_group(vec![]);
        let b = SceneObject::new_group(vec![]);
        assert_ne!(a.uid(), b.uid());
        assert_ne!(a, b);
    }

    #[test]
    fn plane_faces_up_and_receives_shadow() {
        let floor = SceneObject::new_plane(10.0, 10.0, Material::get_default());
        assert_eq!(floor.role(), ObjectRole::Floor);
        assert!(floor.receive_shadow());
        assert!(!floor.cast_shadow());
        let normal = floor.transform().rotation().apply_to(Vec3::pos_z());
        assert!((normal - Vec3::pos_y()).max_abs() < 1e-5);
    }

    #[test]
    fn light_built_from_config() {
        let sun = SceneObject::new_light(&LightConfig::baseline());
        assert_eq!(sun.role(), ObjectRole::Light);
        assert!(sun.cast_shadow());
        assert_eq!(sun.position(), Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(sun.light().and_then(|l| l.target), Some(Vec3::zero()));

        let ambient = SceneObject::new_light(&LightConfig::Ambient {
            color: Color::white(),
            intensity: 0.4,
        });
        assert!(ambient.is_light_of(LightMode::Ambient));
        assert!(!ambient.cast_shadow());
    }

    #[test]
    fn shadow_flag_ignored_for_lights_without_shadow_maps() {
        let config: LightConfig = serde_json::from_str(
            r#"{ "kind": "hemisphere", "sky_color": 16777215, "ground_color": 4473924, "intensity": 1.0 }"#,
        )
        .unwrap();
        let sky = SceneObject::new_light(&config);
        assert!(!sky.cast_shadow());
        assert_eq!(sky.light().and_then(|l| l.ground_color), Some(Color::hex(0x444444)));
    }
}
