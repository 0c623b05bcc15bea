//! Transform

use stage_geom::{Mat4, Quaternion, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub(crate) translation: Vec3,
    pub(crate) rotation: Quaternion,
    pub(crate) scale: Vec3,
}

impl Transform {
    pub const fn new(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Transform {
        Transform {
            translation,
            rotation,
            scale,
        }
    }

    pub const fn identity() -> Transform {
        Self::new(Vec3::zero(), Quaternion::identity(), Vec3::one())
    }

    pub const fn from_translation(translation: Vec3) -> Transform {
        Self::new(translation, Quaternion::identity(), Vec3::one())
    }

    pub fn with_rotation(mut self, rotation: Quaternion) -> Transform {
        self.rotation = rotation;
        self
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_trs(self.translation, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Transform> for Mat4 {
    fn from(t: Transform) -> Self {
        t.matrix()
    }
}
