//! Matrix4x4

use std::ops::{Index, IndexMut, Mul};

use crate::{Quaternion, Vec3, Vec4};

/// Column-major 4x4 matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const fn new(col0: Vec4, col1: Vec4, col2: Vec4, col3: Vec4) -> Mat4 {
        Mat4 {
            cols: [col0, col1, col2, col3],
        }
    }

    pub const fn identity() -> Mat4 {
        Self::new(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn from_translation(t: Vec3) -> Mat4 {
        let mut m = Self::identity();
        m.cols[3] = Vec4::from_xyz(t, 1.0);
        m
    }

    pub fn from_trs(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Mat4 {
        let mut m: Mat4 = rotation.into();
        m.cols[0] = m.cols[0] * scale.x;
        m.cols[1] = m.cols[1] * scale.y;
        m.cols[2] = m.cols[2] * scale.z;
        m.cols[3] = Vec4::from_xyz(translation, 1.0);
        m
    }

    /// Right-handed perspective projection with a [0, 1] depth range.
    /// `fov_y` is the vertical field of view in radians.
    pub fn perspective(fov_y: f32, aspect: f32, near_clip: f32, far_clip: f32) -> Mat4 {
        assert!(aspect > 0.0);
        assert!(fov_y > 0.0 && fov_y < std::f32::consts::PI);
        assert!(near_clip > 0.0);
        assert!(far_clip > near_clip);

        let f = 1.0 / (fov_y * 0.5).tan();
        let range = near_clip - far_clip;
        Mat4::new(
            Vec4::new(f / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, far_clip / range, -1.0),
            Vec4::new(0.0, 0.0, near_clip * far_clip / range, 0.0),
        )
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let f = (target - eye).normalized();
        let s = f.cross(up).normalized();
        let u = s.cross(f);
        Mat4::new(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
        )
    }

    pub fn translation(&self) -> Vec3 {
        self.cols[3].xyz()
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_xyz(p, 1.0)).xyz()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        Mat4::new(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn perspective_maps_clip_planes_to_unit_depth() {
        let p = Mat4::perspective(1.0, 1.5, 0.1, 100.0);
        let near = (p * Vec4::new(0.0, 0.0, -0.1, 1.0)).project();
        let far = (p * Vec4::new(0.0, 0.0, -100.0, 1.0)).project();
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 1.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::zero(), Vec3::pos_y());
        assert_abs_diff_eq!(view.transform_point(eye).max_abs(), 0.0, epsilon = 1e-5);
        let ahead = view.transform_point(Vec3::zero());
        assert!(ahead.z < 0.0);
    }

    #[test]
    fn trs_applies_scale_then_translation() {
        let m = Mat4::from_trs(Vec3::new(1.0, 2.0, 3.0), Quaternion::identity(), Vec3::splat(2.0));
        assert_eq!(m.transform_point(Vec3::one()), Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(m.translation(), Vec3::new(1.0, 2.0, 3.0));
    }
}
