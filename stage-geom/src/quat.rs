//! Quaternion

use std::ops::Mul;

use crate::{Mat4, Vec3, Vec4};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    v: Vec3,
    w: f32,
}

impl Quaternion {
    /// Rotation of `theta` radians around `axis`.
    pub fn from_axis_angle(axis: Vec3, theta: f32) -> Quaternion {
        let (s, c) = (theta * 0.5).sin_cos();
        Quaternion {
            v: axis.normalized() * s,
            w: c,
        }
    }

    /// XYZ-ordered Euler angles in radians.
    pub fn from_euler(x: f32, y: f32, z: f32) -> Quaternion {
        Self::from_axis_angle(Vec3::pos_z(), z)
            * Self::from_axis_angle(Vec3::pos_y(), y)
            * Self::from_axis_angle(Vec3::pos_x(), x)
    }

    pub const fn identity() -> Quaternion {
        Quaternion {
            v: Vec3::zero(),
            w: 1.0,
        }
    }

    pub fn apply_to(self, p: Vec3) -> Vec3 {
        let t = self.v.cross(p) * 2.0;
        p + t * self.w + self.v.cross(t)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Quaternion> for Vec4 {
    fn from(q: Quaternion) -> Self {
        Vec4::from_xyz(q.v, q.w)
    }
}

impl From<Quaternion> for Mat4 {
    fn from(q: Quaternion) -> Self {
        let (x, y, z, w) = (q.v.x, q.v.y, q.v.z, q.w);
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, yz, zx) = (x * y, y * z, z * x);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        Mat4::new(
            Vec4::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy + zw), 2.0 * (zx - yw), 0.0),
            Vec4::new(2.0 * (xy - zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + xw), 0.0),
            Vec4::new(2.0 * (zx + yw), 2.0 * (yz - xw), 1.0 - 2.0 * (xx + yy), 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Self::Output {
        Quaternion {
            v: rhs.v * self.w + self.v * rhs.w + self.v.cross(rhs.v),
            w: self.w * rhs.w - self.v.dot(rhs.v),
        }
    }
}
