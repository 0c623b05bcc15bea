//! Camera

use stage_geom::{deg_to_rad, Mat4, Vec3};

/// Perspective camera. The viewport manager owns `aspect`; everything else is
/// set up once by the host or moved by the orbit controls.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    fov: f32,
    aspect: f32,
    near_clip: f32,
    far_clip: f32,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// `fov` is the vertical field of view in degrees.
    pub fn new(fov: f32, aspect: f32, near_clip: f32, far_clip: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera {
            fov,
            aspect,
            near_clip,
            far_clip,
            position: Vec3::zero(),
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::pos_y(),
            projection: Mat4::identity(),
        };
        camera.update_projection();
        camera
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Only updates the stored ratio; call [`update_projection`](Self::update_projection)
    /// before the next draw.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective(
            deg_to_rad(self.fov),
            self.aspect,
            self.near_clip,
            self.far_clip,
        );
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
