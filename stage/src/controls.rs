//! Orbit controls
//!
//! Drag to orbit the camera around its target, scroll to dolly in and out.
//! With damping enabled the motion eases out over the following frames,
//! which needs [`OrbitControls::update`] to run once per frame.

use std::f32::consts::PI;

use stage_geom::Vec3;

use crate::scene::PerspectiveCamera;

const POLAR_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    azimuth: f32,
    polar: f32,
    damping: Option<f32>,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    dragging: bool,
    last_pointer: Option<(f32, f32)>,
    delta_azimuth: f32,
    delta_polar: f32,
    delta_zoom: f32,
}

impl OrbitControls {
    /// Picks up the camera's current framing. `damping` is the fraction of the
    /// remaining motion applied per frame, in `(0, 1]`.
    pub fn from_camera(camera: &PerspectiveCamera, damping: Option<f32>) -> OrbitControls {
        let target = camera.target();
        let offset = camera.position() - target;
        let radius = offset.magnitude();
        let (azimuth, polar) = match radius > 0.0 {
            true => (
                offset.x.atan2(offset.z),
                (offset.y / radius).max(-1.0).min(1.0).acos(),
            ),
            false => (0.0, PI / 2.0),
        };
        OrbitControls {
            target,
            radius,
            azimuth,
            polar,
            damping: damping.map(|d| d.max(f32::EPSILON).min(1.0)),
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 0.5,
            max_distance: 200.0,
            dragging: false,
            last_pointer: None,
            delta_azimuth: 0.0,
            delta_polar: 0.0,
            delta_zoom: 0.0,
        }
    }

    pub fn damping_enabled(&self) -> bool {
        self.damping.is_some()
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn pointer_down(&mut self) {
        self.dragging = true;
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.last_pointer = None;
    }

    /// Cursor position in physical pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.dragging {
            if let Some((last_x, last_y)) = self.last_pointer {
                self.delta_azimuth -= (x - last_x) * self.rotate_speed;
                self.delta_polar -= (y - last_y) * self.rotate_speed;
            }
            self.last_pointer = Some((x, y));
        }
    }

    /// Positive `lines` dolly towards the target.
    pub fn scroll(&mut self, lines: f32) {
        self.delta_zoom += lines * self.zoom_speed;
    }

    /// Applies pending motion to the camera. Returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let idle = self.delta_azimuth.abs() < 1e-6
            && self.delta_polar.abs() < 1e-6
            && self.delta_zoom.abs() < 1e-6;
        if idle {
            self.delta_azimuth = 0.0;
            self.delta_polar = 0.0;
            self.delta_zoom = 0.0;
            return false;
        }

        let factor = self.damping.unwrap_or(1.0);
        self.azimuth += self.delta_azimuth * factor;
        self.polar = (self.polar + self.delta_polar * factor)
            .max(POLAR_EPSILON)
            .min(PI - POLAR_EPSILON);
        self.radius = (self.radius * (-self.delta_zoom * factor).exp())
            .max(self.min_distance)
            .min(self.max_distance);

        let keep = 1.0 - factor;
        self.delta_azimuth *= keep;
        self.delta_polar *= keep;
        self.delta_zoom *= keep;

        let sin_polar = self.polar.sin();
        let offset = Vec3::new(
            self.radius * sin_polar * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * sin_polar * self.azimuth.cos(),
        );
        camera.set_position(self.target + offset);
        camera.look_at(self.target);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        camera.set_position(Vec3::new(0.0, 1.0, 5.0));
        camera.look_at(Vec3::zero());
        camera
    }

    #[test]
    fn idle_controls_leave_camera_in_place() {
        let mut camera = camera();
        let mut controls = OrbitControls::from_camera(&camera, None);
        assert_relative_eq!(controls.distance(), 26f32.sqrt());
        assert!(!controls.update(&mut camera));
        assert_eq!(camera.position(), Vec3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn drag_orbits_at_constant_distance() {
        let mut camera = camera();
        let mut controls = OrbitControls::from_camera(&camera, None);
        controls.pointer_down();
        controls.pointer_moved(100.0, 100.0);
        controls.pointer_moved(160.0, 100.0);
        assert!(controls.update(&mut camera));

        let position = camera.position();
        assert_relative_eq!(position.magnitude(), 26f32.sqrt(), epsilon = 1e-4);
        assert_relative_eq!(position.y, 1.0, epsilon = 1e-4);
        assert!(position.x < 0.0);
        assert_eq!(camera.target(), Vec3::zero());
    }

    #[test]
    fn moves_without_a_pressed_button_are_ignored() {
        let mut camera = camera();
        let mut controls = OrbitControls::from_camera(&camera, None);
        controls.pointer_moved(0.0, 0.0);
        controls.pointer_moved(300.0, 300.0);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn scroll_dollies_towards_target() {
        let mut camera = camera();
        let mut controls = OrbitControls::from_camera(&camera, None);
        controls.scroll(2.0);
        controls.update(&mut camera);
        assert!(camera.position().magnitude() < 26f32.sqrt());
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let mut camera = camera();
        let mut controls = OrbitControls::from_camera(&camera, Some(0.25));
        assert!(controls.damping_enabled());
        controls.scroll(1.0);

        controls.update(&mut camera);
        let first = camera.position().magnitude();
        controls.update(&mut camera);
        let second = camera.position().magnitude();
        assert!(second < first);

        for _ in 0..200 {
            controls.update(&mut camera);
        }
        assert!(!controls.update(&mut camera));
        assert_relative_eq!(
            camera.position().magnitude(),
            26f32.sqrt() * (-0.1f32).exp(),
            epsilon = 1e-3
        );
    }
}
