//! Geometric Math

mod mat4;
mod quat;
mod vec3;
mod vec4;

pub use mat4::*;
pub use quat::*;
pub use vec3::*;
pub use vec4::*;

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}
