mod vector;
mod matrix;
mod rotation;
mod frame;
mod direction;
mod ray;

pub use vector::{Vector3, Vector3i};
pub use matrix::Matrix3;
pub use rotation::{Quaternion, Rotation};
pub use frame::Frame;
pub use direction::Direction;
pub use ray::Ray;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Tolerance for degenerate geometry (near-parallel directions, points lying on planes)
pub const TOLERANCE: f32 = 1.0e-5;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Returns -1, 0 or 1 depending on the sign of the value
#[inline]
pub fn sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else if value == 0.0 {
        0.0
    } else {
        1.0
    }
}

/// Clamps a value between a minimum and maximum value
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
