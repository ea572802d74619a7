use crate::math::Vector3;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Orthonormal basis (right, up, forward) describing an orientation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Frame {
    pub right: Vector3,
    pub up: Vector3,
    pub forward: Vector3,
}

impl Frame {
    /// Creates a frame from its three axes
    #[inline]
    pub fn new(right: Vector3, up: Vector3, forward: Vector3) -> Self {
        Self { right, up, forward }
    }

    /// World-aligned frame
    #[inline]
    pub fn identity() -> Self {
        Self {
            right: Vector3::right(),
            up: Vector3::up(),
            forward: Vector3::forward(),
        }
    }

    /// Expresses a world direction in this frame's coordinates
    #[inline]
    pub fn local_direction(&self, direction: Vector3) -> Vector3 {
        Vector3::new(
            direction.dot(&self.right),
            direction.dot(&self.up),
            direction.dot(&self.forward),
        )
    }

    /// Expresses a world point in this frame's coordinates, relative to `origin`
    #[inline]
    pub fn local_position(&self, point: Vector3, origin: Vector3) -> Vector3 {
        self.local_direction(point - origin)
    }

    /// Converts frame coordinates back into a world direction
    #[inline]
    pub fn world_direction(&self, local: Vector3) -> Vector3 {
        self.right * local.x + self.up * local.y + self.forward * local.z
    }

    /// Normalizes each axis in place
    pub fn normalize_axes(&mut self) {
        self.right = self.right.normalize();
        self.up = self.up.normalize();
        self.forward = self.forward.normalize();
    }

    /// Returns true when all axes are unit length and mutually orthogonal
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        (self.right.length() - 1.0).abs() <= tolerance
            && (self.up.length() - 1.0).abs() <= tolerance
            && (self.forward.length() - 1.0).abs() <= tolerance
            && self.right.dot(&self.up).abs() <= tolerance
            && self.right.dot(&self.forward).abs() <= tolerance
            && self.up.dot(&self.forward).abs() <= tolerance
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[right: {}, up: {}, forward: {}]", self.right, self.up, self.forward)
    }
}
