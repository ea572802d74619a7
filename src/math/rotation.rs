use crate::math::{Frame, Matrix3, Vector3};
use nalgebra as na;
use std::fmt;
use std::ops::{Mul, MulAssign};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Quaternion for representing rotations in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Quaternion {
    /// Real component
    pub w: f32,

    /// First imaginary component
    pub x: f32,

    /// Second imaginary component
    pub y: f32,

    /// Third imaginary component
    pub z: f32,
}

/// Rotation trait for rotation representations
pub trait Rotation {
    /// Rotate a vector by this rotation
    fn rotate_vector(&self, v: Vector3) -> Vector3;

    /// Get the angle in radians of this rotation
    fn angle(&self) -> f32;

    /// Get the axis of this rotation
    fn axis(&self) -> Vector3;
}

impl Quaternion {
    /// Creates a new quaternion
    #[inline]
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Creates an identity quaternion (no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Creates a quaternion from an axis-angle representation
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let half_angle = angle * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();

        let axis = axis.normalize();

        Self {
            w: c,
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// Creates a quaternion from Euler angles (in radians)
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        let (sin_x, cos_x) = (x * 0.5).sin_cos();
        let (sin_y, cos_y) = (y * 0.5).sin_cos();
        let (sin_z, cos_z) = (z * 0.5).sin_cos();

        Self {
            w: cos_x * cos_y * cos_z + sin_x * sin_y * sin_z,
            x: sin_x * cos_y * cos_z - cos_x * sin_y * sin_z,
            y: cos_x * sin_y * cos_z + sin_x * cos_y * sin_z,
            z: cos_x * cos_y * sin_z - sin_x * sin_y * cos_z,
        }
    }

    /// Creates a quaternion from a rotation matrix
    pub fn from_rotation_matrix(m: &Matrix3) -> Self {
        let trace = m.data[0][0] + m.data[1][1] + m.data[2][2];

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self {
                w: 0.25 / s,
                x: (m.data[2][1] - m.data[1][2]) * s,
                y: (m.data[0][2] - m.data[2][0]) * s,
                z: (m.data[1][0] - m.data[0][1]) * s,
            }
        } else if m.data[0][0] > m.data[1][1] && m.data[0][0] > m.data[2][2] {
            let s = 2.0 * (1.0 + m.data[0][0] - m.data[1][1] - m.data[2][2]).sqrt();
            Self {
                w: (m.data[2][1] - m.data[1][2]) / s,
                x: 0.25 * s,
                y: (m.data[0][1] + m.data[1][0]) / s,
                z: (m.data[0][2] + m.data[2][0]) / s,
            }
        } else if m.data[1][1] > m.data[2][2] {
            let s = 2.0 * (1.0 + m.data[1][1] - m.data[0][0] - m.data[2][2]).sqrt();
            Self {
                w: (m.data[0][2] - m.data[2][0]) / s,
                x: (m.data[0][1] + m.data[1][0]) / s,
                y: 0.25 * s,
                z: (m.data[1][2] + m.data[2][1]) / s,
            }
        } else {
            let s = 2.0 * (1.0 + m.data[2][2] - m.data[0][0] - m.data[1][1]).sqrt();
            Self {
                w: (m.data[1][0] - m.data[0][1]) / s,
                x: (m.data[0][2] + m.data[2][0]) / s,
                y: (m.data[1][2] + m.data[2][1]) / s,
                z: 0.25 * s,
            }
        }
    }

    /// Converts the quaternion to a rotation matrix
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        Matrix3::from_frame(&self.to_frame())
    }

    /// Creates the rotation that maps the world axes onto the given frame
    #[inline]
    pub fn from_frame(frame: &Frame) -> Self {
        Self::from_rotation_matrix(&Matrix3::from_frame(frame))
    }

    /// Returns the rotated world axes
    pub fn to_frame(&self) -> Frame {
        let Self { w, x, y, z } = *self;

        let xx = x * x;
        let yy = y * y;
        let zz = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Frame::new(
            Vector3::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy)),
            Vector3::new(2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx)),
            Vector3::new(2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy)),
        )
    }

    /// Shortest-arc rotation taking direction `from` onto direction `to`
    pub fn from_two_vectors(from: Vector3, to: Vector3) -> Self {
        let a = from.normalize().to_nalgebra();
        let b = to.normalize().to_nalgebra();

        match na::UnitQuaternion::rotation_between(&a, &b) {
            Some(q) => Self::from_nalgebra(q.quaternion()),
            None => {
                // Anti-parallel: half turn about any axis perpendicular to `from`
                let reference = if from.x.abs() < 0.9 { Vector3::right() } else { Vector3::up() };
                let axis = from.cross(&reference).normalize();
                Self::from_axis_angle(axis, std::f32::consts::PI)
            }
        }
    }

    /// Applies `rotation` on top of this orientation
    #[inline]
    pub fn rotate(&mut self, rotation: Quaternion) {
        *self = (rotation * *self).normalize();
    }

    /// Rotates `position` about `pivot`
    #[inline]
    pub fn rotate_around(&self, pivot: Vector3, position: Vector3) -> Vector3 {
        pivot + self.rotate_vector(position - pivot)
    }

    /// Returns the conjugate of this quaternion
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Returns the squared length of this quaternion
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the length of this quaternion
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalizes this quaternion
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > crate::math::EPSILON {
            Self {
                w: self.w / len,
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Quaternion::identity()
        }
    }

    /// Returns the inverse of this quaternion
    #[inline]
    pub fn inverse(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > crate::math::EPSILON {
            let inv_len_sq = 1.0 / len_sq;
            Self {
                w: self.w * inv_len_sq,
                x: -self.x * inv_len_sq,
                y: -self.y * inv_len_sq,
                z: -self.z * inv_len_sq,
            }
        } else {
            Quaternion::identity()
        }
    }

    /// Computes the dot product of two quaternions
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Convert to nalgebra Quaternion
    #[inline]
    pub fn to_nalgebra(&self) -> na::Quaternion<f32> {
        na::Quaternion::new(self.w, self.x, self.y, self.z)
    }

    /// Convert from nalgebra Quaternion
    #[inline]
    pub fn from_nalgebra(q: &na::Quaternion<f32>) -> Self {
        Self {
            w: q.scalar(),
            x: q.vector()[0],
            y: q.vector()[1],
            z: q.vector()[2],
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation for Quaternion {
    /// Rotates a vector by this quaternion
    fn rotate_vector(&self, v: Vector3) -> Vector3 {
        // q * v * q^-1
        let vec_quat = Quaternion::new(0.0, v.x, v.y, v.z);
        let result = *self * vec_quat * self.conjugate();

        Vector3::new(result.x, result.y, result.z)
    }

    /// Returns the angle in radians of this rotation
    fn angle(&self) -> f32 {
        2.0 * crate::math::clamp(self.w, -1.0, 1.0).acos()
    }

    /// Returns the normalized axis of this rotation
    fn axis(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z).normalize()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.w, self.x, self.y, self.z)
    }
}

// Quaternion multiplication
impl Mul for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

impl MulAssign for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
