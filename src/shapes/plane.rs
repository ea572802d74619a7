use crate::math::{Direction, Frame, Quaternion, Rotation, Vector3};
use crate::shapes::Edge;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A bounded rectangular patch, such as a ground tile or a ramp.
///
/// `frame.up` is the unit normal; the patch spans `right_half_size` along
/// `frame.right` and `forward_half_size` along `frame.forward` on each side
/// of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ImplicitPlane {
    pub center: Vector3,
    pub frame: Frame,
    pub right_half_size: f32,
    pub forward_half_size: f32,
}

impl ImplicitPlane {
    /// Creates a patch facing `normal`, spun by `angle` radians about the normal
    pub fn new(center: Vector3, normal: Vector3, right_half_size: f32, forward_half_size: f32, angle: f32) -> Self {
        let up = normal.normalize();
        let alignment = up.dot(&Vector3::forward());
        let right = if alignment == 1.0 {
            Vector3::right()
        } else if alignment == -1.0 {
            Vector3::left()
        } else {
            up.cross(&Vector3::forward()).normalize()
        };

        let right = Quaternion::from_axis_angle(up, angle).rotate_vector(right);
        let forward = right.cross(&up);

        Self {
            center,
            frame: Frame::new(right, up, forward),
            right_half_size,
            forward_half_size,
        }
    }

    /// Creates a patch from an explicit orthonormal frame
    pub fn from_frame(center: Vector3, frame: Frame, right_half_size: f32, forward_half_size: f32) -> Self {
        Self { center, frame, right_half_size, forward_half_size }
    }

    #[inline]
    pub fn normal(&self) -> Vector3 {
        self.frame.up
    }

    /// Corners in the order (+right +forward), (+right -forward), (-right +forward), (-right -forward)
    pub fn vertices(&self) -> [Vector3; 4] {
        let r = self.frame.right * self.right_half_size;
        let f = self.frame.forward * self.forward_half_size;
        [
            self.center + r + f,
            self.center + r - f,
            self.center - r + f,
            self.center - r - f,
        ]
    }

    /// Corner picked by a Right/Left and a Forward/Back direction
    pub fn vertex_by_directions(&self, x_dir: Direction, z_dir: Direction) -> Option<Vector3> {
        let r = match x_dir {
            Direction::Right => self.frame.right * self.right_half_size,
            Direction::Left => -self.frame.right * self.right_half_size,
            _ => return None,
        };
        let f = match z_dir {
            Direction::Forward => self.frame.forward * self.forward_half_size,
            Direction::Back => -self.frame.forward * self.forward_half_size,
            _ => return None,
        };
        Some(self.center + r + f)
    }

    fn corner(&self, right: f32, forward: f32) -> Vector3 {
        self.center
            + self.frame.right * (right * self.right_half_size)
            + self.frame.forward * (forward * self.forward_half_size)
    }

    // Right/Left edges run along +forward, Forward/Back edges along +right.
    fn boundary_edge(&self, dir: Direction) -> Edge {
        let along_forward = 2.0 * self.forward_half_size;
        let along_right = 2.0 * self.right_half_size;
        match dir {
            Direction::Right => Edge {
                from: self.corner(1.0, -1.0),
                to: self.corner(1.0, 1.0),
                dir: self.frame.forward,
                distance: along_forward,
            },
            Direction::Left => Edge {
                from: self.corner(-1.0, -1.0),
                to: self.corner(-1.0, 1.0),
                dir: self.frame.forward,
                distance: along_forward,
            },
            Direction::Forward => Edge {
                from: self.corner(-1.0, 1.0),
                to: self.corner(1.0, 1.0),
                dir: self.frame.right,
                distance: along_right,
            },
            _ => Edge {
                from: self.corner(-1.0, -1.0),
                to: self.corner(1.0, -1.0),
                dir: self.frame.right,
                distance: along_right,
            },
        }
    }

    /// Boundary edge on the given side. Up and Down have no edge.
    pub fn edge_by_direction(&self, dir: Direction) -> Option<Edge> {
        match dir {
            Direction::Up | Direction::Down => None,
            _ => Some(self.boundary_edge(dir)),
        }
    }

    /// Side whose boundary is nearest to `point`, measured in half-size units
    pub fn closest_edge_direction(&self, point: Vector3) -> Direction {
        let delta = point - self.center;
        let right = delta.dot(&self.frame.right) / self.right_half_size;
        let forward = delta.dot(&self.frame.forward) / self.forward_half_size;

        if right.abs() >= forward.abs() {
            if right >= 0.0 { Direction::Right } else { Direction::Left }
        } else if forward >= 0.0 {
            Direction::Forward
        } else {
            Direction::Back
        }
    }

    /// Boundary edge nearest to `point`
    pub fn closest_edge_to_point(&self, point: Vector3) -> Edge {
        self.boundary_edge(self.closest_edge_direction(point))
    }

    /// True when `point` projects onto the patch along its normal
    pub fn contains_projection(&self, point: Vector3) -> bool {
        let delta = point - self.center;
        delta.dot(&self.frame.right).abs() <= self.right_half_size
            && delta.dot(&self.frame.forward).abs() <= self.forward_half_size
    }

    /// Signed distance from the unbounded plane, positive on the normal side
    #[inline]
    pub fn signed_distance(&self, point: Vector3) -> f32 {
        (point - self.center).dot(&self.frame.up)
    }
}

impl Default for ImplicitPlane {
    fn default() -> Self {
        Self::from_frame(Vector3::zero(), Frame::identity(), 5.0, 5.0)
    }
}
