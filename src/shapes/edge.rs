use crate::math::{clamp, Vector3, TOLERANCE};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A directed line segment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Edge {
    pub from: Vector3,
    pub to: Vector3,
    /// Unit direction from `from` to `to`, zero for a degenerate edge
    pub dir: Vector3,
    /// Length of the segment
    pub distance: f32,
}

impl Edge {
    /// Creates the edge between two points
    pub fn new(from: Vector3, to: Vector3) -> Self {
        let mut edge = Self { from, to, dir: Vector3::zero(), distance: 0.0 };
        edge.update_direction();
        edge
    }

    /// Creates an edge starting at `from` and running `distance` along the unit vector `dir`
    pub fn from_direction(from: Vector3, dir: Vector3, distance: f32) -> Self {
        Self { from, to: from + dir * distance, dir, distance }
    }

    fn update_direction(&mut self) {
        let delta = self.to - self.from;
        self.distance = delta.length();
        self.dir = if self.distance > crate::math::EPSILON {
            delta / self.distance
        } else {
            Vector3::zero()
        };
    }

    /// Point at parameter `t` along the edge
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector3 {
        self.from + self.dir * t
    }

    /// The same segment walked the other way
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            dir: -self.dir,
            distance: self.distance,
        }
    }

    /// Reverses the edge when it points away from `alignment`
    pub fn align(&mut self, alignment: Vector3) {
        if alignment.dot(&self.dir) < 0.0 {
            *self = self.reversed();
        }
    }

    /// Gap from the nearest point of this segment to `point`
    pub fn closest_edge_to_point(&self, point: Vector3) -> Edge {
        let projection = (point - self.from).dot(&self.dir);
        let t = clamp(projection, 0.0, self.distance);
        Edge::new(self.point_at(t), point)
    }

    /// Shortest gap from this segment to `other`, running from this edge to the other.
    ///
    /// Nearly parallel edges fall back to the gap from this edge to `other.from`.
    pub fn closest_edge_to_edge(&self, other: &Edge) -> Edge {
        let cross = self.dir.cross(&other.dir);
        let cross_length2 = cross.length_squared();
        if cross_length2 < TOLERANCE {
            return self.closest_edge_to_point(other.from);
        }

        let delta = other.from - self.from;
        let t = delta.cross(&other.dir).dot(&cross) / cross_length2;
        let s = delta.cross(&self.dir).dot(&cross) / cross_length2;
        let t = clamp(t, 0.0, self.distance);
        let s = clamp(s, 0.0, other.distance);

        Edge::new(self.point_at(t), other.point_at(s))
    }
}
