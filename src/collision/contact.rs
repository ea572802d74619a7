use crate::math::{Direction, Vector3};
use crate::shapes::{Aabb, Edge};
use std::cmp::Ordering;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How a contact was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ContactKind {
    /// A box corner reached across a face
    Face,
    /// Gap between a box edge and a plane boundary edge
    Edge,
    /// Single point hit
    Point,
    /// The ray started inside the box
    Internal,
}

/// One contact or ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// Position of the contact in world space
    pub point: Vector3,

    /// Contact normal; for box contacts, the direction the box must move to separate
    pub normal: Vector3,

    /// Penetration depth for contacts, travelled distance for ray hits
    pub distance: f32,

    pub kind: ContactKind,
}

impl ContactPoint {
    pub fn new(point: Vector3, normal: Vector3, distance: f32, kind: ContactKind) -> Self {
        Self { point, normal, distance, kind }
    }

    /// An EDGE contact built from a gap edge
    pub fn from_edge(edge: &Edge) -> Self {
        Self::new(edge.from, edge.dir, edge.distance, ContactKind::Edge)
    }

    /// The contact seen as a segment from its point along its normal
    pub fn to_edge(&self) -> Edge {
        Edge::from_direction(self.point, self.normal, self.distance)
    }
}

/// Overlap between two world-aligned boxes.
///
/// `directions` orders the escape directions for the first box from the
/// shallowest axis to the deepest; each points to the side of the second
/// box's center that the first box lies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AabbContact {
    /// Overlapping volume
    pub region: Aabb,

    /// Componentwise sign of `a.position - b.position`
    pub quadrant: Vector3,

    /// Best, second and third escape direction
    pub directions: [Direction; 3],
}

impl AabbContact {
    /// Builds the contact from an overlap region and quadrant
    pub fn new(region: Aabb, quadrant: Vector3) -> Self {
        let half = region.half_extents();

        // Stable sort keeps X before Y before Z on ties
        let mut axes = [0usize, 1, 2];
        axes.sort_by(|&a, &b| {
            half.component(a)
                .partial_cmp(&half.component(b))
                .unwrap_or(Ordering::Equal)
        });

        let directions = axes.map(|axis| Direction::from_axis(axis, quadrant.component(axis) > 0.0));
        Self { region, quadrant, directions }
    }

    #[inline]
    pub fn best(&self) -> Direction {
        self.directions[0]
    }

    #[inline]
    pub fn second(&self) -> Direction {
        self.directions[1]
    }

    #[inline]
    pub fn third(&self) -> Direction {
        self.directions[2]
    }

    /// Depth of the overlap along the axis of `dir`
    #[inline]
    pub fn penetration_along(&self, dir: Direction) -> f32 {
        2.0 * self.region.half_extents().component(dir.axis())
    }

    /// Depth along the best direction
    #[inline]
    pub fn penetration(&self) -> f32 {
        self.penetration_along(self.best())
    }

    /// Translation that moves the first box out along the best direction
    pub fn resolution(&self) -> Vector3 {
        self.best().to_vector() * self.penetration()
    }
}
