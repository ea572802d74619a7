use crate::math::{Frame, Vector3, Vector3i};
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// One of the six axis-aligned directions.
///
/// The discriminants double as indices into per-direction tables; the first
/// three are the positive axes X, Y, Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Direction {
    Right = 0,
    Up = 1,
    Forward = 2,
    Left = 3,
    Down = 4,
    Back = 5,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Direction; 6] = [
        Direction::Right,
        Direction::Up,
        Direction::Forward,
        Direction::Left,
        Direction::Down,
        Direction::Back,
    ];

    /// Index into per-direction tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis this direction lies on (0 = X, 1 = Y, 2 = Z)
    #[inline]
    pub fn axis(self) -> usize {
        self.index() % 3
    }

    /// True for Right, Up and Forward
    #[inline]
    pub fn is_positive(self) -> bool {
        self.index() < 3
    }

    /// Positive or negative direction along an axis index
    pub fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis % 3, positive) {
            (0, true) => Direction::Right,
            (0, false) => Direction::Left,
            (1, true) => Direction::Up,
            (1, false) => Direction::Down,
            (_, true) => Direction::Forward,
            (_, false) => Direction::Back,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Forward => Direction::Back,
            Direction::Back => Direction::Forward,
        }
    }

    /// World-space unit vector
    #[inline]
    pub fn to_vector(self) -> Vector3 {
        match self {
            Direction::Right => Vector3::right(),
            Direction::Left => Vector3::left(),
            Direction::Up => Vector3::up(),
            Direction::Down => Vector3::down(),
            Direction::Forward => Vector3::forward(),
            Direction::Back => Vector3::back(),
        }
    }

    /// Integer step for voxel neighbourhood walks
    #[inline]
    pub fn to_offset(self) -> Vector3i {
        match self {
            Direction::Right => Vector3i::new(1, 0, 0),
            Direction::Left => Vector3i::new(-1, 0, 0),
            Direction::Up => Vector3i::new(0, 1, 0),
            Direction::Down => Vector3i::new(0, -1, 0),
            Direction::Forward => Vector3i::new(0, 0, 1),
            Direction::Back => Vector3i::new(0, 0, -1),
        }
    }

    /// The matching axis of `frame`
    #[inline]
    pub fn to_frame_vector(self, frame: &Frame) -> Vector3 {
        match self {
            Direction::Right => frame.right,
            Direction::Left => -frame.right,
            Direction::Up => frame.up,
            Direction::Down => -frame.up,
            Direction::Forward => frame.forward,
            Direction::Back => -frame.forward,
        }
    }

    /// Direction of the world axis with the largest absolute component.
    ///
    /// Ties prefer X over Y over Z; a zero component counts as positive.
    #[inline]
    pub fn from_vector(v: Vector3) -> Self {
        Self::from_frame_vector(v, &Frame::identity())
    }

    /// Like [`Direction::from_vector`], measured against the axes of `frame`
    pub fn from_frame_vector(v: Vector3, frame: &Frame) -> Self {
        let x = v.dot(&frame.right);
        let y = v.dot(&frame.up);
        let z = v.dot(&frame.forward);

        if x.abs() >= y.abs() && x.abs() >= z.abs() {
            if x >= 0.0 { Direction::Right } else { Direction::Left }
        } else if y.abs() >= z.abs() {
            if y >= 0.0 { Direction::Up } else { Direction::Down }
        } else if z >= 0.0 {
            Direction::Forward
        } else {
            Direction::Back
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Forward => "forward",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Back => "back",
        };
        write!(f, "{}", name)
    }
}
