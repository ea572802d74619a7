use crate::math::Direction;

/// Deepest penetration seen per escape direction, with the contact that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenetrationField<S> {
    depths: [f32; 6],
    sources: [Option<S>; 6],
}

impl<S: Copy> PenetrationField<S> {
    pub fn new() -> Self {
        Self {
            depths: [0.0; 6],
            sources: [None; 6],
        }
    }

    /// Records `depth` for `dir` if it beats the current deepest
    pub fn insert(&mut self, dir: Direction, depth: f32, source: S) -> bool {
        let slot = dir.index();
        if depth > self.depths[slot] {
            self.depths[slot] = depth;
            self.sources[slot] = Some(source);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn depth(&self, dir: Direction) -> f32 {
        self.depths[dir.index()]
    }

    #[inline]
    pub fn source(&self, dir: Direction) -> Option<S> {
        self.sources[dir.index()]
    }

    /// Directions with a nonzero penetration, in direction order
    pub fn entries(&self) -> impl Iterator<Item = (Direction, f32)> + '_ {
        Direction::ALL
            .into_iter()
            .map(|dir| (dir, self.depth(dir)))
            .filter(|(_, depth)| *depth > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.depths.iter().all(|d| *d <= 0.0)
    }
}

impl<S: Copy> Default for PenetrationField<S> {
    fn default() -> Self {
        Self::new()
    }
}
