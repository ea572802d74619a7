use crate::collision::{ContactKind, ContactPoint};
use crate::math::Vector3;
use crate::shapes::Edge;

/// Maximum number of contact points to store in a manifold
pub const MAX_CONTACT_POINTS: usize = 8;

/// Contacts from one narrow-phase test, tracking the deepest one
#[derive(Debug, Clone, Default)]
pub struct Manifold {
    contacts: Vec<ContactPoint>,
    deepest: Option<usize>,
    deepest_distance: f32,
}

impl Manifold {
    pub fn new() -> Self {
        Self {
            contacts: Vec::with_capacity(MAX_CONTACT_POINTS),
            deepest: None,
            deepest_distance: 0.0,
        }
    }

    /// Adds a contact unless the manifold is full. Returns whether it was stored.
    pub fn add_contact(&mut self, contact: ContactPoint) -> bool {
        if self.contacts.len() >= MAX_CONTACT_POINTS {
            return false;
        }

        if self.deepest.is_none() || contact.distance > self.deepest_distance {
            self.deepest = Some(self.contacts.len());
            self.deepest_distance = contact.distance;
        }
        self.contacts.push(contact);
        true
    }

    /// Adds a gap edge as an EDGE contact
    pub fn add_edge_contact(&mut self, edge: &Edge) -> bool {
        self.add_contact(ContactPoint::from_edge(edge))
    }

    #[inline]
    pub fn contacts(&self) -> &[ContactPoint] {
        &self.contacts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// The contact with the largest penetration
    pub fn deepest(&self) -> Option<&ContactPoint> {
        self.contacts.get(self.deepest?)
    }

    #[inline]
    pub fn deepest_index(&self) -> Option<usize> {
        self.deepest
    }

    /// Deepest contact of the given kind
    pub fn deepest_of_kind(&self, kind: ContactKind) -> Option<&ContactPoint> {
        self.contacts
            .iter()
            .filter(|c| c.kind == kind)
            .fold(None, |best: Option<&ContactPoint>, c| match best {
                Some(b) if b.distance >= c.distance => Some(b),
                _ => Some(c),
            })
    }

    /// Number of contacts of the given kind
    pub fn count_of_kind(&self, kind: ContactKind) -> usize {
        self.contacts.iter().filter(|c| c.kind == kind).count()
    }

    /// Contact lying furthest along `dir` as seen from `origin`
    pub fn contact_closest_to_direction(&self, dir: Vector3, origin: Vector3) -> Option<&ContactPoint> {
        self.contacts.iter().fold(None, |best: Option<&ContactPoint>, c| match best {
            Some(b) if dir.dot(&(b.point - origin)) >= dir.dot(&(c.point - origin)) => Some(b),
            _ => Some(c),
        })
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
        self.deepest = None;
        self.deepest_distance = 0.0;
    }
}
