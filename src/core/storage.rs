use std::marker::PhantomData;
use crate::core::{AgentHandle, BodyHandle};

/// Generic storage trait for simulated objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns all handles in insertion order
    fn handles(&self) -> Vec<H>;

    /// Returns an iterator over all items in insertion order
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    /// Returns a mutable iterator over all items in insertion order
    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

/// Handle types that index a [`SlotStorage`]
pub trait SlotHandle: Copy {
    fn from_slot(slot: u32) -> Self;
    fn slot(self) -> u32;
}

impl SlotHandle for BodyHandle {
    fn from_slot(slot: u32) -> Self {
        BodyHandle(slot)
    }

    fn slot(self) -> u32 {
        self.0
    }
}

impl SlotHandle for AgentHandle {
    fn from_slot(slot: u32) -> Self {
        AgentHandle(slot)
    }

    fn slot(self) -> u32 {
        self.0
    }
}

/// Append-only slots: handles are never reused and iteration follows creation order
pub struct SlotStorage<H, T> {
    items: Vec<Option<T>>,
    count: usize,
    _handle: PhantomData<H>,
}

/// Storage for rigid bodies
pub type BodyStorage<T> = SlotStorage<BodyHandle, T>;

/// Storage for agent controllers
pub type AgentStorage<T> = SlotStorage<AgentHandle, T>;

impl<H: SlotHandle, T> Storage<T, H> for SlotStorage<H, T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            _handle: PhantomData,
        }
    }

    fn add(&mut self, item: T) -> H {
        let handle = H::from_slot(self.items.len() as u32);
        self.items.push(Some(item));
        self.count += 1;
        handle
    }

    fn get(&self, handle: H) -> Option<&T> {
        self.items.get(handle.slot() as usize)?.as_ref()
    }

    fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.items.get_mut(handle.slot() as usize)?.as_mut()
    }

    fn remove(&mut self, handle: H) -> Option<T> {
        let removed = self.items.get_mut(handle.slot() as usize)?.take();
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }

    fn len(&self) -> usize {
        self.count
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn clear(&mut self) {
        self.items.clear();
        self.count = 0;
    }

    fn handles(&self) -> Vec<H> {
        self.iter().map(|(h, _)| h).collect()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.as_ref().map(|item| (H::from_slot(i as u32), item)))
    }

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a {
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(|(i, item)| item.as_mut().map(|item| (H::from_slot(i as u32), item)))
    }
}

impl<H: SlotHandle, T> SlotStorage<H, T> {
    /// Mutable access to two distinct items at once
    pub fn pair_mut(&mut self, a: H, b: H) -> Option<(&mut T, &mut T)> {
        let (a, b) = (a.slot() as usize, b.slot() as usize);
        if a == b || a >= self.items.len() || b >= self.items.len() {
            return None;
        }

        if a < b {
            let (left, right) = self.items.split_at_mut(b);
            Some((left[a].as_mut()?, right[0].as_mut()?))
        } else {
            let (left, right) = self.items.split_at_mut(a);
            Some((right[0].as_mut()?, left[b].as_mut()?))
        }
    }
}

impl<H: SlotHandle, T> Default for SlotStorage<H, T> {
    fn default() -> Self {
        <Self as Storage<T, H>>::new()
    }
}
