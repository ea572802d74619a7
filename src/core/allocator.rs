//! Pooled allocation of fixed-size element arrays.
//!
//! Pools are keyed by element type and array length. Each pool hands out
//! [`Slab`] handles instead of addresses; freed slabs go onto an available
//! stack and are reused last-in first-out. Pools grow by whole batches and
//! never shrink.

use crate::error::VoxelError;
use crate::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Number of slabs a pool creates each time it runs dry, unless overridden
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Handle to one pooled array of `T`
pub struct Slab<T> {
    index: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Slab<T> {
    fn new(index: u32, len: u32) -> Self {
        Self { index, len, _marker: PhantomData }
    }

    /// Position of the slab inside its pool
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Array length the slab was allocated with
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Clone for Slab<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slab<T> {}

impl<T> PartialEq for Slab<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.len == other.len
    }
}

impl<T> Eq for Slab<T> {}

impl<T> fmt::Debug for Slab<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Slab({}, len {})", self.index, self.len)
    }
}

/// Fixed-size slabs of `array_len` elements each
pub struct ObjectPool<T> {
    slabs: Vec<Box<[T]>>,
    in_use: Vec<bool>,
    available: Vec<u32>,
    capacity: usize,
    array_len: usize,
    batches: usize,
}

impl<T: Default> ObjectPool<T> {
    /// Creates a pool and fills it with its first batch of slabs
    pub fn new(capacity: usize, array_len: usize) -> Self {
        let mut pool = Self {
            slabs: Vec::with_capacity(capacity),
            in_use: Vec::with_capacity(capacity),
            available: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            array_len,
            batches: 0,
        };
        pool.add_batch();
        pool
    }

    fn add_batch(&mut self) {
        let start = self.slabs.len();
        for _ in 0..self.capacity {
            let slab: Box<[T]> = (0..self.array_len).map(|_| T::default()).collect();
            self.slabs.push(slab);
            self.in_use.push(false);
        }
        self.available.extend((start..start + self.capacity).map(|i| i as u32));
        self.batches += 1;

        if self.batches > 1 {
            log::debug!(
                "object pool of {} x {} grown to {} slabs",
                std::any::type_name::<T>(),
                self.array_len,
                self.slabs.len()
            );
        }
    }

    /// Takes the most recently freed slab, growing the pool when none is left
    pub fn allocate(&mut self) -> u32 {
        let index = match self.available.pop() {
            Some(index) => index,
            None => {
                self.add_batch();
                // add_batch always pushes at least one index
                self.available.pop().unwrap_or_default()
            }
        };
        self.in_use[index as usize] = true;
        index
    }
}

impl<T> ObjectPool<T> {
    /// Returns a slab to the available stack. Freeing a slab twice is ignored.
    pub fn free(&mut self, index: u32) -> bool {
        match self.in_use.get_mut(index as usize) {
            Some(used) if *used => {
                *used = false;
                self.available.push(index);
                true
            }
            _ => {
                log::warn!("ignoring free of slab {} that is not allocated", index);
                false
            }
        }
    }

    #[inline]
    pub fn get(&self, index: u32) -> Option<&[T]> {
        self.slabs.get(index as usize).map(|s| &s[..])
    }

    #[inline]
    pub fn get_mut(&mut self, index: u32) -> Option<&mut [T]> {
        self.slabs.get_mut(index as usize).map(|s| &mut s[..])
    }

    /// Total slabs ever created
    #[inline]
    pub fn total(&self) -> usize {
        self.slabs.len()
    }

    /// Slabs waiting on the available stack
    #[inline]
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// Slabs currently handed out
    #[inline]
    pub fn in_use(&self) -> usize {
        self.total() - self.available()
    }

    #[inline]
    pub fn array_len(&self) -> usize {
        self.array_len
    }
}

/// Owner of every object pool, keyed by (element type, array length)
pub struct Allocator {
    pools: HashMap<(TypeId, usize), Box<dyn Any>>,
    default_capacity: usize,
}

impl Allocator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Creates an allocator whose pools grow by `capacity` slabs at a time
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pools: HashMap::new(),
            default_capacity: capacity.max(1),
        }
    }

    /// Allocates an array of `len` elements from the matching pool
    pub fn allocate<T: Default + 'static>(&mut self, len: usize) -> Result<Slab<T>> {
        let capacity = self.default_capacity;
        self.allocate_with_capacity(len, capacity)
    }

    /// Like [`Allocator::allocate`], using `capacity` if the pool has to be created
    pub fn allocate_with_capacity<T: Default + 'static>(&mut self, len: usize, capacity: usize) -> Result<Slab<T>> {
        let index = self.pool_or_create::<T>(len, capacity)?.allocate();
        Ok(Slab::new(index, len as u32))
    }

    /// Returns a slab to its pool. Unknown pools are ignored.
    pub fn free<T: 'static>(&mut self, slab: Slab<T>) -> bool {
        match self.pool_mut::<T>(slab.len()) {
            Some(pool) => pool.free(slab.index),
            None => false,
        }
    }

    pub fn get<T: 'static>(&self, slab: Slab<T>) -> Option<&[T]> {
        self.pool::<T>(slab.len())?.get(slab.index)
    }

    pub fn get_mut<T: 'static>(&mut self, slab: Slab<T>) -> Option<&mut [T]> {
        self.pool_mut::<T>(slab.len())?.get_mut(slab.index)
    }

    /// The pool for `T` arrays of length `len`, if one was created
    pub fn pool<T: 'static>(&self, len: usize) -> Option<&ObjectPool<T>> {
        self.pools
            .get(&(TypeId::of::<T>(), len))
            .and_then(|p| p.downcast_ref::<ObjectPool<T>>())
    }

    pub fn pool_mut<T: 'static>(&mut self, len: usize) -> Option<&mut ObjectPool<T>> {
        self.pools
            .get_mut(&(TypeId::of::<T>(), len))
            .and_then(|p| p.downcast_mut::<ObjectPool<T>>())
    }

    /// The pool for `T` arrays of length `len`, created on first use
    pub fn pool_or_create<T: Default + 'static>(&mut self, len: usize, capacity: usize) -> Result<&mut ObjectPool<T>> {
        let key = (TypeId::of::<T>(), len);
        if !self.pools.contains_key(&key) {
            log::debug!(
                "creating object pool for {} x {} with capacity {}",
                std::any::type_name::<T>(),
                len,
                capacity
            );
            self.pools.insert(key, Box::new(ObjectPool::<T>::new(capacity, len)));
        }

        self.pools
            .get_mut(&key)
            .and_then(|p| p.downcast_mut::<ObjectPool<T>>())
            .ok_or_else(|| {
                VoxelError::AllocationFailed(format!(
                    "pool for {} x {} holds another element type",
                    std::any::type_name::<T>(),
                    len
                ))
            })
    }

    /// Number of distinct (type, length) pools
    #[inline]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    #[inline]
    pub fn default_capacity(&self) -> usize {
        self.default_capacity
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("pools", &self.pools.len())
            .field("default_capacity", &self.default_capacity)
            .finish()
    }
}
