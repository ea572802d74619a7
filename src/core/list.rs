//! Singly-linked list whose nodes live in an [`Allocator`] pool.
//!
//! A [`List`] is only a handle (head index, length, id); every operation that
//! touches nodes takes the allocator explicitly. Copying a handle does not copy
//! the nodes, so exactly one owner should call [`List::free`].

use crate::core::allocator::{Allocator, ObjectPool};
use crate::Result;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// A pooled list node
#[derive(Debug, Clone, Default)]
pub struct ListNode<T> {
    pub item: T,
    pub next: Option<u32>,
}

type NodePool<T> = ObjectPool<ListNode<T>>;

/// Handle to a pooled singly-linked list.
///
/// Lists compare and order by `id` alone, which lets a list of lists be kept
/// sorted by the key of each inner list.
pub struct List<T> {
    head: Option<u32>,
    len: usize,
    pub id: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> List<T> {
    pub const fn new() -> Self {
        Self { head: None, len: 0, id: 0, _marker: PhantomData }
    }

    pub const fn with_id(id: u32) -> Self {
        Self { head: None, len: 0, id, _marker: PhantomData }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl<T: Default + 'static> List<T> {
    fn nodes(alloc: &Allocator) -> Option<&NodePool<T>> {
        alloc.pool::<ListNode<T>>(1)
    }

    fn nodes_mut(alloc: &mut Allocator) -> Result<&mut NodePool<T>> {
        let capacity = alloc.default_capacity();
        alloc.pool_or_create::<ListNode<T>>(1, capacity)
    }

    fn node(pool: &NodePool<T>, index: u32) -> Option<&ListNode<T>> {
        pool.get(index)?.first()
    }

    fn node_mut(pool: &mut NodePool<T>, index: u32) -> Option<&mut ListNode<T>> {
        pool.get_mut(index)?.first_mut()
    }

    fn new_node(pool: &mut NodePool<T>, item: T, next: Option<u32>) -> u32 {
        let index = pool.allocate();
        if let Some(node) = Self::node_mut(pool, index) {
            node.item = item;
            node.next = next;
        }
        index
    }

    /// Iterates the items from head to tail
    pub fn iter<'a>(&self, alloc: &'a Allocator) -> ListIter<'a, T> {
        ListIter {
            pool: Self::nodes(alloc),
            next: self.head,
            remaining: self.len,
        }
    }

    /// Prepends an item
    pub fn insert(&mut self, alloc: &mut Allocator, item: T) -> Result<()> {
        let pool = Self::nodes_mut(alloc)?;
        self.head = Some(Self::new_node(pool, item, self.head));
        self.len += 1;
        Ok(())
    }

    /// Releases every node back to the pool and empties the list
    pub fn free(&mut self, alloc: &mut Allocator) {
        if let Some(pool) = alloc.pool_mut::<ListNode<T>>(1) {
            let mut cursor = self.head;
            while let Some(index) = cursor {
                cursor = Self::node(pool, index).and_then(|n| n.next);
                pool.free(index);
            }
        }
        self.head = None;
        self.len = 0;
    }
}

impl<T: Default + PartialEq + 'static> List<T> {
    /// Full scan for an equal item
    pub fn contains(&self, alloc: &Allocator, item: &T) -> bool {
        self.iter(alloc).any(|i| i == item)
    }

    /// Prepends the item unless an equal one is present. Returns whether it was inserted.
    pub fn insert_unique(&mut self, alloc: &mut Allocator, item: T) -> Result<bool> {
        if self.contains(alloc, &item) {
            return Ok(false);
        }
        self.insert(alloc, item)?;
        Ok(true)
    }

    /// Removes the first equal item. Returns whether one was found.
    pub fn remove(&mut self, alloc: &mut Allocator, item: &T) -> bool {
        self.remove_where(alloc, |current| match current == item {
            true => Scan::Found,
            false => Scan::Continue,
        })
    }

    fn remove_where<F>(&mut self, alloc: &mut Allocator, mut check: F) -> bool
    where
        F: FnMut(&T) -> Scan,
    {
        let Some(pool) = alloc.pool_mut::<ListNode<T>>(1) else {
            return false;
        };

        let mut prev: Option<u32> = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let Some(node) = Self::node(pool, index) else {
                break;
            };
            let next = node.next;
            match check(&node.item) {
                Scan::Found => {
                    match prev {
                        None => self.head = next,
                        Some(p) => {
                            if let Some(prev_node) = Self::node_mut(pool, p) {
                                prev_node.next = next;
                            }
                        }
                    }
                    pool.free(index);
                    self.len -= 1;
                    return true;
                }
                Scan::Stop => return false,
                Scan::Continue => {}
            }
            prev = Some(index);
            cursor = next;
        }
        false
    }
}

impl<T: Default + Ord + 'static> List<T> {
    /// Last node whose item orders strictly before `item`, or None if `item` belongs at the head
    fn sorted_slot(&self, pool: &NodePool<T>, item: &T) -> Option<u32> {
        let head = self.head?;
        let head_node = Self::node(pool, head)?;
        if *item <= head_node.item {
            return None;
        }

        let mut current = head;
        while let Some(next) = Self::node(pool, current).and_then(|n| n.next) {
            match Self::node(pool, next) {
                Some(node) if node.item < *item => current = next,
                _ => break,
            }
        }
        Some(current)
    }

    fn insert_after(&mut self, pool: &mut NodePool<T>, slot: Option<u32>, item: T) {
        match slot {
            None => {
                self.head = Some(Self::new_node(pool, item, self.head));
            }
            Some(prev) => {
                let next = Self::node(pool, prev).and_then(|n| n.next);
                let index = Self::new_node(pool, item, next);
                if let Some(prev_node) = Self::node_mut(pool, prev) {
                    prev_node.next = Some(index);
                }
            }
        }
        self.len += 1;
    }

    /// Inserts keeping non-decreasing order. Equal items go before existing ones.
    pub fn insert_sorted(&mut self, alloc: &mut Allocator, item: T) -> Result<()> {
        let pool = Self::nodes_mut(alloc)?;
        let slot = self.sorted_slot(pool, &item);
        self.insert_after(pool, slot, item);
        Ok(())
    }

    /// Inserts keeping strict order. Returns false, leaving the list untouched,
    /// when an equal item already holds the slot.
    pub fn insert_sorted_unique(&mut self, alloc: &mut Allocator, item: T) -> Result<bool> {
        let pool = Self::nodes_mut(alloc)?;
        let slot = self.sorted_slot(pool, &item);
        let following = match slot {
            None => self.head,
            Some(prev) => Self::node(pool, prev).and_then(|n| n.next),
        };
        if let Some(node) = following.and_then(|i| Self::node(pool, i)) {
            if node.item == item {
                return Ok(false);
            }
        }
        self.insert_after(pool, slot, item);
        Ok(true)
    }

    /// Removes an equal item, giving up once the scan passes where it would sit
    pub fn remove_sorted(&mut self, alloc: &mut Allocator, item: &T) -> bool {
        self.remove_where(alloc, |current| match current.cmp(item) {
            Ordering::Equal => Scan::Found,
            Ordering::Greater => Scan::Stop,
            Ordering::Less => Scan::Continue,
        })
    }
}

impl<T: Default + Clone + 'static> List<T> {
    /// Copies the items out in list order
    pub fn to_vec(&self, alloc: &Allocator) -> Vec<T> {
        self.iter(alloc).cloned().collect()
    }
}

enum Scan {
    Found,
    Stop,
    Continue,
}

/// Iterator over the items of a [`List`]
pub struct ListIter<'a, T> {
    pool: Option<&'a NodePool<T>>,
    next: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool?;
        let index = self.next?;
        let node = pool.get(index)?.first()?;
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for List<T> {}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for List<T> {}

impl<T> PartialOrd for List<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for List<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("List")
            .field("id", &self.id)
            .field("len", &self.len)
            .finish()
    }
}
