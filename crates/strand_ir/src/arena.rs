//! Slot arena for IR entities with stable handles.
//!
//! Handles are indices into a slot vector. Removing an entity leaves a vacant
//! slot behind, so handles to every other entity stay valid while passes erase
//! subtrees or rewrite operations in place. Slots are never reused.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Handle types usable as arena keys.
pub trait ArenaId: Copy {
    /// Creates a handle from a raw slot index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw slot index.
    fn as_raw(self) -> u32;
}

/// Slot storage indexed by handles of type `I`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    slots: Vec<Option<T>>,
    live: usize,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
            _marker: PhantomData,
        }
    }

    /// Stores `item` in a fresh slot.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.slots.len() as u32);
        self.slots.push(Some(item));
        self.live += 1;
        id
    }

    /// Returns the entity behind `id`, or `None` if it was removed.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.slots.get(id.as_raw() as usize)?.as_ref()
    }

    /// Returns the entity behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or was removed.
    pub fn get(&self, id: I) -> &T {
        match self.try_get(id) {
            Some(item) => item,
            None => panic!("arena handle {} is vacant", id.as_raw()),
        }
    }

    /// Returns the entity behind `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or was removed.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        match self.slots.get_mut(id.as_raw() as usize) {
            Some(Some(item)) => item,
            _ => panic!("arena handle {} is vacant", id.as_raw()),
        }
    }

    /// Returns `true` if `id` refers to a live entity.
    pub fn contains(&self, id: I) -> bool {
        self.try_get(id).is_some()
    }

    /// Takes the entity out of its slot, leaving the slot vacant.
    pub fn remove(&mut self, id: I) -> Option<T> {
        let item = self.slots.get_mut(id.as_raw() as usize)?.take();
        if item.is_some() {
            self.live -= 1;
        }
        item
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no entity is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates over live `(handle, entity)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (I::from_raw(i as u32), item)))
    }

    /// Iterates over live entities in allocation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}
