use crate::core::{BodyEvent, BodyEventType, BodyHandle};
use crate::error::PhysicsError;
use crate::Result;

/// Generic storage trait for physics objects
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

    /// Returns all live handles in insertion order
    fn handles(&self) -> Vec<H>;

    /// Returns an iterator over all items
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    /// Returns a mutable iterator over all items
    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

/// Slot bookkeeping for one handle index
#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Bumped every time the slot is vacated, so stale handles stop resolving
    generation: u32,

    /// Position in the dense vector while the slot is occupied
    dense: Option<usize>,
}

/// Storage for physics bodies.
///
/// Items live in a dense vector kept in insertion order. A slot table maps
/// handles to dense positions; each slot carries a generation so that a
/// handle to a removed item never aliases a newer one.
///
/// When journaling is on, every add and remove is also logged as a
/// `BodyEvent`, whoever made the change.
pub struct BodyStorage<T> {
    items: Vec<(BodyHandle, T)>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    journal: Option<Vec<BodyEvent>>,
}

impl<T> BodyStorage<T> {
    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Returns whether the handle still refers to a live item
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.dense_index(handle).is_some()
    }

    /// Borrows two distinct items mutably at once.
    ///
    /// Returns `None` if either handle is stale or both name the same item.
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut T, &mut T)> {
        let ia = self.dense_index(a)?;
        let ib = self.dense_index(b)?;

        if ia == ib {
            return None;
        }

        if ia < ib {
            let (left, right) = self.items.split_at_mut(ib);
            Some((&mut left[ia].1, &mut right[0].1))
        } else {
            let (left, right) = self.items.split_at_mut(ia);
            Some((&mut right[0].1, &mut left[ib].1))
        }
    }

    /// Starts logging adds and removes for `take_changes`
    pub(crate) fn record_changes(&mut self) {
        self.journal.get_or_insert_with(Vec::new);
    }

    /// Returns the changes logged since the last call, oldest first
    pub(crate) fn take_changes(&mut self) -> Vec<BodyEvent> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn log_change(&mut self, event_type: BodyEventType, body: BodyHandle) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(BodyEvent { event_type, body });
        }
    }

    fn dense_index(&self, handle: BodyHandle) -> Option<usize> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.dense
    }
}

impl<T> Default for BodyStorage<T> {
    fn default() -> Self {
        <Self as Storage<T, BodyHandle>>::new()
    }
}

impl<T> Storage<T, BodyHandle> for BodyStorage<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            slots: Vec::new(),
            free: Vec::new(),
            journal: None,
        }
    }

    fn add(&mut self, item: T) -> BodyHandle {
        let dense = self.items.len();

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.dense = Some(dense);
                BodyHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, dense: Some(dense) });
                BodyHandle::new(index, 0)
            }
        };

        self.items.push((handle, item));
        self.log_change(BodyEventType::Added, handle);
        handle
    }

    fn get(&self, handle: BodyHandle) -> Option<&T> {
        let index = self.dense_index(handle)?;
        Some(&self.items[index].1)
    }

    fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        let index = self.dense_index(handle)?;
        Some(&mut self.items[index].1)
    }

    fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        let index = self.dense_index(handle)?;

        let slot = &mut self.slots[handle.index as usize];
        slot.dense = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);

        let (_, item) = self.items.remove(index);

        // Everything after the removed item shifted down by one.
        for (moved, _) in &self.items[index..] {
            if let Some(dense) = self.slots[moved.index as usize].dense.as_mut() {
                *dense -= 1;
            }
        }

        self.log_change(BodyEventType::Removed, handle);
        Some(item)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clear(&mut self) {
        for (handle, _) in std::mem::take(&mut self.items) {
            let slot = &mut self.slots[handle.index as usize];
            slot.dense = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(handle.index);
            self.log_change(BodyEventType::Removed, handle);
        }
    }

    fn handles(&self) -> Vec<BodyHandle> {
        self.items.iter().map(|(h, _)| *h).collect()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (BodyHandle, &'a T)> + 'a where T: 'a {
        self.items.iter().map(|(h, item)| (*h, item))
    }

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (BodyHandle, &'a mut T)> + 'a where T: 'a {
        self.items.iter_mut().map(|(h, item)| (*h, item))
    }
}
