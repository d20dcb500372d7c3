//! Slot storage with stable generational indices.
//!
//! Links between rungs are plain `Idx` values rather than owning pointers, so
//! the back-links of the doubly linked levels never form ownership cycles. A
//! slot's generation is bumped when it is freed, which lets a stale `Idx`
//! (for example a position whose rung was erased) be told apart from the
//! value that later reuses the slot.

use std::fmt::{Debug, Formatter};

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Idx {
    index: u32,
    generation: u32,
}

impl Idx {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl Debug for Idx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
enum Slot<E> {
    Occupied { generation: u32, entry: E },
    Vacant { generation: u32 },
}

#[derive(Debug, Clone)]
pub(crate) struct Arena<E> {
    slots: Vec<Slot<E>>,
    free: Vec<u32>,
    len: usize,
}

impl<E> Default for Arena<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<E> Arena<E> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn alloc(&mut self, entry: E) -> Idx {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let generation = match slot {
                Slot::Vacant { generation } => *generation,
                Slot::Occupied { .. } => unreachable!("free list points at a live slot"),
            };
            *slot = Slot::Occupied { generation, entry };
            return Idx::new(index, generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied {
            generation: 0,
            entry,
        });
        Idx::new(index, 0)
    }

    pub(crate) fn free(&mut self, idx: Idx) -> Option<E> {
        if !self.contains(idx) {
            return None;
        }
        let next = Slot::Vacant {
            generation: idx.generation.wrapping_add(1),
        };
        match std::mem::replace(&mut self.slots[idx.index as usize], next) {
            Slot::Occupied { entry, .. } => {
                self.free.push(idx.index);
                self.len -= 1;
                Some(entry)
            }
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get(&self, idx: Idx) -> Option<&E> {
        match self.slots.get(idx.index as usize)? {
            Slot::Occupied { generation, entry } if *generation == idx.generation => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, idx: Idx) -> Option<&mut E> {
        match self.slots.get_mut(idx.index as usize)? {
            Slot::Occupied { generation, entry } if *generation == idx.generation => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, idx: Idx) -> bool {
        self.get(idx).is_some()
    }

    /// Frees every slot. Generations survive so indices handed out before the
    /// clear stay dead.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation } => *generation,
            };
            *slot = Slot::Vacant { generation };
            self.free.push(index as u32);
        }
        self.len = 0;
    }
}

impl<E> std::ops::Index<Idx> for Arena<E> {
    type Output = E;

    fn index(&self, idx: Idx) -> &E {
        match self.get(idx) {
            Some(entry) => entry,
            None => panic!("dangling arena index {:?}", idx),
        }
    }
}

impl<E> std::ops::IndexMut<Idx> for Arena<E> {
    fn index_mut(&mut self, idx: Idx) -> &mut E {
        match self.get_mut(idx) {
            Some(entry) => entry,
            None => panic!("dangling arena index {:?}", idx),
        }
    }
}
