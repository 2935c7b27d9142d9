//! Generational arena
//!
//! Slot map used for window handles. Removing a value bumps its slot's
//! generation, so an index held past `remove` never reaches the value that
//! later reuses the slot.

/// Generational index for safe references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenIndex {
    pub index: u32,
    pub generation: u32,
}

/// Generational arena (slot map)
#[derive(Debug)]
pub struct GenArena<T> {
    items: Vec<Option<(T, u32)>>,
    free_list: Vec<u32>,
    generations: Vec<u32>,
}

impl<T> GenArena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
            generations: Vec::new(),
        }
    }

    /// Insert item
    pub fn insert(&mut self, value: T) -> GenIndex {
        if let Some(index) = self.free_list.pop() {
            let generation = self.generations[index as usize];
            self.items[index as usize] = Some((value, generation));
            GenIndex { index, generation }
        } else {
            let index = self.items.len() as u32;
            self.items.push(Some((value, 0)));
            self.generations.push(0);
            GenIndex { index, generation: 0 }
        }
    }

    /// Get item
    pub fn get(&self, idx: GenIndex) -> Option<&T> {
        self.items
            .get(idx.index as usize)
            .and_then(|opt| opt.as_ref())
            .filter(|(_, g)| *g == idx.generation)
            .map(|(val, _)| val)
    }

    pub fn get_mut(&mut self, idx: GenIndex) -> Option<&mut T> {
        self.items
            .get_mut(idx.index as usize)
            .and_then(|opt| opt.as_mut())
            .filter(|(_, g)| *g == idx.generation)
            .map(|(val, _)| val)
    }

    pub fn contains(&self, idx: GenIndex) -> bool {
        self.get(idx).is_some()
    }

    /// Remove item
    pub fn remove(&mut self, idx: GenIndex) -> Option<T> {
        let slot = self.items.get_mut(idx.index as usize)?;
        match slot.take() {
            Some((val, g)) if g == idx.generation => {
                self.generations[idx.index as usize] += 1;
                self.free_list.push(idx.index);
                Some(val)
            }
            other => {
                // Stale index: put the current occupant back
                *slot = other;
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|i| i.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (GenIndex, &T)> {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref().map(|(val, generation)| {
                (
                    GenIndex {
                        index: index as u32,
                        generation: *generation,
                    },
                    val,
                )
            })
        })
    }
}

impl<T> Default for GenArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
