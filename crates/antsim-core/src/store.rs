use crate::AgentId;

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            value: None,
        }
    }
}

/// Deterministic, generational storage for agents.
///
/// - Stable iteration order: ascending slot index.
/// - O(1) insert; freed slots are reused lowest-last (LIFO free list).
/// - Safe handles: `AgentId { index, generation }`; a removed slot bumps its
///   generation so older handles resolve to `None`.
#[derive(Clone, Debug)]
pub struct SlotStore<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for SlotStore<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> SlotStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated (live or free).
    pub fn capacity_slots(&self) -> usize {
        self.slots.len()
    }

    /// Inserts a value built from its own handle.
    pub fn insert_with(&mut self, build: impl FnOnce(AgentId) -> T) -> AgentId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            let id = AgentId::new(index, slot.generation);
            slot.value = Some(build(id));
            id
        } else {
            let index = self.slots.len() as u32;
            let id = AgentId::new(index, 0);
            self.slots.push(Slot {
                generation: 0,
                value: Some(build(id)),
            });
            id
        }
    }

    pub fn insert(&mut self, value: T) -> AgentId {
        self.insert_with(|_| value)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: AgentId) -> Option<&T> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation == id.generation {
            slot.value.as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation == id.generation {
            slot.value.as_mut()
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: AgentId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    /// Removes every value matching `dead`, returning the freed handles in
    /// slot order. Runs as a single pass after iteration is over.
    pub fn remove_where(&mut self, mut dead: impl FnMut(&T) -> bool) -> Vec<AgentId> {
        let doomed: Vec<AgentId> = self
            .iter_ordered()
            .filter(|(_, value)| dead(value))
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        doomed
    }

    pub fn iter_ordered(&self) -> impl Iterator<Item = (AgentId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            Some((AgentId::new(index as u32, slot.generation), value))
        })
    }

    pub fn iter_ordered_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let value = slot.value.as_mut()?;
                Some((AgentId::new(index as u32, slot.generation), value))
            })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }
}
