//! Generational slot storage backing body and constraint handles.
//!
//! Removing an entry bumps the slot generation so stale handles resolve to
//! `None` instead of aliasing whatever is spawned into the slot later.
//! Iteration is always in ascending slot order, which keeps the solver
//! deterministic.

/// A handle that can be split into a slot index and a generation.
pub(crate) trait SlotKey: Copy {
    fn from_parts(index: u32, generation: u32) -> Self;
    fn index(self) -> u32;
    fn generation(self) -> u32;
}

#[derive(Clone, Debug)]
struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Clone, Debug)]
pub(crate) struct Slots<T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Slots<T> {
    pub fn insert<K: SlotKey>(&mut self, value: T) -> K {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            return K::from_parts(index, entry.generation);
        }
        let index = u32::try_from(self.entries.len()).unwrap_or(u32::MAX);
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        K::from_parts(index, 0)
    }

    pub fn remove<K: SlotKey>(&mut self, key: K) -> Option<T> {
        let entry = self.entries.get_mut(key.index() as usize)?;
        if entry.generation != key.generation() {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(key.index());
        self.len -= 1;
        Some(value)
    }

    pub fn get<K: SlotKey>(&self, key: K) -> Option<&T> {
        let entry = self.entries.get(key.index() as usize)?;
        if entry.generation != key.generation() {
            return None;
        }
        entry.value.as_ref()
    }

    pub fn get_mut<K: SlotKey>(&mut self, key: K) -> Option<&mut T> {
        let entry = self.entries.get_mut(key.index() as usize)?;
        if entry.generation != key.generation() {
            return None;
        }
        entry.value.as_mut()
    }

    /// Mutable access to two distinct live entries at once.
    pub fn get2_mut<K: SlotKey>(&mut self, a: K, b: K) -> Option<(&mut T, &mut T)> {
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        if ia == ib || ia >= self.entries.len() || ib >= self.entries.len() {
            return None;
        }
        let (first, second) = if ia < ib {
            let (lo, hi) = self.entries.split_at_mut(ib);
            (&mut lo[ia], &mut hi[0])
        } else {
            let (lo, hi) = self.entries.split_at_mut(ia);
            (&mut hi[0], &mut lo[ib])
        };
        if first.generation != a.generation() || second.generation != b.generation() {
            return None;
        }
        match (first.value.as_mut(), second.value.as_mut()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }

    pub fn contains<K: SlotKey>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn iter<K: SlotKey>(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.entries.iter().enumerate().filter_map(|(i, e)| {
            let index = u32::try_from(i).ok()?;
            e.value.as_ref().map(|v| (K::from_parts(index, e.generation), v))
        })
    }

    pub fn iter_mut<K: SlotKey>(&mut self) -> impl Iterator<Item = (K, &mut T)> + '_ {
        self.entries.iter_mut().enumerate().filter_map(|(i, e)| {
            let index = u32::try_from(i).ok()?;
            let generation = e.generation;
            e.value.as_mut().map(|v| (K::from_parts(index, generation), v))
        })
    }

    pub fn keys<K: SlotKey>(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k).collect()
    }
}
