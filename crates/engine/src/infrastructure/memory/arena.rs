//! Id-keyed arena for in-memory records.

use std::collections::BTreeMap;

use filmhub_domain::SequentialId;

/// Records keyed by storage-assigned ids.
///
/// New ids are one greater than the largest id currently held, or
/// [`SequentialId::first`] when the arena is empty. Iteration runs in
/// ascending id order, which is also insertion order.
#[derive(Debug, Clone)]
pub struct IdArena<K, V> {
    items: BTreeMap<K, V>,
}

impl<K: SequentialId, V> IdArena<K, V> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// The id the next [`insert`](Self::insert) will assign.
    pub fn next_id(&self) -> K {
        self.items
            .keys()
            .next_back()
            .map(|max| max.next())
            .unwrap_or_else(K::first)
    }

    pub fn insert(&mut self, value: V) -> K {
        let id = self.next_id();
        self.items.insert(id, value);
        id
    }

    /// Replaces the record under `id`. Returns `false` when nothing is stored there.
    pub fn replace(&mut self, id: K, value: V) -> bool {
        match self.items.get_mut(&id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: K) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: K) -> Option<&V> {
        self.items.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.items.iter().map(|(id, value)| (*id, value))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Only for exercising the allocation rule in tests; no delete is exposed.
    #[cfg(test)]
    pub fn remove(&mut self, id: K) -> Option<V> {
        self.items.remove(&id)
    }
}

impl<K: SequentialId, V> Default for IdArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
