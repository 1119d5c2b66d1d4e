//! Set of ordered id pairs backing friend and like links.

use std::collections::BTreeSet;

use crate::infrastructure::ports::LinkMode;

/// Presence map from ordered pairs `(from, to)` to "linked".
///
/// Links between different entity kinds (film likes) are always directed.
/// Links within one kind (friends) honour a [`LinkMode`]: in `Mutual` mode
/// linking `(a, b)` also stores `(b, a)`, and unlinking removes both.
#[derive(Debug, Clone)]
pub struct RelationStore<L, R> {
    pairs: BTreeSet<(L, R)>,
    mode: LinkMode,
}

impl<L: Ord + Copy, R: Ord + Copy> RelationStore<L, R> {
    pub fn directed() -> Self {
        Self {
            pairs: BTreeSet::new(),
            mode: LinkMode::Directed,
        }
    }

    /// Stores one ordered pair. Returns `false` if it was already present.
    pub fn insert(&mut self, from: L, to: R) -> bool {
        self.pairs.insert((from, to))
    }

    /// Removes one ordered pair. Returns `false` if it was absent.
    pub fn remove(&mut self, from: L, to: R) -> bool {
        self.pairs.remove(&(from, to))
    }

    #[cfg(test)]
    pub fn contains(&self, from: L, to: R) -> bool {
        self.pairs.contains(&(from, to))
    }

    /// Every `to` linked from `from`, ascending.
    pub fn targets(&self, from: L) -> BTreeSet<R> {
        self.pairs
            .iter()
            .filter(|(l, _)| *l == from)
            .map(|(_, r)| *r)
            .collect()
    }

    /// Every `from` linked to `to`, ascending.
    pub fn sources(&self, to: R) -> BTreeSet<L> {
        self.pairs
            .iter()
            .filter(|(_, r)| *r == to)
            .map(|(l, _)| *l)
            .collect()
    }
}

impl<K: Ord + Copy> RelationStore<K, K> {
    pub fn with_mode(mode: LinkMode) -> Self {
        Self {
            pairs: BTreeSet::new(),
            mode,
        }
    }

    /// Links `a` to `b`, and `b` to `a` as well in `Mutual` mode.
    pub fn link(&mut self, a: K, b: K) {
        self.pairs.insert((a, b));
        if self.mode == LinkMode::Mutual {
            self.pairs.insert((b, a));
        }
    }

    /// Unlinks `a` from `b`, and `b` from `a` as well in `Mutual` mode.
    pub fn unlink(&mut self, a: K, b: K) {
        self.pairs.remove(&(a, b));
        if self.mode == LinkMode::Mutual {
            self.pairs.remove(&(b, a));
        }
    }

    /// Targets shared by `a` and `b`, ascending.
    pub fn common_targets(&self, a: K, b: K) -> BTreeSet<K> {
        let of_b = self.targets(b);
        self.targets(a)
            .into_iter()
            .filter(|k| of_b.contains(k))
            .collect()
    }
}
