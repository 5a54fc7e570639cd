//! Ordered map with an undo log for checkpoint/rollback.
//!
//! While at least one mark is open, every write remembers the value it
//! replaced. Rolling back to a mark replays those entries in reverse, so
//! the cost of a rollback is proportional to the writes made since the
//! mark, not to the size of the map. When the outermost mark is committed
//! the log is dropped.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// Position in the undo log at the time a mark was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoMark {
    len: usize,
}

/// A `BTreeMap` whose writes can be rolled back to an [`UndoMark`].
#[derive(Debug, Clone)]
pub struct UndoMap<K, V> {
    map: BTreeMap<K, V>,
    /// `(key, value before the write)`, oldest first.
    undo: Vec<(K, Option<V>)>,
    /// Marks taken and not yet committed or rolled back.
    open: usize,
}

impl<K, V> Default for UndoMap<K, V> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
            undo: Vec::new(),
            open: 0,
        }
    }
}

impl<K: Ord + Clone, V: Clone> UndoMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or overwrite. Returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prior = self.map.insert(key.clone(), value);
        if self.open > 0 {
            self.undo.push((key, prior.clone()));
        }
        prior
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let prior = self.map.remove(key);
        if self.open > 0 && prior.is_some() {
            self.undo.push((key.clone(), prior.clone()));
        }
        prior
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.map.iter()
    }

    pub fn values(&self) -> btree_map::Values<'_, K, V> {
        self.map.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Writes remembered since the outermost open mark.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.undo.len()
    }

    /// Start tracking writes.
    pub fn mark(&mut self) -> UndoMark {
        self.open += 1;
        UndoMark {
            len: self.undo.len(),
        }
    }

    /// Keep every write made since `mark`.
    pub fn commit(&mut self, _mark: UndoMark) {
        self.close();
    }

    /// Undo every write made since `mark`, newest first.
    pub fn rollback(&mut self, mark: UndoMark) {
        while self.undo.len() > mark.len {
            let Some((key, prior)) = self.undo.pop() else {
                break;
            };
            match prior {
                Some(value) => {
                    self.map.insert(key, value);
                }
                None => {
                    self.map.remove(&key);
                }
            }
        }
        self.close();
    }

    fn close(&mut self) {
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.undo.clear();
        }
    }
}
