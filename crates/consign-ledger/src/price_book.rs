//! Price book: the accepted payment methods of every slot.
//!
//! Each slot owns a [`PriceList`] with an explicit length marker. The
//! backing table only grows; when a list shrinks, entries past the new
//! length are cleared so a stale pair can never be read back.

use consign_types::{PricePair, Result, ShopError, SlotId};

use crate::undo::{UndoMap, UndoMark};

/// One slot's price list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceList {
    /// Backing table. `entries[i]` is `Some` exactly for `i < len`.
    entries: Vec<Option<PricePair>>,
    /// Recorded length.
    len: usize,
}

impl PriceList {
    fn from_pairs(pairs: &[PricePair]) -> Self {
        Self {
            entries: pairs.iter().map(|p| Some(p.normalized())).collect(),
            len: pairs.len(),
        }
    }

    /// Overwrite `[0, new_len)` and clear `[new_len, old_len)`.
    fn overwrite(&mut self, pairs: &[PricePair]) {
        for (i, pair) in pairs.iter().enumerate() {
            let pair = Some(pair.normalized());
            match self.entries.get_mut(i) {
                Some(entry) => *entry = pair,
                None => self.entries.push(pair),
            }
        }
        for entry in self.entries.iter_mut().take(self.len).skip(pairs.len()) {
            *entry = None;
        }
        self.len = pairs.len();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The pair at `index`, absent when `index >= len`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<PricePair> {
        if index >= self.len {
            return None;
        }
        self.entries.get(index).copied().flatten()
    }

    /// The live pairs, in order.
    #[must_use]
    pub fn pairs(&self) -> Vec<PricePair> {
        self.entries[..self.len].iter().filter_map(|e| *e).collect()
    }

    /// The whole backing table, cleared entries included.
    #[must_use]
    pub fn stored_entries(&self) -> &[Option<PricePair>] {
        &self.entries
    }

    /// `len` equals the number of populated entries counted from index 0.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let populated = self.entries.iter().take_while(|e| e.is_some()).count();
        populated == self.len && self.entries[self.len..].iter().all(Option::is_none)
    }
}

/// Owns the price list of every slot.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    lists: UndoMap<SlotId, PriceList>,
}

impl PriceBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give a freshly created slot its price list.
    ///
    /// # Errors
    /// `EmptyPriceList` if `pairs` is empty.
    pub fn attach(&mut self, slot: SlotId, pairs: &[PricePair]) -> Result<()> {
        if pairs.is_empty() {
            return Err(ShopError::EmptyPriceList);
        }
        self.lists.insert(slot, PriceList::from_pairs(pairs));
        Ok(())
    }

    /// Replace a slot's price list. Returns the previous length.
    ///
    /// # Errors
    /// - `EmptyPriceList` if `pairs` is empty
    /// - `SlotNotFound` if the slot has no price list
    pub fn replace(&mut self, slot: SlotId, pairs: &[PricePair]) -> Result<usize> {
        if pairs.is_empty() {
            return Err(ShopError::EmptyPriceList);
        }
        let mut list = self
            .lists
            .get(&slot)
            .ok_or(ShopError::SlotNotFound(slot))?
            .clone();
        let old_len = list.len;
        list.overwrite(pairs);
        debug_assert!(list.is_consistent());
        self.lists.insert(slot, list);
        Ok(old_len)
    }

    /// Start recording changes so they can be rolled back.
    pub fn checkpoint(&mut self) -> UndoMark {
        self.lists.mark()
    }

    pub fn commit(&mut self, mark: UndoMark) {
        self.lists.commit(mark);
    }

    /// Restore every list attached or replaced since `mark`.
    pub fn rollback(&mut self, mark: UndoMark) {
        self.lists.rollback(mark);
    }

    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.lists.pending()
    }

    #[must_use]
    pub fn list(&self, slot: SlotId) -> Option<&PriceList> {
        self.lists.get(&slot)
    }

    /// Recorded length of a slot's list.
    #[must_use]
    pub fn len_of(&self, slot: SlotId) -> Option<usize> {
        self.lists.get(&slot).map(PriceList::len)
    }

    /// The pair at `(slot, index)`, absent for unknown slots or indices past the end.
    #[must_use]
    pub fn pair(&self, slot: SlotId, index: usize) -> Option<PricePair> {
        self.lists.get(&slot).and_then(|l| l.get(index))
    }

    /// Pick the pair a buyer asked for.
    ///
    /// # Errors
    /// - `SlotNotFound` if the slot has no price list
    /// - `PriceIndexOutOfRange` if `index >= len`
    pub fn select(&self, slot: SlotId, index: usize) -> Result<PricePair> {
        let list = self.lists.get(&slot).ok_or(ShopError::SlotNotFound(slot))?;
        list.get(index).ok_or(ShopError::PriceIndexOutOfRange {
            slot,
            index,
            len: list.len,
        })
    }
}
