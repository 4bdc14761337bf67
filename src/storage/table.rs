//! String-keyed hash table with open addressing and lazy deletion.
//!
//! Collisions are resolved by linear probing. Removing an entry does not
//! empty its slot but leaves a [`Slot::Tombstone`] behind, so that probe
//! sequences of keys inserted after the removed one stay intact. Lookups walk
//! past tombstones and stop at the first [`Slot::Empty`]; insertions reuse the
//! first tombstone on the probe sequence. Tombstones are only reclaimed when
//! the table is rehashed.
//!
//! Keys are stored as `Rc<str>`. The stored key is exposed to callers (see
//! [`HashTable::stored_key`] and [`HashTable::entry_at_mut`]) so that they can
//! share it instead of keeping their own copy.

use std::{
    hash::{BuildHasher, BuildHasherDefault},
    iter::FusedIterator,
    mem,
    rc::Rc,
    slice,
};

use rustc_hash::FxHasher;

use crate::core::{
    error::{InsertError, InsertErrorKind},
    InsertPolicy, TableConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub key: Rc<str>,
    pub item: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot<T> {
    #[default]
    Empty,
    Occupied(Entry<T>),
    Tombstone,
}

impl<T> Slot<T> {
    pub fn is_live(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    pub fn entry(&self) -> Option<&Entry<T>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    fn entry_mut(&mut self) -> Option<&mut Entry<T>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            Slot::Empty | Slot::Tombstone => None,
        }
    }
}

/// Outcome of a successful [`HashTable::insert`].
#[derive(Debug, PartialEq)]
pub struct Inserted<T> {
    /// Slot now holding the item. Valid until the next insertion.
    pub slot: usize,
    /// The item that was replaced under [`InsertPolicy::Overwrite`].
    pub displaced: Option<T>,
}

#[derive(Debug, Clone)]
pub struct HashTable<T> {
    slots: Vec<Slot<T>>,
    len: usize,
    tombstones: usize,
    config: TableConfig,
    hasher: BuildHasherDefault<FxHasher>,
}

impl<T> HashTable<T> {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(config.slot_count(), Slot::default);

        Self {
            slots,
            len: 0,
            tombstones: 0,
            config,
            hasher: BuildHasherDefault::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Raw view of the slot array, including empty and tombstoned slots.
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn search(&self, key: &str) -> Option<&T> {
        self.find(key).and_then(|slot| self.entry_at(slot)).map(|e| &e.item)
    }

    pub fn search_mut(&mut self, key: &str) -> Option<&mut T> {
        let slot = self.find(key)?;
        self.slots[slot].entry_mut().map(|entry| &mut entry.item)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// The table's own copy of `key`, if present.
    pub fn stored_key(&self, key: &str) -> Option<&Rc<str>> {
        self.find(key)
            .and_then(|slot| self.entry_at(slot))
            .map(|entry| &entry.key)
    }

    pub fn entry_at(&self, slot: usize) -> Option<&Entry<T>> {
        self.slots.get(slot).and_then(Slot::entry)
    }

    pub fn entry_at_mut(&mut self, slot: usize) -> Option<(&Rc<str>, &mut T)> {
        self.slots
            .get_mut(slot)
            .and_then(Slot::entry_mut)
            .map(|entry| (&entry.key, &mut entry.item))
    }

    pub fn insert(
        &mut self,
        key: Rc<str>,
        item: T,
        policy: InsertPolicy,
    ) -> Result<Inserted<T>, InsertError<T>> {
        if let Some(slot) = self.find(&key) {
            if !policy.overwrites() {
                return Err(InsertError::new(item, InsertErrorKind::DuplicateKey));
            }

            if let Some(entry) = self.slots[slot].entry_mut() {
                // The key that is already stored is kept, handles to it
                // remain valid.
                let displaced = mem::replace(&mut entry.item, item);
                return Ok(Inserted {
                    slot,
                    displaced: Some(displaced),
                });
            }
        }

        if let Err(kind) = self.reserve_one() {
            return Err(InsertError::new(item, kind));
        }

        let slot = self.vacant_slot(&key);
        if self.slots[slot].is_tombstone() {
            self.tombstones -= 1;
        }

        self.slots[slot] = Slot::Occupied(Entry { key, item });
        self.len += 1;

        Ok(Inserted {
            slot,
            displaced: None,
        })
    }

    pub fn delete(&mut self, key: &str) -> Option<(Rc<str>, T)> {
        let slot = self.find(key)?;
        self.take_at(slot)
    }

    /// Removes the entry in `slot`, leaving a tombstone. Returns `None` for
    /// empty and tombstoned slots.
    pub fn take_at(&mut self, slot: usize) -> Option<(Rc<str>, T)> {
        if !self.slots.get(slot)?.is_live() {
            return None;
        }

        match mem::replace(&mut self.slots[slot], Slot::Tombstone) {
            Slot::Occupied(Entry { key, item }) => {
                self.len -= 1;
                self.tombstones += 1;
                Some((key, item))
            }
            other => {
                self.slots[slot] = other;
                None
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    fn home(&self, key: &str) -> usize {
        // Capacity is always a power of two.
        (self.hasher.hash_one(key) as usize) & (self.slots.len() - 1)
    }

    fn find(&self, key: &str) -> Option<usize> {
        let mask = self.slots.len() - 1;
        let mut index = self.home(key);

        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(entry) if &*entry.key == key => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }

            index = (index + 1) & mask;
        }

        None
    }

    // Must only be called for keys that are not present and after
    // `reserve_one`, which guarantees a non-occupied slot.
    fn vacant_slot(&self, key: &str) -> usize {
        let mask = self.slots.len() - 1;
        let mut index = self.home(key);

        while self.slots[index].is_live() {
            index = (index + 1) & mask;
        }

        index
    }

    fn reserve_one(&mut self) -> Result<(), InsertErrorKind> {
        let capacity = self.slots.len();
        let limit = capacity as f64 * self.config.load_factor();

        if ((self.len + self.tombstones + 1) as f64) < limit {
            return Ok(());
        }

        // When most of the load is tombstones, rehashing in place is enough.
        let new_capacity = if ((self.len + 1) as f64) < limit / 2.0 {
            capacity
        } else {
            capacity
                .checked_mul(2)
                .ok_or(InsertErrorKind::CapacityOverflow)?
        };

        self.rehash(new_capacity)
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<(), InsertErrorKind> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(new_capacity)
            .map_err(|_| InsertErrorKind::CapacityOverflow)?;
        slots.resize_with(new_capacity, Slot::default);

        let old = mem::replace(&mut self.slots, slots);
        let reclaimed = mem::take(&mut self.tombstones);

        for slot in old {
            if let Slot::Occupied(entry) = slot {
                let index = self.vacant_slot(&entry.key);
                self.slots[index] = Slot::Occupied(entry);
            }
        }

        log::debug!(
            "rehashed table to {} slots ({} entries, {} tombstones reclaimed)",
            new_capacity,
            self.len,
            reclaimed
        );

        Ok(())
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over live entries. Empty and tombstoned slots are skipped.
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a str, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Slot::Occupied(entry) = slot {
                self.remaining -= 1;
                return Some((&*entry.key, &entry.item));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

pub struct IterMut<'a, T> {
    inner: slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (&'a str, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Slot::Occupied(entry) = slot {
                self.remaining -= 1;
                return Some((&*entry.key, &mut entry.item));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    fn key(s: &str) -> Rc<str> {
        Rc::from(s)
    }

    #[test]
    fn insert_search() {
        let mut table = HashTable::new();

        table.insert(key("a"), 1, InsertPolicy::Reject).unwrap();
        table.insert(key("b"), 2, InsertPolicy::Reject).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.search("a"), Some(&1));
        assert_eq!(table.search("b"), Some(&2));
        assert_eq!(table.search("c"), None);

        *table.search_mut("a").unwrap() += 10;
        assert_eq!(table.search("a"), Some(&11));
    }

    #[test]
    fn reject_duplicate() {
        let mut table = HashTable::new();

        table.insert(key("a"), 1, InsertPolicy::Reject).unwrap();
        let err = table.insert(key("a"), 2, InsertPolicy::Reject).unwrap_err();

        assert_eq!(err.item, 2);
        assert_eq!(err.kind, InsertErrorKind::DuplicateKey);
        assert_eq!(table.search("a"), Some(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn overwrite_keeps_stored_key() {
        let mut table = HashTable::new();

        table.insert(key("a"), 1, InsertPolicy::Reject).unwrap();
        let stored = table.stored_key("a").cloned().unwrap();

        let staged = key("a");
        let inserted = table
            .insert(staged.clone(), 2, InsertPolicy::Overwrite)
            .unwrap();

        assert_eq!(inserted.displaced, Some(1));
        assert_eq!(table.search("a"), Some(&2));
        assert_eq!(table.len(), 1);
        assert!(Rc::ptr_eq(table.stored_key("a").unwrap(), &stored));
        assert!(!Rc::ptr_eq(table.stored_key("a").unwrap(), &staged));
    }

    #[test]
    fn delete_leaves_tombstone() {
        let mut table = HashTable::new();

        table.insert(key("a"), 1, InsertPolicy::Reject).unwrap();
        table.insert(key("b"), 2, InsertPolicy::Reject).unwrap();

        assert_matches!(table.delete("a"), Some((k, 1)) if &*k == "a");
        assert_eq!(table.delete("a"), None);

        assert_eq!(table.len(), 1);
        assert_eq!(table.tombstones(), 1);
        assert_eq!(table.slots().iter().filter(|s| s.is_tombstone()).count(), 1);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![("b", &2)]);
    }

    #[test]
    fn reinsert_reuses_tombstone() {
        let mut table = HashTable::new();

        table.insert(key("a"), 1, InsertPolicy::Reject).unwrap();
        table.delete("a");
        assert_eq!(table.tombstones(), 1);

        table.insert(key("a"), 2, InsertPolicy::Reject).unwrap();
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.search("a"), Some(&2));
    }

    #[test]
    fn lookup_walks_past_tombstones() {
        let mut table = HashTable::with_config(TableConfig::default().initial_capacity(8));
        let keys = ["k0", "k1", "k2", "k3", "k4"];

        for (i, k) in keys.iter().enumerate() {
            table.insert(key(k), i, InsertPolicy::Reject).unwrap();
        }

        // Whatever the collision pattern, removing keys must not hide the
        // ones probed past them.
        table.delete("k0");
        table.delete("k2");

        for (i, k) in keys.iter().enumerate() {
            if i == 0 || i == 2 {
                assert_eq!(table.search(k), None);
            } else {
                assert_eq!(table.search(k), Some(&i));
            }
        }
    }

    #[test]
    fn grows() {
        let mut table = HashTable::new();

        for i in 0..100 {
            table.insert(key(&i.to_string()), i, InsertPolicy::Reject).unwrap();
        }

        assert_eq!(table.len(), 100);
        assert!(table.capacity().is_power_of_two());
        assert!(table.capacity() > 100);

        for i in 0..100 {
            assert_eq!(table.search(&i.to_string()), Some(&i));
        }
    }

    #[test]
    fn rehash_reclaims_tombstones() {
        let mut table = HashTable::new();

        for round in 0..50 {
            let k = format!("key{round}");
            table.insert(key(&k), round, InsertPolicy::Reject).unwrap();
            table.delete(&k);
        }

        assert!(table.is_empty());
        assert!(table.tombstones() < table.capacity());
        assert_eq!(table.capacity(), TableConfig::default().slot_count());
    }

    #[test]
    fn iteration_skips_empty_and_tombstones() {
        let mut table = HashTable::new();

        for k in ["a", "b", "c", "d"] {
            table.insert(key(k), (), InsertPolicy::Reject).unwrap();
        }

        table.delete("b");
        table.delete("d");

        let mut keys = table.keys().collect::<Vec<_>>();
        keys.sort_unstable();

        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(table.iter().len(), 2);
        assert_eq!(table.iter_mut().count(), 2);
    }

    #[test]
    fn take_at_ignores_dead_slots() {
        let mut table = HashTable::new();
        let inserted = table.insert(key("a"), 1, InsertPolicy::Reject).unwrap();

        assert_matches!(table.take_at(inserted.slot), Some((_, 1)));
        assert_eq!(table.take_at(inserted.slot), None);
        assert_eq!(table.take_at(table.capacity()), None);
    }
}
