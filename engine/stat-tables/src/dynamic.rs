//! Growable table for arbitrary string keys.
//!
//! Collisions are resolved by double hashing: the primary hash picks the first
//! slot, the step hash picks the stride. Capacities come from a prime
//! [`GrowthLadder`], so every stride in `[1, capacity - 1]` is coprime with the
//! capacity and a probe reaches every slot before returning to its start.
//!
//! Deletion is lazy. A removed entry leaves a tombstone that lookups walk past;
//! inserts may reuse it once the key is known to be absent. Tombstones are
//! dropped when the table rehashes onto the next rung of the ladder.

use core::fmt;

use tracing::{debug, trace, warn};

use crate::config::{GrowthLadder, TableConfig};
use crate::error::{ConfigError, TableError, TableResult};
use crate::slot::{empty_store, fmt_slots, Slot};
use crate::{KeyValueTable, LOAD_DENOMINATOR, LOAD_NUMERATOR};

const HASH_SEED: u64 = 31415;
const HASH_BASE: u64 = 31;

/// Polynomial rolling hash reduced modulo `capacity`.
///
/// The multiplier starts at a fixed seed and is multiplied by the base after
/// every character, reduced modulo `capacity - 1`. `capacity` must be at least 2.
pub(crate) fn primary_hash(key: &str, capacity: usize) -> usize {
    let cap = capacity as u64;
    let mut value = 0u64;
    let mut a = HASH_SEED;
    for ch in key.chars() {
        value = (ch as u64 + a * value) % cap;
        a = a * HASH_BASE % (cap - 1);
    }
    value as usize
}

/// Probe stride derived from the primary hash; always in `[1, capacity - 1]`.
pub(crate) fn step_hash(key: &str, capacity: usize) -> usize {
    let h = primary_hash(key, capacity) as u64;
    let len = key.chars().count() as u64;
    1 + ((h * 13 + len) % (capacity as u64 - 1)) as usize
}

pub struct DynamicHashTable<V> {
    ladder: GrowthLadder,
    size_index: usize,
    slots: Box<[Slot<V>]>,
    count: usize,
    tombstones: usize,
}

impl<V> DynamicHashTable<V> {
    /// Table on the default ladder, starting at its smallest capacity
    pub fn new() -> Self {
        Self::with_ladder(GrowthLadder::default())
    }

    pub fn with_ladder(ladder: GrowthLadder) -> Self {
        // a validated ladder always has a first rung
        let capacity = ladder.get(0).unwrap_or(2);
        Self { ladder, size_index: 0, slots: empty_store(capacity), count: 0, tombstones: 0 }
    }

    /// Table on a caller-supplied ladder. Fails unless `sizes` is a strictly increasing list of primes.
    pub fn with_sizes(sizes: Vec<usize>) -> Result<Self, ConfigError> {
        Ok(Self::with_ladder(GrowthLadder::new(sizes)?))
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_ladder(config.ladder()?))
    }

    #[inline]
    pub fn hash(&self, key: &str) -> usize {
        primary_hash(key, self.slots.len())
    }

    #[inline]
    pub fn step_hash(&self, key: &str) -> usize {
        step_hash(key, self.slots.len())
    }

    /// Position of the current capacity in the growth ladder
    #[inline]
    pub fn size_index(&self) -> usize {
        self.size_index
    }

    /// Slots holding a deleted entry
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn ladder(&self) -> &GrowthLadder {
        &self.ladder
    }

    /// Walk the probe sequence for `key`.
    ///
    /// Returns the slot holding `key` if present. Otherwise, when `for_insert`
    /// is set, returns the first tombstone passed or else the empty slot that
    /// ended the walk. A walk that wraps back to its start fails with
    /// `TableFull` for inserts and `KeyNotFound` for lookups.
    fn probe(&self, key: &str, for_insert: bool) -> TableResult<usize> {
        let capacity = self.slots.len();
        let start = self.hash(key);
        let step = self.step_hash(key);
        let mut first_tomb: Option<usize> = None;
        let mut pos = start;

        loop {
            match &self.slots[pos] {
                Slot::Empty => {
                    return if for_insert {
                        Ok(first_tomb.unwrap_or(pos))
                    } else {
                        Err(TableError::not_found(key))
                    };
                }
                Slot::Tombstone => {
                    if first_tomb.is_none() {
                        first_tomb = Some(pos);
                    }
                }
                Slot::Occupied(k, _) if k == key => return Ok(pos),
                Slot::Occupied(..) => {}
            }

            pos = (pos + step) % capacity;
            if pos == start {
                trace!(key, capacity, for_insert, "probe wrapped without a match");
                return match (for_insert, first_tomb) {
                    (true, Some(slot)) => Ok(slot),
                    (true, None) => Err(TableError::TableFull { capacity }),
                    (false, _) => Err(TableError::not_found(key)),
                };
            }
        }
    }

    /// Store at `pos`; true when this added a live entry.
    fn write(&mut self, pos: usize, key: String, value: V) -> bool {
        match &mut self.slots[pos] {
            Slot::Occupied(_, v) => {
                *v = value;
                return false;
            }
            Slot::Tombstone => self.tombstones -= 1,
            Slot::Empty => {}
        }
        self.count += 1;
        self.slots[pos] = Slot::Occupied(key, value);
        true
    }

    #[inline]
    fn over_threshold(count: usize, capacity: usize) -> bool {
        count * LOAD_DENOMINATOR > capacity * LOAD_NUMERATOR
    }

    #[inline]
    fn ladder_exhausted(&self) -> bool {
        self.size_index + 1 >= self.ladder.len()
    }

    /// First empty slot on the probe path of a key known to be absent from a
    /// store with no tombstones and at least one empty slot.
    fn vacant_slot(&self, key: &str) -> usize {
        let capacity = self.slots.len();
        let step = self.step_hash(key);
        let mut pos = self.hash(key);
        while self.slots[pos].is_occupied() {
            pos = (pos + step) % capacity;
        }
        pos
    }

    /// Move to the next capacity on the ladder and re-insert every live entry.
    ///
    /// Tombstones are not carried over. Fails with `TableFull`, leaving the
    /// table untouched, when the ladder has no larger capacity.
    pub fn rehash(&mut self) -> TableResult<()> {
        let old_capacity = self.slots.len();
        let Some(new_capacity) = self.ladder.get(self.size_index + 1) else {
            return Err(TableError::TableFull { capacity: old_capacity });
        };

        let live = self.count;
        let dropped = self.tombstones;
        debug_assert!(live < new_capacity, "next rung must hold every live entry");
        let old = std::mem::replace(&mut self.slots, empty_store(new_capacity));
        self.size_index += 1;
        self.count = 0;
        self.tombstones = 0;

        for slot in old.into_vec() {
            if let Slot::Occupied(key, value) = slot {
                let pos = self.vacant_slot(&key);
                self.write(pos, key, value);
            }
        }

        debug!(old_capacity, new_capacity, live, dropped, "rehashed table");
        Ok(())
    }

    /// Occupied entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots.iter().filter_map(Slot::entry)
    }
}

impl<V> Default for DynamicHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KeyValueTable<V> for DynamicHashTable<V> {
    fn get(&self, key: &str) -> TableResult<&V> {
        let pos = self.probe(key, false)?;
        self.slots[pos].entry().map(|(_, v)| v).ok_or_else(|| TableError::not_found(key))
    }

    fn get_mut(&mut self, key: &str) -> TableResult<&mut V> {
        let pos = self.probe(key, false)?;
        self.slots[pos].value_mut().ok_or_else(|| TableError::not_found(key))
    }

    /// Insert or overwrite. A new key that pushes the load above two thirds
    /// moves the table up the ladder. When no larger capacity is left the
    /// insert fails with `TableFull` and the table is not modified.
    fn set(&mut self, key: &str, value: V) -> TableResult<()> {
        let pos = self.probe(key, true)?;
        let capacity = self.slots.len();
        let is_new = !self.slots[pos].is_occupied();

        if is_new && Self::over_threshold(self.count + 1, capacity) && self.ladder_exhausted() {
            warn!(count = self.count, capacity, key, "growth ladder exhausted; rejecting insert");
            return Err(TableError::TableFull { capacity });
        }

        self.write(pos, key.to_string(), value);
        if is_new && Self::over_threshold(self.count, capacity) {
            self.rehash()?;
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> TableResult<V> {
        let pos = self.probe(key, false)?;
        match std::mem::replace(&mut self.slots[pos], Slot::Tombstone) {
            Slot::Occupied(_, v) => {
                self.count -= 1;
                self.tombstones += 1;
                Ok(v)
            }
            other => {
                self.slots[pos] = other;
                Err(TableError::not_found(key))
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.count
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn keys(&self) -> Vec<&str> {
        self.iter().map(|(k, _)| k).collect()
    }

    fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }
}

impl<V: fmt::Display> fmt::Display for DynamicHashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_slots(&self.slots, f)
    }
}

impl<V: fmt::Debug> fmt::Debug for DynamicHashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicHashTable")
            .field("capacity", &self.slots.len())
            .field("size_index", &self.size_index)
            .field("count", &self.count)
            .field("tombstones", &self.tombstones)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
