//! Fixed-capacity table for a closed key set.
//!
//! Every declared key owns exactly one slot, chosen by a cheap positional hash
//! (first, middle and last character). There is no probing and no growth; the
//! hash is checked to be collision-free over the whole [`KeySet`] when the
//! table is built, so a slot never needs to compare keys.

use core::fmt;
use core::marker::PhantomData;

use crate::error::{ConfigError, TableError, TableResult};
use crate::keys::{KeySet, PlayerStat};
use crate::slot::{empty_store, fmt_slots, Slot};
use crate::{KeyValueTable, DEFAULT_FIXED_CAPACITY, MAX_CAPACITY};

/// `(code(first) * 3 + code(last) * 5 + code(mid) * 7) mod capacity`, where
/// `mid` is the character at `len / 2`. An empty key maps to slot 0.
pub(crate) fn fixed_hash(key: &str, capacity: usize) -> usize {
    let len = key.chars().count();
    let (Some(first), Some(last), Some(mid)) =
        (key.chars().next(), key.chars().next_back(), key.chars().nth(len / 2))
    else {
        return 0;
    };
    let sum = first as u64 * 3 + last as u64 * 5 + mid as u64 * 7;
    (sum % capacity as u64) as usize
}

/// Confirms that no two members of `K` share a slot at `capacity`.
pub fn check_perfect<K: KeySet>(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(ConfigError::CapacityOutOfRange { capacity, min: 1, max: MAX_CAPACITY });
    }
    let mut placed: Vec<(usize, &'static str)> = Vec::with_capacity(K::ALL.len());
    for key in K::ALL {
        let name = key.as_str();
        let slot = fixed_hash(name, capacity);
        if let Some(&(_, first)) = placed.iter().find(|(s, _)| *s == slot) {
            return Err(ConfigError::PerfectHashCollision { first, second: name, slot, capacity });
        }
        placed.push((slot, name));
    }
    Ok(())
}

pub struct FixedKeyTable<V, K: KeySet = PlayerStat> {
    slots: Box<[Slot<V>]>,
    count: usize,
    _keys: PhantomData<fn() -> K>,
}

impl<V, K: KeySet> FixedKeyTable<V, K> {
    /// Table with the default 13 slots
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_capacity(DEFAULT_FIXED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        check_perfect::<K>(capacity)?;
        Ok(Self { slots: empty_store(capacity), count: 0, _keys: PhantomData })
    }

    #[inline]
    pub fn hash(&self, key: &str) -> usize {
        fixed_hash(key, self.slots.len())
    }

    /// Resolve `key` to a member of the declared key set.
    pub fn validate(&self, key: &str) -> TableResult<K> {
        K::parse(key).ok_or_else(|| TableError::invalid(key))
    }

    fn slot_of(&self, key: &str) -> TableResult<usize> {
        self.validate(key)?;
        Ok(self.hash(key))
    }

    /// Store `value` under every declared key.
    pub fn fill(&mut self, value: V)
    where
        V: Clone,
    {
        for key in K::ALL {
            let slot = self.hash(key.as_str());
            if !self.slots[slot].is_occupied() {
                self.count += 1;
            }
            self.slots[slot] = Slot::Occupied(key.as_str().to_string(), value.clone());
        }
    }

    /// Occupied entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots.iter().filter_map(Slot::entry)
    }
}

impl<V, K: KeySet> KeyValueTable<V> for FixedKeyTable<V, K> {
    fn get(&self, key: &str) -> TableResult<&V> {
        let slot = self.slot_of(key)?;
        self.slots[slot].entry().map(|(_, v)| v).ok_or_else(|| TableError::not_found(key))
    }

    fn get_mut(&mut self, key: &str) -> TableResult<&mut V> {
        let slot = self.slot_of(key)?;
        self.slots[slot].value_mut().ok_or_else(|| TableError::not_found(key))
    }

    /// Overwrites the slot without comparing keys; isolation rests on the
    /// collision check done at construction.
    fn set(&mut self, key: &str, value: V) -> TableResult<()> {
        let slot = self.slot_of(key)?;
        if !self.slots[slot].is_occupied() {
            self.count += 1;
        }
        self.slots[slot] = Slot::Occupied(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> TableResult<V> {
        let slot = self.slot_of(key)?;
        match std::mem::replace(&mut self.slots[slot], Slot::Empty) {
            Slot::Occupied(_, v) => {
                self.count -= 1;
                Ok(v)
            }
            _ => Err(TableError::not_found(key)),
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

impl<V: fmt::Display, K: KeySet> fmt::Display for FixedKeyTable<V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_slots(&self.slots, f)
    }
}

impl<V: fmt::Debug, K: KeySet> fmt::Debug for FixedKeyTable<V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedKeyTable")
            .field("capacity", &self.slots.len())
            .field("count", &self.count)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
