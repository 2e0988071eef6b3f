//! # Stat Tables
//!
//! Associative arrays backing every stateful lookup around a season: player
//! statistics, team statistics and position rosters.
//!
//! Two independent engines share one contract ([`KeyValueTable`]):
//! - [`FixedKeyTable`]: constant-time slots for a small, closed key set
//!   ([`KeySet`]), addressed through a perfect hash verified at construction.
//! - [`DynamicHashTable`]: arbitrary string keys, double-hash probing, lazy
//!   (tombstone) deletion and growth along a prime [`GrowthLadder`].
//!
//! Neither table is thread-safe; callers sharing one across threads must
//! serialize access themselves.

pub mod config;
pub mod dynamic;
pub mod error;
pub mod fixed;
pub mod keys;
mod slot;

#[cfg(test)]
mod tests;

pub use config::{GrowthLadder, TableConfig};
pub use dynamic::DynamicHashTable;
pub use error::{ConfigError, TableError, TableResult};
pub use fixed::FixedKeyTable;
pub use keys::{KeySet, PlayerStat};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capacity of a fixed-key table when none is configured
pub const DEFAULT_FIXED_CAPACITY: usize = 13;

/// Dynamic tables grow once `count / capacity` exceeds `LOAD_NUMERATOR / LOAD_DENOMINATOR`
pub const LOAD_NUMERATOR: usize = 2;
pub const LOAD_DENOMINATOR: usize = 3;

/// Largest capacity a growth ladder may hold. Keeps the rolling hash inside u64.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// Uniform get/set/delete contract shared by both tables.
///
/// Entries are addressed by string keys. `keys()` and `values()` are snapshots
/// in physical slot order, not insertion order.
pub trait KeyValueTable<V> {
    fn get(&self, key: &str) -> TableResult<&V>;

    fn get_mut(&mut self, key: &str) -> TableResult<&mut V>;

    fn set(&mut self, key: &str, value: V) -> TableResult<()>;

    /// Remove `key`, handing back the value it held.
    fn delete(&mut self, key: &str) -> TableResult<V>;

    /// Number of live entries
    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn keys(&self) -> Vec<&str>;

    fn values(&self) -> Vec<&V>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}
