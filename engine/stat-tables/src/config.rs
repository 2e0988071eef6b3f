//! Configuration for table capacities

use crate::error::ConfigError;
use crate::{DEFAULT_FIXED_CAPACITY, MAX_CAPACITY};
use serde::{Deserialize, Serialize};

/// Capacities a dynamic table climbs through. No test workload exceeds a million entries.
pub const DEFAULT_LADDER: [usize; 19] = [
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

/// Validated growth ladder: non-empty, strictly increasing, every rung prime.
///
/// Primality keeps every step size coprime with the capacity, so a double-hash
/// probe visits every slot before it returns to its start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowthLadder {
    sizes: Vec<usize>,
}

impl GrowthLadder {
    pub fn new(sizes: Vec<usize>) -> Result<Self, ConfigError> {
        if sizes.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }
        for &capacity in &sizes {
            if !(2..=MAX_CAPACITY).contains(&capacity) {
                return Err(ConfigError::CapacityOutOfRange { capacity, min: 2, max: MAX_CAPACITY });
            }
            if !is_prime(capacity) {
                return Err(ConfigError::NotPrime { capacity });
            }
        }
        if let Some(w) = sizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ConfigError::LadderNotIncreasing { previous: w[0], next: w[1] });
        }
        Ok(Self { sizes })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}

impl Default for GrowthLadder {
    fn default() -> Self {
        Self { sizes: DEFAULT_LADDER.to_vec() }
    }
}

/// Trial division; capacities are small enough that this stays cheap.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Capacities used when building tables from a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Capacities a dynamic table grows through, smallest first
    pub growth_ladder: Vec<usize>,

    /// Slot count of fixed-key tables (default: 13)
    pub fixed_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { growth_ladder: DEFAULT_LADDER.to_vec(), fixed_capacity: DEFAULT_FIXED_CAPACITY }
    }
}

impl TableConfig {
    /// Check the ladder and fixed capacity without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ladder()?;
        if self.fixed_capacity == 0 || self.fixed_capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityOutOfRange {
                capacity: self.fixed_capacity,
                min: 1,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }

    pub fn ladder(&self) -> Result<GrowthLadder, ConfigError> {
        GrowthLadder::new(self.growth_ladder.clone())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &str) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
