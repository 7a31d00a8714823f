//! Separate-chaining hashtable backing the graph's node index
//!
//! Each bucket holds a chain of key/value pairs. Before an insertion that would
//! push the load factor to the configured threshold, the table doubles and every
//! entry is rehashed into a freshly allocated bucket array.

use super::types::Key;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use thiserror::Error;
use tracing::debug;

/// Capacity used by `HashtableMap::new`
pub const DEFAULT_CAPACITY: usize = 64;

/// Load factor at which the table doubles
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.8;

/// Smallest load factor a configuration may ask for
pub const MIN_MAX_LOAD_FACTOR: f64 = 0.1;

/// Errors raised by the hashtable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key {0} already exists")]
    DuplicateKey(String),

    #[error("Key {0} not found")]
    KeyNotFound(String),

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Sizing parameters for a hashtable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of buckets allocated up front
    pub initial_capacity: usize,
    /// Ratio of entries to buckets that triggers a resize, in [0.1, 1]
    pub max_load_factor: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl StoreConfig {
    /// Check that the configuration describes a usable table
    pub fn validate(&self) -> StoreResult<()> {
        if self.initial_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "initial_capacity must be at least 1".to_string(),
            ));
        }
        let load = self.max_load_factor;
        if load.is_nan() || load < MIN_MAX_LOAD_FACTOR || load > 1.0 {
            return Err(StoreError::InvalidConfig(format!(
                "max_load_factor must be in [{}, 1], got {}",
                MIN_MAX_LOAD_FACTOR, load
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Pair<K, V> {
    key: K,
    value: V,
}

type Chain<K, V> = Vec<Pair<K, V>>;

/// Generic key/value map with separate chaining and full-rebuild resizing
#[derive(Debug, Clone)]
pub struct HashtableMap<K, V> {
    table: Vec<Chain<K, V>>,
    size: usize,
    max_load_factor: f64,
}

fn empty_table<K, V>(capacity: usize) -> Vec<Chain<K, V>> {
    (0..capacity).map(|_| Vec::new()).collect()
}

fn bucket_for<K: Hash>(key: &K, capacity: usize) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    (hasher.finish() % capacity as u64) as usize
}

impl<K: Key, V> HashtableMap<K, V> {
    /// Create an empty table with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty table with `capacity` buckets (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        HashtableMap {
            table: empty_table(capacity.max(1)),
            size: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Create an empty table from a validated configuration
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(HashtableMap {
            table: empty_table(config.initial_capacity),
            size: 0,
            max_load_factor: config.max_load_factor,
        })
    }

    fn bucket_index(&self, key: &K) -> usize {
        bucket_for(key, self.table.len())
    }

    fn find(&self, key: &K) -> Option<&Pair<K, V>> {
        self.table[self.bucket_index(key)]
            .iter()
            .find(|pair| pair.key == *key)
    }

    /// Insert a new binding.
    ///
    /// Fails with `InvalidKey` for a null key and `DuplicateKey` if the key is
    /// already bound; the existing value is left untouched in both cases.
    pub fn put(&mut self, key: K, value: V) -> StoreResult<()> {
        if key.is_null() {
            return Err(StoreError::InvalidKey(format!("{:?}", key)));
        }
        if self.contains_key(&key) {
            return Err(StoreError::DuplicateKey(format!("{:?}", key)));
        }

        let mut capacity = self.capacity();
        while (self.size + 1) as f64 / capacity as f64 >= self.max_load_factor {
            capacity = capacity.checked_mul(2).ok_or_else(|| {
                StoreError::InvalidConfig(format!("capacity overflow past {} buckets", capacity))
            })?;
        }
        if capacity != self.capacity() {
            self.resize(capacity);
        }

        let idx = self.bucket_index(&key);
        self.table[idx].push(Pair { key, value });
        self.size += 1;
        Ok(())
    }

    /// Rebuild the table with `new_capacity` buckets.
    ///
    /// The new bucket array is filled completely before it replaces the old one.
    fn resize(&mut self, new_capacity: usize) {
        let old_capacity = self.capacity();
        let mut resized = empty_table(new_capacity);
        for pair in std::mem::take(&mut self.table).into_iter().flatten() {
            let idx = bucket_for(&pair.key, new_capacity);
            resized[idx].push(pair);
        }
        self.table = resized;
        debug!(
            "Resized hashtable from {} to {} buckets ({} entries)",
            old_capacity, new_capacity, self.size
        );
    }

    /// Check whether a binding exists for `key`
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Get the value bound to `key`
    pub fn get(&self, key: &K) -> StoreResult<&V> {
        self.find(key)
            .map(|pair| &pair.value)
            .ok_or_else(|| StoreError::KeyNotFound(format!("{:?}", key)))
    }

    /// Get a mutable reference to the value bound to `key`
    pub fn get_mut(&mut self, key: &K) -> StoreResult<&mut V> {
        let idx = self.bucket_index(key);
        self.table[idx]
            .iter_mut()
            .find(|pair| pair.key == *key)
            .map(|pair| &mut pair.value)
            .ok_or_else(|| StoreError::KeyNotFound(format!("{:?}", key)))
    }

    /// Get the stored copy of `key`, borrowed from the table
    pub fn get_key_value(&self, key: &K) -> StoreResult<(&K, &V)> {
        self.find(key)
            .map(|pair| (&pair.key, &pair.value))
            .ok_or_else(|| StoreError::KeyNotFound(format!("{:?}", key)))
    }

    /// Remove the binding for `key` and return its value
    pub fn remove(&mut self, key: &K) -> StoreResult<V> {
        let idx = self.bucket_index(key);
        let chain = &mut self.table[idx];
        let pos = chain
            .iter()
            .position(|pair| pair.key == *key)
            .ok_or_else(|| StoreError::KeyNotFound(format!("{:?}", key)))?;
        self.size -= 1;
        Ok(chain.remove(pos).value)
    }

    /// Drop every binding, keeping the current capacity
    pub fn clear(&mut self) {
        self.table = empty_table(self.capacity());
        self.size = 0;
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Iterate over all bindings in bucket/chain order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.table
            .iter()
            .flatten()
            .map(|pair| (&pair.key, &pair.value))
    }

    /// All stored keys. Order follows the buckets and may change after a resize.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Length of the longest collision chain
    pub fn longest_chain(&self) -> usize {
        self.table.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl<K: Key, V> Default for HashtableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_with_resize() {
        // Three entries in three buckets crosses the 0.8 threshold
        let mut map = HashtableMap::with_capacity(3);
        map.put("test1".to_string(), "test1").unwrap();
        map.put("test2".to_string(), "test2").unwrap();
        map.put("test3".to_string(), "test3").unwrap();

        assert!(map.contains_key(&"test1".to_string()));
        assert!(map.contains_key(&"test2".to_string()));
        assert!(map.contains_key(&"test3".to_string()));
        assert_eq!(map.len(), 3);
        assert!(map.capacity() > 3);
    }

    #[test]
    fn test_put_duplicate_keeps_first_value() {
        let mut map = HashtableMap::new();
        map.put("test1", 1).unwrap();

        let result = map.put("test1", 2);
        assert_eq!(result, Err(StoreError::DuplicateKey("\"test1\"".to_string())));
        assert_eq!(map.get(&"test1"), Ok(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_put_null_key() {
        let mut map: HashtableMap<Option<String>, i32> = HashtableMap::new();
        let result = map.put(None, 0);
        assert_eq!(result, Err(StoreError::InvalidKey("None".to_string())));
        assert!(map.is_empty());
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashtableMap::with_capacity(5);
        map.put("test1", "test1").unwrap();
        map.put("test2", "test2").unwrap();

        assert!(map.contains_key(&"test1"));
        assert!(map.contains_key(&"test2"));
        assert!(!map.contains_key(&"FAIL"));
    }

    #[test]
    fn test_remove() {
        let mut map = HashtableMap::with_capacity(5);
        map.put("test1", "value1").unwrap();
        map.put("test2", "value2").unwrap();
        map.put("test3", "value3").unwrap();

        let removed = map.remove(&"test2").unwrap();
        assert_eq!(removed, "value2");
        assert!(!map.contains_key(&"test2"));
        assert_eq!(map.len(), 2);

        assert_eq!(
            map.remove(&"FAIL"),
            Err(StoreError::KeyNotFound("\"FAIL\"".to_string()))
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut map = HashtableMap::with_capacity(5);
        map.put(7u32, vec![1]).unwrap();

        map.get_mut(&7).unwrap().push(2);
        assert_eq!(map.get(&7).unwrap(), &vec![1, 2]);
        assert!(matches!(map.get(&8), Err(StoreError::KeyNotFound(_))));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut map = HashtableMap::with_capacity(5);
        map.put(1u32, ()).unwrap();
        map.put(2u32, ()).unwrap();
        map.put(3u32, ()).unwrap();
        assert_eq!(map.len(), 3);

        let capacity = map.capacity();
        map.clear();
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), capacity);
        assert!(!map.contains_key(&1));
    }

    #[test]
    fn test_resize_preserves_bindings() {
        let mut map = HashtableMap::with_capacity(2);
        for i in 0..500u32 {
            map.put(i, i * 10).unwrap();
        }

        assert_eq!(map.len(), 500);
        assert!(500.0 / (map.capacity() as f64) < DEFAULT_MAX_LOAD_FACTOR);
        for i in 0..500u32 {
            assert_eq!(map.get(&i), Ok(&(i * 10)));
        }

        assert!(map.longest_chain() < 500);

        let mut keys: Vec<u32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_capacity_doubles() {
        let mut map = HashtableMap::with_capacity(10);
        for i in 0..7u32 {
            map.put(i, ()).unwrap();
        }
        assert_eq!(map.capacity(), 10);

        // (7 + 1) / 10 reaches the threshold
        map.put(7, ()).unwrap();
        assert_eq!(map.capacity(), 20);
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        let mut map = HashtableMap::with_capacity(0);
        assert_eq!(map.capacity(), 1);
        map.put('a', 1).unwrap();
        assert_eq!(map.get(&'a'), Ok(&1));
    }

    #[test]
    fn test_config_validation() {
        assert!(StoreConfig::default().validate().is_ok());

        let zero = StoreConfig { initial_capacity: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(StoreError::InvalidConfig(_))));

        let too_high = StoreConfig { max_load_factor: 1.5, ..Default::default() };
        assert!(HashtableMap::<u32, ()>::with_config(too_high).is_err());

        let nan = StoreConfig { max_load_factor: f64::NAN, ..Default::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_tiny_load_factor_rejected() {
        for load in [1e-20, 1e-9, 0.05] {
            let config = StoreConfig { initial_capacity: 64, max_load_factor: load };
            assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));
            assert!(HashtableMap::<u32, ()>::with_config(config).is_err());
        }

        let floor = StoreConfig { initial_capacity: 1, max_load_factor: MIN_MAX_LOAD_FACTOR };
        let mut map = HashtableMap::with_config(floor).unwrap();
        map.put(1u32, ()).unwrap();
        map.put(2u32, ()).unwrap();
        assert!(2.0 / (map.capacity() as f64) < MIN_MAX_LOAD_FACTOR);
    }

    #[test]
    fn test_config_from_json() {
        let config: StoreConfig = serde_json::from_str(r#"{"initial_capacity": 16}"#).unwrap();
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.max_load_factor, DEFAULT_MAX_LOAD_FACTOR);

        let round_trip: StoreConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }

    #[test]
    fn test_custom_load_factor() {
        let config = StoreConfig { initial_capacity: 4, max_load_factor: 0.5 };
        let mut map = HashtableMap::with_config(config).unwrap();
        map.put(1u8, ()).unwrap();
        assert_eq!(map.capacity(), 4);
        // (1 + 1) / 4 reaches 0.5
        map.put(2u8, ()).unwrap();
        assert_eq!(map.capacity(), 8);
    }
}
