//! Environment for symbol bindings
//!
//! The Dict is an open hash table used both as an evaluation scope and as
//! small internal lookup tables. It stores only the hash of a key, never the
//! key itself: two keys with the same hash are the same binding.
//!
//! Buckets are plain vectors of pairs. Capacity is always a power of two
//! and doubles once cardinality reaches three quarters of it.

use std::fmt;

use tracing::debug;

use crate::error::ErrorValue;
use crate::text::{Text, djb2};
use crate::value::{Callable, Int, Value};

const PREALLOC: usize = 4;
const GROW_FACTOR: usize = 4;

const _: () = assert!(PREALLOC > 0 && PREALLOC.is_power_of_two());
const _: () = assert!(GROW_FACTOR > 1);

// ============================================================================
// Keys
// ============================================================================

/// Hash of a hashable Value. Only Text and Int values are hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(u64);

impl Key {
    pub fn hash(self) -> u64 {
        self.0
    }
}

impl From<&Text> for Key {
    fn from(text: &Text) -> Self {
        Key(text.hash_key())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key(djb2(name.as_bytes()))
    }
}

impl From<Int> for Key {
    fn from(n: Int) -> Self {
        Key(n as u64)
    }
}

impl TryFrom<&Value> for Key {
    type Error = ErrorValue;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value.resolved() {
            Value::Text(text) => Ok(Key::from(text)),
            Value::Int(n) => Ok(Key::from(*n)),
            other => Err(ErrorValue::type_error(format!(
                "{} can't be used as a dict key",
                other.kind()
            ))),
        }
    }
}

// ============================================================================
// Dict
// ============================================================================

#[derive(Clone, Debug)]
struct Pair {
    key: Key,
    item: Value,
}

#[derive(Clone, Debug)]
pub struct Dict {
    buckets: Vec<Vec<Pair>>,
    card: usize,
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

impl Dict {
    /// Create an empty table with the default bucket preallocation
    pub fn new() -> Self {
        Dict {
            buckets: empty_buckets(PREALLOC),
            card: 0,
        }
    }

    /// Number of key/item pairs
    pub fn len(&self) -> usize {
        self.card
    }

    pub fn is_empty(&self) -> bool {
        self.card == 0
    }

    /// Number of allocated buckets
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, key: Key) -> usize {
        (key.0 % self.buckets.len() as u64) as usize
    }

    fn grow(&mut self) {
        let cap = self.buckets.len();
        if self.card < cap - cap / GROW_FACTOR {
            return;
        }
        let new_cap = cap << 1;
        let mut buckets = empty_buckets(new_cap);
        for pair in std::mem::take(&mut self.buckets).into_iter().flatten() {
            let idx = (pair.key.0 % new_cap as u64) as usize;
            buckets[idx].push(pair);
        }
        debug!(card = self.card, from = cap, to = new_cap, "dict grown");
        self.buckets = buckets;
    }

    /// Move `item` into the table under `key`.
    ///
    /// Returns the previous item when the key was already bound.
    pub fn insert(&mut self, key: impl Into<Key>, item: Value) -> Option<Value> {
        let key = key.into();
        self.grow();
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        if let Some(pair) = bucket.iter_mut().find(|pair| pair.key == key) {
            return Some(std::mem::replace(&mut pair.item, item));
        }
        bucket.push(Pair { key, item });
        self.card += 1;
        None
    }

    /// Register a native callable under a symbol name
    pub fn bind(&mut self, name: &str, callable: Callable) -> Option<Value> {
        self.insert(name, Value::Callable(callable))
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.get_view(key).is_some()
    }

    /// Borrow the item bound to `key`.
    ///
    /// The borrow lasts until the next mutation of the table.
    pub fn get_view(&self, key: impl Into<Key>) -> Option<&Value> {
        let key = key.into();
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| &pair.item)
    }

    /// Copy of the item bound to `key`, independent of the table's lifetime
    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        self.get_view(key).cloned()
    }

    /// Remove the binding for `key`, handing the item back to the caller.
    pub fn erase(&mut self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into();
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let pos = bucket.iter().position(|pair| pair.key == key)?;
        self.card -= 1;
        Some(bucket.swap_remove(pos).item)
    }

    /// Iterate over all pairs, in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (Key, &Value)> {
        self.buckets
            .iter()
            .flatten()
            .map(|pair| (pair.key, &pair.item))
    }

    /// Capacity is a power of two, every pair sits in its own bucket, the
    /// cardinality matches the stored pairs, and every item is valid.
    pub fn is_valid(&self) -> bool {
        let cap = self.buckets.len();
        if !cap.is_power_of_two() {
            return false;
        }
        let mut stored = 0;
        for (idx, bucket) in self.buckets.iter().enumerate() {
            for pair in bucket {
                if (pair.key.0 % cap as u64) as usize != idx || !pair.item.is_valid() {
                    return false;
                }
                stored += 1;
            }
        }
        stored == self.card
    }
}

fn empty_buckets(cap: usize) -> Vec<Vec<Pair>> {
    (0..cap).map(|_| Vec::new()).collect()
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.card == other.card
            && self
                .iter()
                .all(|(key, item)| other.get_view(key) == Some(item))
    }
}

impl fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, item)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key.0, item.repr())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut dict = Dict::new();
        assert!(dict.insert("x", Value::Int(1)).is_none());
        assert_eq!(dict.get("x"), Some(Value::Int(1)));
        assert_eq!(dict.get_view("x"), Some(&Value::Int(1)));
        assert!(dict.has("x"));
        assert!(!dict.has("y"));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_insert_overwrites_duplicate_key() {
        let mut dict = Dict::new();
        dict.insert("x", Value::Int(1));
        let previous = dict.insert("x", Value::Int(2));
        assert_eq!(previous, Some(Value::Int(1)));
        assert_eq!(dict.get("x"), Some(Value::Int(2)));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_text_and_str_keys_agree() {
        let mut dict = Dict::new();
        let name = Text::from("echo");
        dict.insert(&name, Value::Int(7));
        assert_eq!(dict.get("echo"), Some(Value::Int(7)));
        assert_eq!(Key::try_from(&Value::Text(name)).map(|k| dict.has(k)), Ok(true));
    }

    #[test]
    fn test_int_keys() {
        let mut dict = Dict::new();
        for n in -5..5 {
            dict.insert(n, Value::Int(n * 10));
        }
        assert_eq!(dict.get(-3i64), Some(Value::Int(-30)));
        assert_eq!(dict.len(), 10);
    }

    #[test]
    fn test_unhashable_key_is_type_error() {
        let err = Key::try_from(&Value::Float(1.5)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::TypeError);
    }

    #[test]
    fn test_grows_at_three_quarters_load() {
        let mut dict = Dict::new();
        assert_eq!(dict.capacity(), 4);
        for n in 0..3i64 {
            dict.insert(n, Value::None);
        }
        assert_eq!(dict.capacity(), 4);
        // cardinality 3 reaches 4 - 4/4 before the fourth insertion
        dict.insert(3i64, Value::None);
        assert_eq!(dict.capacity(), 8);
        for n in 4..6i64 {
            dict.insert(n, Value::None);
        }
        assert_eq!(dict.capacity(), 8);
        dict.insert(6i64, Value::None);
        assert_eq!(dict.capacity(), 16);
        assert!(dict.is_valid());
    }

    #[test]
    fn test_erase_compacts_bucket() {
        let mut dict = Dict::new();
        // 0, 4 and 8 share a bucket while the capacity is 4
        dict.insert(0i64, Value::Int(0));
        dict.insert(4i64, Value::Int(4));
        dict.insert(8i64, Value::Int(8));
        assert_eq!(dict.erase(0i64), Some(Value::Int(0)));
        assert_eq!(dict.erase(0i64), None);
        assert_eq!(dict.get(4i64), Some(Value::Int(4)));
        assert_eq!(dict.get(8i64), Some(Value::Int(8)));
        assert_eq!(dict.len(), 2);
        assert!(dict.is_valid());
    }

    #[test]
    fn test_copy_is_deep() {
        let mut dict = Dict::new();
        dict.insert("name", Value::from("iris"));
        let copy = dict.clone();
        dict.erase("name");
        assert_eq!(copy.get("name"), Some(Value::from("iris")));
        assert_ne!(dict, copy);
    }
}
