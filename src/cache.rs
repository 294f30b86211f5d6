//! Fixed-capacity memoization cache with least-recently-used eviction.
//!
//! Used for the pure, text-keyed heuristics (greeting detection, question
//! extraction). A plain `Mutex` is enough: critical sections are a map lookup
//! plus, on a full insert, a linear scan over at most `capacity` entries.

use std::{
  collections::HashMap,
  hash::Hash,
  sync::{Mutex, MutexGuard},
};

pub struct BoundedCache<K, V> {
  capacity: usize,
  inner: Mutex<Inner<K, V>>,
}

struct Inner<K, V> {
  entries: HashMap<K, Slot<V>>,
  clock: u64,
}

struct Slot<V> {
  value: V,
  last_used: u64,
}

impl<K, V> BoundedCache<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  /// `capacity` is clamped to at least one entry.
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      inner: Mutex::new(Inner { entries: HashMap::new(), clock: 0 }),
    }
  }

  pub fn capacity(&self) -> usize { self.capacity }

  pub fn len(&self) -> usize { self.lock().entries.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn get(&self, key: &K) -> Option<V> {
    let mut inner = self.lock();
    inner.clock += 1;
    let now = inner.clock;
    inner.entries.get_mut(key).map(|slot| {
      slot.last_used = now;
      slot.value.clone()
    })
  }

  pub fn insert(&self, key: K, value: V) {
    let mut inner = self.lock();
    inner.clock += 1;
    let now = inner.clock;
    if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
      let oldest = inner
        .entries
        .iter()
        .min_by_key(|(_, slot)| slot.last_used)
        .map(|(k, _)| k.clone());
      if let Some(k) = oldest {
        inner.entries.remove(&k);
      }
    }
    inner.entries.insert(key, Slot { value, last_used: now });
  }

  /// Return the cached value or compute, store and return it.
  /// `f` runs outside the lock; two racing callers may both compute, last write wins.
  pub fn get_or_insert_with(&self, key: &K, f: impl FnOnce() -> V) -> V {
    if let Some(v) = self.get(key) {
      return v;
    }
    let value = f();
    self.insert(key.clone(), value.clone());
    value
  }

  fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
    // Values are plain data; a panic mid-insert cannot leave them inconsistent.
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  #[test]
  fn evicts_least_recently_used_entry() {
    let cache = BoundedCache::new(2);
    cache.insert("a", 1);
    cache.insert("b", 2);
    assert_eq!(cache.get(&"a"), Some(1));
    cache.insert("c", 3);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.get(&"a"), Some(1));
    assert_eq!(cache.get(&"c"), Some(3));
  }

  #[test]
  fn get_or_insert_with_computes_once() {
    let cache = BoundedCache::new(4);
    let calls = Cell::new(0);
    for _ in 0..3 {
      let v = cache.get_or_insert_with(&"k".to_string(), || {
        calls.set(calls.get() + 1);
        42
      });
      assert_eq!(v, 42);
    }
    assert_eq!(calls.get(), 1);
  }

  #[test]
  fn reinserting_existing_key_does_not_evict() {
    let cache = BoundedCache::new(2);
    cache.insert(1, "one");
    cache.insert(2, "two");
    cache.insert(2, "deux");
    assert_eq!(cache.get(&1), Some("one"));
    assert_eq!(cache.get(&2), Some("deux"));
  }

  #[test]
  fn zero_capacity_is_clamped() {
    let cache: BoundedCache<u8, u8> = BoundedCache::new(0);
    assert_eq!(cache.capacity(), 1);
    cache.insert(1, 1);
    assert_eq!(cache.get(&1), Some(1));
  }
}
