use std::hash::Hash;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;


pub trait DashMapExtension<K: Eq + Hash, V: Clone> {
  /// Inserts `value` only if `key` is vacant, under the shard lock.
  ///
  /// Returns the value now stored and whether it was already there, so a registry can reject a
  /// taken key without ever replacing the current owner.
  fn load_or_store(&self, key: K, value: V) -> (V, bool);
}

impl<K: Eq + Hash, V: Clone> DashMapExtension<K, V> for DashMap<K, V> {
  fn load_or_store(&self, key: K, value: V) -> (V, bool) {
    match self.entry(key) {
      Entry::Occupied(occupied) => (occupied.get().clone(), true),
      Entry::Vacant(vacant) => (vacant.insert(value).value().clone(), false),
    }
  }
}
