//! Immutable, structurally shared containers used by the settings model.
//!
//! Both containers wrap their storage in an [`Arc`], so cloning is O(1) and
//! every clone shares the same buffer.  "Mutating" operations never touch the
//! receiver: they return a new container, copying the shared buffer only if
//! another clone still refers to it (copy-on-write via [`Arc::make_mut`]).
//!
//! ```rust
//! use settings_core::PersistentList;
//!
//! let a: PersistentList<u32> = vec![1, 2].into();
//! let b = a.push(3);
//! assert_eq!(a.as_slice(), &[1, 2]);
//! assert_eq!(b.as_slice(), &[1, 2, 3]);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

// ── PersistentList ────────────────────────────────────────────────────────────

/// An immutable ordered sequence.  Insertion order is preserved and
/// duplicates are permitted.
pub struct PersistentList<T> {
    items: Arc<Vec<T>>,
}

impl<T> PersistentList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> PersistentList<T> {
    /// Returns a new list with `item` appended.
    pub fn push(&self, item: T) -> Self {
        self.mutate(|items| items.push(item))
    }

    /// Applies `f` to a private copy of the elements and returns the result
    /// as a new list.  `self` is left untouched.
    pub fn mutate<F>(&self, f: F) -> Self
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut items = Arc::clone(&self.items);
        f(Arc::make_mut(&mut items));
        Self { items }
    }
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for PersistentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for PersistentList<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items) || self.items == other.items
    }
}

impl<T> From<Vec<T>> for PersistentList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl<T> FromIterator<T> for PersistentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a PersistentList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── PersistentMap ─────────────────────────────────────────────────────────────

/// An immutable hash map.  Iteration order is unspecified; equality compares
/// entries regardless of order.
pub struct PersistentMap<K, V> {
    entries: Arc<HashMap<K, V>>,
}

impl<K, V> PersistentMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> std::collections::hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }
}

impl<K: Eq + Hash, V> PersistentMap<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }
}

impl<K: Eq + Hash + Clone, V: Clone> PersistentMap<K, V> {
    /// Returns a new map with `key` bound to `value`, replacing any previous
    /// binding.
    pub fn insert(&self, key: K, value: V) -> Self {
        self.mutate(|entries| {
            entries.insert(key, value);
        })
    }

    /// Returns a new map without `key`.  Returns a cheap clone when the key
    /// is absent.
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    /// Applies `f` to a private copy of the entries and returns the result
    /// as a new map.  `self` is left untouched.
    pub fn mutate<F>(&self, f: F) -> Self
    where
        F: FnOnce(&mut HashMap<K, V>),
    {
        let mut entries = Arc::clone(&self.entries);
        f(Arc::make_mut(&mut entries));
        Self { entries }
    }
}

impl<K, V> Clone for PersistentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for PersistentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for PersistentMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.entries == other.entries
    }
}

impl<K, V> From<HashMap<K, V>> for PersistentMap<K, V> {
    fn from(entries: HashMap<K, V>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for PersistentMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashMap<_, _>>())
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::collections::hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── PersistentList ────────────────────────────────────────────────────────

    #[test]
    fn test_list_push_leaves_original_untouched() {
        // Arrange
        let original: PersistentList<i32> = vec![1, 2].into();

        // Act
        let extended = original.push(3);

        // Assert
        assert_eq!(original.as_slice(), &[1, 2]);
        assert_eq!(extended.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_list_clone_shares_buffer() {
        let a: PersistentList<i32> = vec![1, 2, 3].into();
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.items, &b.items));
    }

    #[test]
    fn test_list_mutate_on_shared_list_copies() {
        // Arrange
        let a: PersistentList<i32> = vec![1, 2, 3].into();
        let b = a.clone();

        // Act
        let c = b.mutate(|items| {
            items.clear();
            items.push(9);
        });

        // Assert
        assert_eq!(a.as_slice(), &[1, 2, 3]);
        assert_eq!(b.as_slice(), &[1, 2, 3]);
        assert_eq!(c.as_slice(), &[9]);
    }

    #[test]
    fn test_list_allows_duplicates_and_keeps_order() {
        let list: PersistentList<&str> = ["b", "a", "b"].into_iter().collect();
        let collected: Vec<_> = list.iter().copied().collect();
        assert_eq!(collected, vec!["b", "a", "b"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_list_equality_is_by_value() {
        let a: PersistentList<i32> = vec![1, 2].into();
        let b: PersistentList<i32> = vec![1, 2].into();
        let c: PersistentList<i32> = vec![2, 1].into();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_list_default_is_empty() {
        let list: PersistentList<u8> = PersistentList::default();
        assert!(list.is_empty());
        assert_eq!(list.get(0), None);
    }

    // ── PersistentMap ─────────────────────────────────────────────────────────

    #[test]
    fn test_map_insert_leaves_original_untouched() {
        // Arrange
        let original: PersistentMap<String, u32> = PersistentMap::new();

        // Act
        let updated = original.insert("a".to_string(), 1);

        // Assert
        assert!(original.is_empty());
        assert_eq!(updated.get("a"), Some(&1));
    }

    #[test]
    fn test_map_insert_replaces_existing_binding() {
        let map: PersistentMap<String, u32> = [("a".to_string(), 1)].into_iter().collect();
        let updated = map.insert("a".to_string(), 2);
        assert_eq!(updated.len(), 1);
        assert_eq!(updated.get("a"), Some(&2));
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test]
    fn test_map_remove_absent_key_shares_buffer() {
        let map: PersistentMap<String, u32> = [("a".to_string(), 1)].into_iter().collect();
        let same = map.remove("missing");
        assert!(Arc::ptr_eq(&map.entries, &same.entries));
    }

    #[test]
    fn test_map_remove_returns_new_map() {
        let map: PersistentMap<String, u32> =
            [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        let smaller = map.remove("a");
        assert!(!smaller.contains_key("a"));
        assert!(map.contains_key("a"));
        assert_eq!(smaller.len(), 1);
    }

    #[test]
    fn test_map_equality_ignores_insertion_order() {
        let ab = PersistentMap::new()
            .insert("a".to_string(), 1)
            .insert("b".to_string(), 2);
        let ba = PersistentMap::new()
            .insert("b".to_string(), 2)
            .insert("a".to_string(), 1);
        assert_eq!(ab, ba);
    }
}
