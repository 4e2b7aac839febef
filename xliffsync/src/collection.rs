//! An insertion-ordered list whose items are addressable by a unique key.
//!
//! The key of every item is derived by a key function supplied at construction,
//! so the list never stores keys separately from the items they belong to.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{self, Debug, Display},
    hash::Hash,
};

use crate::error::Error;

/// Ordered collection with unique, item-derived keys.
///
/// Iteration yields items in insertion order; removal keeps the relative order
/// of the remaining items. Not meant for concurrent mutation.
///
/// # Example
///
/// ```rust
/// use xliffsync::collection::IndexedList;
///
/// let mut list: IndexedList<String, (String, u32)> = IndexedList::new(|item| item.0.clone());
/// list.add(("b".to_string(), 2))?;
/// list.add(("a".to_string(), 1))?;
/// assert!(list.add(("a".to_string(), 3)).is_err());
/// assert_eq!(list.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// # Ok::<(), xliffsync::Error>(())
/// ```
#[derive(Clone)]
pub struct IndexedList<K, V> {
    items: Vec<V>,
    positions: HashMap<K, usize>,
    key_of: fn(&V) -> K,
}

impl<K, V> IndexedList<K, V>
where
    K: Eq + Hash + Display,
{
    /// Creates an empty list using `key_of` to derive each item's key.
    pub fn new(key_of: fn(&V) -> K) -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
            key_of,
        }
    }

    /// Appends `item` at the end.
    ///
    /// Fails with [`Error::DuplicateKey`] if an item with the same key exists;
    /// the list is left unchanged in that case.
    pub fn add(&mut self, item: V) -> Result<(), Error> {
        let key = (self.key_of)(&item);
        if self.positions.contains_key(&key) {
            return Err(Error::DuplicateKey(key.to_string()));
        }
        self.positions.insert(key, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the item stored under `key`, if any.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.positions.remove(key)?;
        let removed = self.items.remove(position);
        for index in self.positions.values_mut() {
            if *index > position {
                *index -= 1;
            }
        }
        Some(removed)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Returns the item stored under `key`, or [`Error::NotFound`].
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        match self.positions.get(key) {
            Some(&position) => Ok(&self.items[position]),
            None => Err(Error::NotFound(key.to_string())),
        }
    }

    /// Returns the item stored under `key` for in-place mutation, or [`Error::NotFound`].
    ///
    /// Callers must not change the part of the item its key is derived from.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        match self.positions.get(key) {
            Some(&position) => Ok(&mut self.items[position]),
            None => Err(Error::NotFound(key.to_string())),
        }
    }

    /// Keys in current order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.items.iter().map(self.key_of)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items matching `predicate`.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&V) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).count()
    }

    /// Items as an ordered slice.
    pub fn as_slice(&self) -> &[V] {
        &self.items
    }
}

impl<'a, K, V> IntoIterator for &'a IndexedList<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K, V: PartialEq> PartialEq for IndexedList<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<K, V: Debug> Debug for IndexedList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
