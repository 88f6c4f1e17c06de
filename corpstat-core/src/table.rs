//! Sparse count tables
//!
//! A [`CountTable`] maps keys to occurrence counts. Absent keys count as
//! zero, so a table never stores a zero entry. Merging two tables sums the
//! counts of shared keys, which makes tables a commutative monoid.

use crate::monoid::Monoid;
use std::borrow::Borrow;
use std::collections::hash_map::{self, HashMap};
use std::hash::Hash;

/// Mapping from key to non-negative occurrence count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable<K: Eq + Hash> {
    counts: HashMap<K, u64>,
}

/// Word form to corpus-wide occurrence count
pub type WordFrequencies = CountTable<String>;

impl<K: Eq + Hash> CountTable<K> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Record one occurrence of `key`
    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Record `count` occurrences of `key`
    pub fn add(&mut self, key: K, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(key).or_insert(0) += count;
    }

    /// Occurrences of `key` (zero when absent)
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` has been observed
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no key has been observed
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate over `(key, count)` in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, K, u64> {
        self.counts.iter()
    }

    /// Fold another table into this one
    pub fn merge(&mut self, other: CountTable<K>) {
        for (key, count) in other.counts {
            self.add(key, count);
        }
    }

    /// Keep only keys whose count is strictly above `threshold`
    pub fn discard_at_or_below(&mut self, threshold: u64) {
        if threshold > 0 {
            self.counts.retain(|_, count| *count > threshold);
        }
    }
}

impl<K: Eq + Hash + Ord + Clone> CountTable<K> {
    /// Entries ordered by count descending, then key ascending
    pub fn most_common(&self) -> Vec<(K, u64)> {
        let mut entries: Vec<(K, u64)> = self
            .counts
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        entries.sort_unstable_by(|(key_a, count_a), (key_b, count_b)| {
            count_b.cmp(count_a).then_with(|| key_a.cmp(key_b))
        });
        entries
    }

    /// Entries ordered by key, for stable output
    pub fn sorted_by_key(&self) -> Vec<(K, u64)> {
        let mut entries: Vec<(K, u64)> = self
            .counts
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }
}

impl<K: Eq + Hash> Default for CountTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Send> Monoid for CountTable<K> {
    fn identity() -> Self {
        Self::new()
    }

    fn combine(mut self, mut other: Self) -> Self {
        // Fold the smaller table into the larger one
        if self.len() < other.len() {
            std::mem::swap(&mut self, &mut other);
        }
        self.merge(other);
        self
    }
}

impl<K: Eq + Hash> FromIterator<(K, u64)> for CountTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, count) in iter {
            table.add(key, count);
        }
        table
    }
}

impl<K: Eq + Hash> IntoIterator for CountTable<K> {
    type Item = (K, u64);
    type IntoIter = hash_map::IntoIter<K, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl<'a, K: Eq + Hash> IntoIterator for &'a CountTable<K> {
    type Item = (&'a K, &'a u64);
    type IntoIter = hash_map::Iter<'a, K, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

#[cfg(feature = "serde")]
impl<K> serde::Serialize for CountTable<K>
where
    K: Eq + Hash + Ord + Clone + serde::Serialize,
{
    /// Serialized as a key-ordered sequence of `{ key, count }` records
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        #[derive(serde::Serialize)]
        struct Entry<'a, K> {
            key: &'a K,
            count: u64,
        }

        let entries = self.sorted_by_key();
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for (key, count) in &entries {
            seq.serialize_element(&Entry { key, count: *count })?;
        }
        seq.end()
    }
}
