use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Ordered string → count mapping. Keys keep the order they were first seen
/// in, and serialise as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tally with every key present at zero, fixing the output order.
    pub fn with_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tally = Self::new();
        for key in keys {
            tally.add(key, 0);
        }
        tally
    }

    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: &str, count: usize) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), count));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// The `n` highest counts, descending. Ties keep first-seen order.
    pub fn top_n(&self, n: usize) -> Tally {
        let mut ranked = self.entries.clone();
        // stable sort: equal counts stay in first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).collect()
    }

    /// Reorders entries by `key_fn`, stable for equal keys.
    pub fn sorted_by_key<K: Ord>(&self, mut key_fn: impl FnMut(&str) -> K) -> Tally {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|(k, _)| key_fn(k.as_str()));
        entries.into_iter().collect()
    }
}

impl FromIterator<(String, usize)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (key, count) in iter {
            tally.add(&key, count);
        }
        tally
    }
}

impl<'a> FromIterator<(&'a str, usize)> for Tally {
    fn from_iter<I: IntoIterator<Item = (&'a str, usize)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (key, count) in iter {
            tally.add(key, count);
        }
        tally
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}
