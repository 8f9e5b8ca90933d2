//! Insertion-ordered mapping from objects to weights.
//!
//! [`WeightMap`] is the container consumed and produced by the single-round drivers. Keys are
//! only required to be [`PartialEq`]: objects need not be hashable or ordered, so lookups are
//! linear scans. Keys are unique and keep their insertion order, and weights are stored in a
//! contiguous slice so they can be handed to a [`WeightedChoice`](crate::WeightedChoice)
//! without copying.

use std::{
    borrow::Borrow, fmt, iter, marker::PhantomData, num::ParseFloatError, slice, str::FromStr,
    vec,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};

use crate::weights;

/// An insertion-ordered mapping from object to weight with unique keys.
///
/// # Examples
///
/// ```
/// use mwu_engine::WeightMap;
///
/// let mut map = WeightMap::new();
/// map.insert("a", 1.0);
/// map.insert("b", 3.0);
/// assert_eq!(map.insert("a", 2.0), Some(1.0));
///
/// assert_eq!(map.keys(), ["a", "b"]);
/// assert_eq!(map.weights(), [2.0, 3.0]);
/// assert_eq!(map.get(&"b"), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMap<T> {
    keys: Vec<T>,
    weights: Vec<f64>,
}

impl<T> Default for WeightMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeightMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    /// Returns the weights, aligned with [`keys`](Self::keys).
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the weights mutably. Keys cannot be changed through this slice.
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    /// Returns the entry at `index` in insertion order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&T, f64)> {
        Some((self.keys.get(index)?, self.weights[index]))
    }

    /// Iterates over `(key, weight)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        iter::zip(self.keys.iter(), self.weights.iter().copied())
    }

    /// Returns the total selection mass.
    #[must_use]
    pub fn total(&self) -> f64 {
        weights::total(&self.weights)
    }

    /// Returns the selection probability of each entry, or `None` if the total is zero.
    #[must_use]
    pub fn probabilities(&self) -> Option<Vec<f64>> {
        weights::probabilities(&self.weights)
    }

    /// Returns the entry with the largest weight. Ties go to the earliest entry.
    #[must_use]
    pub fn argmax(&self) -> Option<(&T, f64)> {
        let mut best: Option<(&T, f64)> = None;
        for (key, weight) in self {
            if best.is_none_or(|(_, w)| weight.total_cmp(&w).is_gt()) {
                best = Some((key, weight));
            }
        }
        best
    }
}

impl<T> WeightMap<T>
where
    T: PartialEq,
{
    /// Creates a map assigning `weight` to every object.
    ///
    /// Duplicate objects collapse into one entry at the first position.
    #[must_use]
    pub fn uniform<I>(objects: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        objects.into_iter().map(|object| (object, weight)).collect()
    }

    /// Returns the position of `key` in insertion order.
    #[must_use]
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.keys.iter().position(|k| k.borrow() == key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Returns the weight of `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<f64>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).map(|i| self.weights[i])
    }

    /// Returns a mutable reference to the weight of `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut f64>
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).map(|i| &mut self.weights[i])
    }

    /// Inserts `key` with `weight`.
    ///
    /// If the key is already present its weight is replaced in place, keeping its position,
    /// and the old weight is returned.
    pub fn insert(&mut self, key: T, weight: f64) -> Option<f64> {
        if let Some(i) = self.position(&key) {
            return Some(std::mem::replace(&mut self.weights[i], weight));
        }
        self.keys.push(key);
        self.weights.push(weight);
        None
    }
}

/// Iterator over `(key, weight)` pairs of a [`WeightMap`].
pub type Iter<'a, T> = iter::Zip<slice::Iter<'a, T>, iter::Copied<slice::Iter<'a, f64>>>;

impl<'a, T> IntoIterator for &'a WeightMap<T> {
    type Item = (&'a T, f64);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for WeightMap<T> {
    type Item = (T, f64);
    type IntoIter = iter::Zip<vec::IntoIter<T>, vec::IntoIter<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        iter::zip(self.keys, self.weights)
    }
}

impl<T> FromIterator<(T, f64)> for WeightMap<T>
where
    T: PartialEq,
{
    /// Later duplicates replace the weight of earlier ones.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<T> Extend<(T, f64)> for WeightMap<T>
where
    T: PartialEq,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        for (key, weight) in iter {
            self.insert(key, weight);
        }
    }
}

impl<T> Serialize for WeightMap<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de, T> Deserialize<'de> for WeightMap<T>
where
    T: Deserialize<'de> + PartialEq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WeightMapVisitor<T>(PhantomData<T>);

        impl<'de, T> Visitor<'de> for WeightMapVisitor<T>
        where
            T: Deserialize<'de> + PartialEq,
        {
            type Value = WeightMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from object to weight")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = WeightMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, weight)) = access.next_entry::<T, f64>()? {
                    map.insert(key, weight);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(WeightMapVisitor(PhantomData))
    }
}

/// Error returned when parsing a [`WeightMap<String>`] from `name=weight` entries fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseWeightMapError {
    #[display("missing '=' in weight entry '{entry}'")]
    MissingSeparator { entry: String },
    #[display("empty object name in weight entry '{entry}'")]
    EmptyName { entry: String },
    #[display("invalid weight '{value}' for '{name}'")]
    InvalidWeight {
        name: String,
        value: String,
        source: ParseFloatError,
    },
}

impl FromStr for WeightMap<String> {
    type Err = ParseWeightMapError;

    /// Parses comma-separated `name=weight` entries, e.g. `a=1.0,b=2.5`.
    ///
    /// Blank entries are skipped, so the empty string parses to an empty map.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut map = WeightMap::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((name, value)) = entry.split_once('=') else {
                return Err(ParseWeightMapError::MissingSeparator {
                    entry: entry.to_owned(),
                });
            };
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() {
                return Err(ParseWeightMapError::EmptyName {
                    entry: entry.to_owned(),
                });
            }
            let weight = value
                .parse::<f64>()
                .map_err(|source| ParseWeightMapError::InvalidWeight {
                    name: name.to_owned(),
                    value: value.to_owned(),
                    source,
                })?;
            map.insert(name.to_owned(), weight);
        }
        Ok(map)
    }
}
