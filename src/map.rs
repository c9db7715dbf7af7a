// MIT License
//
// Copyright (c) 2020 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! A lock-striped concurrent hash map keyed by `i64`.

use crate::{
    config::Config,
    error::Result,
    hash::{self, mix},
    segment::Segment,
};

use std::{
    convert::Infallible,
    fmt::{self, Debug, Formatter},
};

/// A concurrent hash map from `i64` keys to `V`, striped across a fixed
/// number of independently locked segments.
///
/// Keys are hashed once with [`mix`]. The high bits of the hash choose a
/// segment and the remaining bits choose a starting bucket within that
/// segment's open-addressing table. Operations on keys in different segments
/// never contend with each other; operations on the same segment are
/// serialized by its lock, with lookups taking it in shared mode.
///
/// The number of segments is fixed at construction and is always a power of
/// two. Each segment grows independently by doubling once it is more than
/// [`load_factor`] full, and never shrinks.
///
/// Aggregate operations such as [`len`], [`keys`] and [`clear`] visit the
/// segments one at a time. While other threads are mutating the map, their
/// results need not correspond to any single instant, though each segment's
/// contribution is internally consistent.
///
/// Operations that hand out values require `V: Clone`, because the entry may
/// be replaced or removed by another thread as soon as the segment lock is
/// released. [`get_and`] and [`for_each`] avoid the clone by running a
/// closure while the lock is held.
///
/// [`mix`]: crate::hash::mix
/// [`load_factor`]: Config::load_factor
/// [`len`]: #method.len
/// [`keys`]: #method.keys
/// [`clear`]: #method.clear
/// [`get_and`]: #method.get_and
/// [`for_each`]: #method.for_each
pub struct LongHashMap<V> {
    segments: Box<[Segment<V>]>,
    segment_shift: Option<u32>,
}

impl<V> LongHashMap<V> {
    /// Creates an empty `LongHashMap` with the [default configuration].
    ///
    /// [default configuration]: Config::default
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty `LongHashMap` that can hold `capacity` entries without
    /// growing, assuming they spread evenly across the segments.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is too large for a segment to address.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config::default().with_expected_items(capacity))
    }

    /// Creates an empty `LongHashMap` with at least `num_segments` segments
    /// and room for `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `num_segments` is zero or too large, or if `capacity` is too
    /// large for a segment to address.
    pub fn with_capacity_and_segments(capacity: usize, num_segments: usize) -> Self {
        Self::with_config(
            Config::default()
                .with_expected_items(capacity)
                .with_concurrency_level(num_segments),
        )
    }

    /// Creates an empty `LongHashMap` from `config`, or explains why `config`
    /// cannot be satisfied.
    pub fn from_config(config: Config) -> Result<Self> {
        let (num_segments, segment_capacity) = config.layout()?;

        tracing::debug!(
            num_segments,
            segment_capacity,
            load_factor = config.load_factor,
            "creating long hash map"
        );

        let segments = (0..num_segments)
            .map(|_| Segment::with_capacity(segment_capacity, config.load_factor))
            .collect();

        Ok(Self {
            segments,
            segment_shift: hash::segment_shift(num_segments),
        })
    }

    fn with_config(config: Config) -> Self {
        Self::from_config(config).unwrap_or_else(|e| panic!("invalid map configuration: {}", e))
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.len() == 0)
    }

    /// Returns the total number of buckets across all segments.
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(Segment::capacity).sum()
    }

    /// Returns the number of occupied buckets across all segments.
    ///
    /// Deletion never leaves tombstones behind, so at rest this is always
    /// equal to [`len`].
    ///
    /// [`len`]: #method.len
    pub fn used_bucket_count(&self) -> usize {
        self.segments.iter().map(Segment::used_buckets).sum()
    }

    /// Returns the number of segments the map is striped across.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Returns the index of the segment that `key` is stored in.
    pub fn segment_index(&self, key: i64) -> usize {
        hash::segment_index(mix(key), self.segment_shift)
    }

    /// Returns `true` if the map contains an entry for `key`.
    pub fn contains_key(&self, key: i64) -> bool {
        self.get_and(key, |_| ()).is_some()
    }

    /// Returns a copy of the value for `key`.
    pub fn get(&self, key: i64) -> Option<V>
    where
        V: Clone,
    {
        self.get_and(key, V::clone)
    }

    /// Invokes `with_value` with a reference to the value for `key`.
    ///
    /// `with_value` runs while the key's segment is read-locked, so it must not
    /// write to this map.
    pub fn get_and<F: FnOnce(&V) -> T, T>(&self, key: i64, with_value: F) -> Option<T> {
        let hash = mix(key);

        self.segment(hash).get_and(key, hash, with_value)
    }

    /// Associates `value` with `key`, returning the value it replaced.
    pub fn insert(&self, key: i64, value: V) -> Option<V> {
        let hash = mix(key);

        self.segment(hash).insert(key, hash, value)
    }

    /// Associates `value` with `key` only if `key` is absent.
    ///
    /// Returns a copy of the existing value if there is one, in which case
    /// `value` is dropped.
    pub fn insert_if_absent(&self, key: i64, value: V) -> Option<V>
    where
        V: Clone,
    {
        self.get_or_insert_with_and(key, move |_| value, |existing, inserted| {
            if inserted {
                None
            } else {
                Some(existing.clone())
            }
        })
    }

    /// Returns a copy of the value for `key`, inserting `make_value(key)`
    /// first if there is none.
    ///
    /// `make_value` runs while the key's segment is write-locked, which
    /// guarantees that it is invoked at most once per absent key even when
    /// many threads race on that key. It must not access this map.
    pub fn get_or_insert_with<F: FnOnce(i64) -> V>(&self, key: i64, make_value: F) -> V
    where
        V: Clone,
    {
        self.get_or_insert_with_and(key, make_value, |value, _| value.clone())
    }

    /// Like [`get_or_insert_with`], but `make_value` may fail.
    ///
    /// If `make_value` returns an error, nothing is inserted and the error is
    /// returned as-is.
    ///
    /// [`get_or_insert_with`]: #method.get_or_insert_with
    pub fn try_get_or_insert_with<F: FnOnce(i64) -> Result<V, E>, E>(
        &self,
        key: i64,
        make_value: F,
    ) -> Result<V, E>
    where
        V: Clone,
    {
        let hash = mix(key);

        self.segment(hash)
            .get_or_try_insert_with_and(key, hash, make_value, |value, _| value.clone())
    }

    /// Invokes `with_value` with the value for `key` and whether it was just
    /// created by `make_value`.
    ///
    /// Both closures run while the key's segment is write-locked.
    pub fn get_or_insert_with_and<F, G, T>(&self, key: i64, make_value: F, with_value: G) -> T
    where
        F: FnOnce(i64) -> V,
        G: FnOnce(&V, bool) -> T,
    {
        let hash = mix(key);
        let result = self.segment(hash).get_or_try_insert_with_and(
            key,
            hash,
            |key| Ok::<_, Infallible>(make_value(key)),
            with_value,
        );

        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&self, key: i64) -> Option<V> {
        self.remove_if(key, |_| true)
    }

    /// Removes the entry for `key` only if its value equals `expected`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove_if_eq(&self, key: i64, expected: &V) -> bool
    where
        V: PartialEq,
    {
        self.remove_if(key, |value| value == expected).is_some()
    }

    /// Removes the entry for `key` if `should_remove` returns `true` for its
    /// value, returning the removed value.
    pub fn remove_if<F: FnOnce(&V) -> bool>(&self, key: i64, should_remove: F) -> Option<V> {
        let hash = mix(key);

        self.segment(hash).remove_if(key, hash, should_remove)
    }

    /// Removes every entry. Segments keep their current capacity.
    pub fn clear(&self) {
        for segment in self.segments.iter() {
            segment.clear();
        }

        tracing::trace!(num_segments = self.segments.len(), "cleared long hash map");
    }

    /// Invokes `func` on every entry, one segment at a time.
    ///
    /// Each segment is read-locked while it is visited, so `func` must not
    /// write to this map.
    pub fn for_each<F: FnMut(i64, &V)>(&self, mut func: F) {
        for segment in self.segments.iter() {
            segment.for_each(&mut func);
        }
    }

    /// Returns a snapshot of the keys in the map, in no particular order.
    pub fn keys(&self) -> Vec<i64> {
        let mut keys = Vec::with_capacity(self.len());
        self.for_each(|key, _| keys.push(key));

        keys
    }

    /// Returns a snapshot of the values in the map, in no particular order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        let mut values = Vec::with_capacity(self.len());
        self.for_each(|_, value| values.push(value.clone()));

        values
    }

    fn segment(&self, hash: i32) -> &Segment<V> {
        &self.segments[hash::segment_index(hash, self.segment_shift)]
    }
}

impl<V> Default for LongHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for LongHashMap<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.for_each(|key, value| {
            map.entry(&key, value);
        });

        map.finish()
    }
}

impl<V> Extend<(i64, V)> for LongHashMap<V> {
    fn extend<I: IntoIterator<Item = (i64, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> FromIterator<(i64, V)> for LongHashMap<V> {
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let map = Self::with_capacity(iter.size_hint().0);

        for (key, value) in iter {
            map.insert(key, value);
        }

        map
    }
}
