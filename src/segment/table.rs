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

//! The open-addressing table owned by a single segment.
//!
//! Keys and values live in two parallel arrays. A bucket is empty iff its
//! value is `None`, so every `i64` is a usable key. Collisions are resolved by
//! linear probing and removals repair the probe chain with backward-shift
//! deletion, which means an empty bucket always terminates a probe.
//!
//! `Table` performs no synchronization of its own; [`Segment`] wraps it in a
//! lock.
//!
//! [`Segment`]: super::Segment

use crate::hash::{self, bucket_index};

use super::MAX_SEGMENT_CAPACITY;

pub(crate) struct Table<V> {
    keys: Box<[i64]>,
    values: Box<[Option<V>]>,
    len: usize,
    used_buckets: usize,
    resize_threshold: usize,
    load_factor: f64,
}

enum Probe {
    Occupied(usize),
    Vacant(usize),
}

impl<V> Table<V> {
    pub(crate) fn with_capacity(capacity: usize, load_factor: f64) -> Self {
        assert!(capacity.is_power_of_two());
        assert!(capacity <= MAX_SEGMENT_CAPACITY);

        let mut values = Vec::with_capacity(capacity);
        values.resize_with(capacity, || None);

        Self {
            keys: vec![0; capacity].into_boxed_slice(),
            values: values.into_boxed_slice(),
            len: 0,
            used_buckets: 0,
            resize_threshold: resize_threshold(capacity, load_factor),
            load_factor,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn used_buckets(&self) -> usize {
        self.used_buckets
    }

    pub(crate) fn capacity(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn get(&self, key: i64, hash: i32) -> Option<&V> {
        match self.probe(key, hash) {
            Probe::Occupied(index) => self.values[index].as_ref(),
            Probe::Vacant(_) => None,
        }
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub(crate) fn insert(&mut self, key: i64, hash: i32, value: V) -> Option<V> {
        match self.probe(key, hash) {
            Probe::Occupied(index) => self.values[index].replace(value),
            Probe::Vacant(index) => {
                self.occupy(index, key, hash, value);

                None
            }
        }
    }

    /// Returns the value stored under `key`, first storing the output of
    /// `make_value` if there is none.
    ///
    /// `make_value` runs at most once, and only if `key` is absent. If it
    /// fails, the table is left untouched.
    pub(crate) fn get_or_try_insert_with<F: FnOnce(i64) -> Result<V, E>, E>(
        &mut self,
        key: i64,
        hash: i32,
        make_value: F,
    ) -> Result<(&V, bool), E> {
        let (index, inserted) = match self.probe(key, hash) {
            Probe::Occupied(index) => (index, false),
            Probe::Vacant(index) => {
                let value = make_value(key)?;

                (self.occupy(index, key, hash, value), true)
            }
        };

        match &self.values[index] {
            Some(value) => Ok((value, inserted)),
            None => unreachable!(),
        }
    }

    /// Removes the entry for `key` if `should_remove` approves of its value.
    pub(crate) fn remove_if<F: FnOnce(&V) -> bool>(
        &mut self,
        key: i64,
        hash: i32,
        should_remove: F,
    ) -> Option<V> {
        let index = match self.probe(key, hash) {
            Probe::Occupied(index) => index,
            Probe::Vacant(_) => return None,
        };

        let approved = match &self.values[index] {
            Some(value) => should_remove(value),
            None => false,
        };

        if !approved {
            return None;
        }

        let previous = self.values[index].take();

        self.len -= 1;
        self.used_buckets -= 1;
        self.shift_back_from(index);

        previous
    }

    pub(crate) fn clear(&mut self) {
        self.values.iter_mut().for_each(|value| *value = None);
        self.len = 0;
        self.used_buckets = 0;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (i64, &V)> + '_ {
        self.keys
            .iter()
            .zip(self.values.iter())
            .filter_map(|(&key, value)| value.as_ref().map(|value| (key, value)))
    }

    fn mask(&self) -> usize {
        self.capacity() - 1
    }

    fn probe(&self, key: i64, hash: i32) -> Probe {
        let mask = self.mask();
        let mut index = bucket_index(hash, self.capacity());

        loop {
            match self.values[index] {
                None => return Probe::Vacant(index),
                Some(_) if self.keys[index] == key => return Probe::Occupied(index),
                Some(_) => index = (index + 1) & mask,
            }
        }
    }

    /// Fills the vacant bucket at `index`, growing the table if that pushes it
    /// over its threshold. Returns the entry's final index.
    fn occupy(&mut self, index: usize, key: i64, hash: i32, value: V) -> usize {
        debug_assert!(self.values[index].is_none());

        self.keys[index] = key;
        self.values[index] = Some(value);
        self.len += 1;
        self.used_buckets += 1;

        if self.len <= self.resize_threshold {
            return index;
        }

        self.grow();

        match self.probe(key, hash) {
            Probe::Occupied(index) => index,
            Probe::Vacant(_) => unreachable!(),
        }
    }

    /// Closes the gap at `gap` by pulling later members of its run backwards.
    fn shift_back_from(&mut self, mut gap: usize) {
        let mask = self.mask();
        let capacity = self.capacity();
        let mut index = (gap + 1) & mask;

        while self.values[index].is_some() {
            let ideal = bucket_index(hash::mix(self.keys[index]), capacity);

            // entries whose ideal bucket lies cyclically in (gap, index] must stay
            let stays = if gap <= index {
                gap < ideal && ideal <= index
            } else {
                gap < ideal || ideal <= index
            };

            if !stays {
                self.keys[gap] = self.keys[index];
                self.values[gap] = self.values[index].take();
                gap = index;
            }

            index = (index + 1) & mask;
        }
    }

    /// Doubles the capacity until `len` fits under the threshold again.
    ///
    /// The new arrays are filled completely before they replace the old ones.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let mut new_capacity = old_capacity;

        while self.len > resize_threshold(new_capacity, self.load_factor) {
            new_capacity = new_capacity
                .checked_mul(2)
                .filter(|&capacity| capacity <= MAX_SEGMENT_CAPACITY)
                .unwrap_or_else(|| panic!("segment capacity overflow"));
        }

        let mut next = Table::with_capacity(new_capacity, self.load_factor);

        for (key, value) in self.keys.iter().zip(self.values.iter_mut()) {
            if let Some(value) = value.take() {
                let hash = hash::mix(*key);

                match next.probe(*key, hash) {
                    Probe::Vacant(index) => {
                        next.keys[index] = *key;
                        next.values[index] = Some(value);
                    }
                    Probe::Occupied(_) => unreachable!(),
                }
            }
        }

        next.len = self.len;
        next.used_buckets = self.used_buckets;

        tracing::trace!(old_capacity, new_capacity, len = self.len, "grew segment");

        *self = next;
    }
}

pub(crate) fn resize_threshold(capacity: usize, load_factor: f64) -> usize {
    (capacity as f64 * load_factor) as usize
}
