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

//! Independently locked shards of a [`LongHashMap`].
//!
//! Each segment owns one open-addressing [`Table`] behind a reader-writer
//! lock. Lookups take the lock in shared mode; every mutation, including a
//! resize and any user-supplied factory, runs with the lock held exclusively.
//! Segments never coordinate with each other.
//!
//! [`LongHashMap`]: crate::LongHashMap

mod table;

pub(crate) use table::resize_threshold;

use table::Table;

use crossbeam_utils::CachePadded;
use parking_lot::RwLock;

/// The smallest capacity a segment is ever created with.
pub const MIN_SEGMENT_CAPACITY: usize = 2;

/// The largest capacity a segment may grow to.
pub const MAX_SEGMENT_CAPACITY: usize = 1 << 30;

pub(crate) struct Segment<V> {
    table: CachePadded<RwLock<Table<V>>>,
}

impl<V> Segment<V> {
    pub(crate) fn with_capacity(capacity: usize, load_factor: f64) -> Self {
        Self {
            table: CachePadded::new(RwLock::new(Table::with_capacity(capacity, load_factor))),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.table.read().len()
    }

    pub(crate) fn used_buckets(&self) -> usize {
        self.table.read().used_buckets()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.table.read().capacity()
    }

    pub(crate) fn get_and<F: FnOnce(&V) -> T, T>(
        &self,
        key: i64,
        hash: i32,
        with_value: F,
    ) -> Option<T> {
        self.table.read().get(key, hash).map(with_value)
    }

    pub(crate) fn insert(&self, key: i64, hash: i32, value: V) -> Option<V> {
        self.table.write().insert(key, hash, value)
    }

    /// Invokes `with_value` on the value for `key`, creating it with
    /// `make_value` first if it is absent.
    ///
    /// The write lock is held across `make_value`, so it runs at most once per
    /// absent key no matter how many threads race on it.
    pub(crate) fn get_or_try_insert_with_and<F, G, T, E>(
        &self,
        key: i64,
        hash: i32,
        make_value: F,
        with_value: G,
    ) -> Result<T, E>
    where
        F: FnOnce(i64) -> Result<V, E>,
        G: FnOnce(&V, bool) -> T,
    {
        let mut table = self.table.write();
        let (value, inserted) = table.get_or_try_insert_with(key, hash, make_value)?;

        Ok(with_value(value, inserted))
    }

    pub(crate) fn remove_if<F: FnOnce(&V) -> bool>(
        &self,
        key: i64,
        hash: i32,
        should_remove: F,
    ) -> Option<V> {
        self.table.write().remove_if(key, hash, should_remove)
    }

    pub(crate) fn clear(&self) {
        self.table.write().clear();
    }

    pub(crate) fn for_each<F: FnMut(i64, &V)>(&self, mut func: F) {
        let table = self.table.read();

        for (key, value) in table.iter() {
            func(key, value);
        }
    }
}
