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

//! A lock-striped concurrent hash map keyed by 64-bit integers.
//!
//! [`LongHashMap`] is built for bookkeeping that is keyed by plain integers,
//! such as message IDs, sequence numbers, or connection and consumer handles,
//! where boxing keys would be wasteful and a single map-wide lock would
//! serialize unrelated work. The key space is split across a power-of-two
//! number of segments, each an open-addressing table with its own lock.
//!
//! ```
//! use long_hash_map::LongHashMap;
//!
//! let consumers = LongHashMap::with_capacity(64);
//!
//! assert_eq!(consumers.insert(7, "orders"), None);
//! assert_eq!(consumers.get(7), Some("orders"));
//! assert_eq!(consumers.get_or_insert_with(8, |_| "audit"), "audit");
//! assert_eq!(consumers.remove(7), Some("orders"));
//! assert_eq!(consumers.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod map;

mod segment;

pub use config::Config;
pub use error::{Error, Result};
pub use map::LongHashMap;
pub use segment::{MAX_SEGMENT_CAPACITY, MIN_SEGMENT_CAPACITY};
