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

//! Errors reported while configuring a [`LongHashMap`].
//!
//! [`LongHashMap`]: crate::LongHashMap

use thiserror::Error;

/// Alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A rejected map configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The load factor was not a finite number strictly between 0 and 1.
    #[error("load factor must be strictly between 0 and 1, got {0}")]
    InvalidLoadFactor(f64),

    /// A map must have at least one segment.
    #[error("concurrency level must be greater than zero")]
    ZeroConcurrencyLevel,

    /// More segments were requested than a hash can address.
    #[error("concurrency level of {requested} exceeds the maximum of {max}")]
    TooManySegments { requested: usize, max: usize },

    /// The requested capacity does not fit in a segment.
    #[error("a segment of {requested} buckets exceeds the maximum of {max}")]
    CapacityOverflow { requested: usize, max: usize },
}
