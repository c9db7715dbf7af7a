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

//! Sizing parameters for a [`LongHashMap`].
//!
//! [`LongHashMap`]: crate::LongHashMap

use crate::{
    error::{Error, Result},
    segment::{resize_threshold, MAX_SEGMENT_CAPACITY, MIN_SEGMENT_CAPACITY},
};

/// The number of entries a map is sized for if no hint is given.
pub const DEFAULT_EXPECTED_ITEMS: usize = 256;

/// The fraction of a segment that may be occupied before it grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// The largest number of segments a map may be split into.
pub const MAX_SEGMENTS: usize = 1 << 16;

#[cfg(not(feature = "num-cpus"))]
const FALLBACK_CONCURRENCY_LEVEL: usize = 16;

/// Construction parameters for a [`LongHashMap`].
///
/// ```
/// use long_hash_map::{Config, LongHashMap};
///
/// let config = Config::default()
///     .with_expected_items(1024)
///     .with_concurrency_level(4);
/// let map: LongHashMap<u32> = LongHashMap::from_config(config).unwrap();
///
/// assert_eq!(map.num_segments(), 4);
/// ```
///
/// [`LongHashMap`]: crate::LongHashMap
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Total number of entries the map should hold without growing.
    pub expected_items: usize,
    /// Minimum number of independently locked segments. Rounded up to a power
    /// of two.
    pub concurrency_level: usize,
    /// Occupancy above which a segment doubles its capacity.
    pub load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_items: DEFAULT_EXPECTED_ITEMS,
            concurrency_level: default_concurrency_level(),
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    pub fn with_expected_items(mut self, expected_items: usize) -> Self {
        self.expected_items = expected_items;

        self
    }

    pub fn with_concurrency_level(mut self, concurrency_level: usize) -> Self {
        self.concurrency_level = concurrency_level;

        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;

        self
    }

    /// Checks that this configuration describes a constructible map.
    pub fn validate(&self) -> Result<()> {
        self.layout().map(|_| ())
    }

    /// Returns the number of segments and the initial capacity of each.
    pub(crate) fn layout(&self) -> Result<(usize, usize)> {
        if !(self.load_factor > 0.0 && self.load_factor < 1.0) {
            return Err(Error::InvalidLoadFactor(self.load_factor));
        }

        // even the largest segment must be able to hold one entry
        if resize_threshold(MAX_SEGMENT_CAPACITY, self.load_factor) < 1 {
            return Err(Error::InvalidLoadFactor(self.load_factor));
        }

        if self.concurrency_level == 0 {
            return Err(Error::ZeroConcurrencyLevel);
        }

        if self.concurrency_level > MAX_SEGMENTS {
            return Err(Error::TooManySegments {
                requested: self.concurrency_level,
                max: MAX_SEGMENTS,
            });
        }

        let num_segments = self.concurrency_level.next_power_of_two();
        let per_segment = self.expected_items.div_ceil(num_segments);
        let capacity = segment_capacity_for(per_segment, self.load_factor)?;

        Ok((num_segments, capacity))
    }
}

/// Returns the smallest power of two `c >= MIN_SEGMENT_CAPACITY` such that
/// `c * load_factor >= items`.
pub(crate) fn segment_capacity_for(items: usize, load_factor: f64) -> Result<usize> {
    let mut capacity = MIN_SEGMENT_CAPACITY;

    while (capacity as f64) * load_factor < items as f64 {
        if capacity >= MAX_SEGMENT_CAPACITY {
            return Err(Error::CapacityOverflow {
                requested: items,
                max: MAX_SEGMENT_CAPACITY,
            });
        }

        capacity *= 2;
    }

    Ok(capacity)
}

#[cfg(feature = "num-cpus")]
fn default_concurrency_level() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "num-cpus"))]
fn default_concurrency_level() -> usize {
    FALLBACK_CONCURRENCY_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();

        assert_eq!(config.expected_items, DEFAULT_EXPECTED_ITEMS);
        assert_eq!(config.load_factor, DEFAULT_LOAD_FACTOR);
        assert!(config.concurrency_level > 0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn layout_rounds_segments_up() {
        let config = Config::default()
            .with_expected_items(8)
            .with_concurrency_level(3);

        let (num_segments, capacity) = config.layout().unwrap();

        assert_eq!(num_segments, 4);
        assert_eq!(capacity, 4);
    }

    #[test]
    fn layout_single_segment() {
        let config = Config::default()
            .with_expected_items(8)
            .with_concurrency_level(1);

        assert_eq!(config.layout(), Ok((1, 16)));
    }

    #[test]
    fn capacity_sizing() {
        assert_eq!(segment_capacity_for(0, 0.75), Ok(MIN_SEGMENT_CAPACITY));
        assert_eq!(segment_capacity_for(1, 0.75), Ok(2));
        assert_eq!(segment_capacity_for(2, 0.75), Ok(4));
        assert_eq!(segment_capacity_for(8, 0.75), Ok(16));
        assert_eq!(segment_capacity_for(12, 0.75), Ok(16));
        assert_eq!(segment_capacity_for(13, 0.75), Ok(32));
        assert_eq!(segment_capacity_for(8, 0.5), Ok(16));
        assert_eq!(segment_capacity_for(9, 0.5), Ok(32));
    }

    #[test]
    fn rejects_bad_load_factor() {
        for load_factor in [0.0, 1e-10, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let config = Config::default().with_load_factor(load_factor);

            assert!(matches!(
                config.validate(),
                Err(Error::InvalidLoadFactor(_))
            ));
        }
    }

    #[test]
    fn smallest_usable_load_factor() {
        let smallest = 1.0 / MAX_SEGMENT_CAPACITY as f64;

        assert_eq!(
            Config::default().with_load_factor(smallest).validate(),
            Ok(())
        );
        assert_eq!(
            Config::default().with_load_factor(smallest / 2.0).validate(),
            Err(Error::InvalidLoadFactor(smallest / 2.0))
        );
    }

    #[test]
    fn rejects_zero_concurrency_level() {
        let config = Config::default().with_concurrency_level(0);

        assert_eq!(config.validate(), Err(Error::ZeroConcurrencyLevel));
    }

    #[test]
    fn rejects_too_many_segments() {
        let config = Config::default().with_concurrency_level(MAX_SEGMENTS + 1);

        assert_eq!(
            config.validate(),
            Err(Error::TooManySegments {
                requested: MAX_SEGMENTS + 1,
                max: MAX_SEGMENTS,
            })
        );
        assert_eq!(
            Config::default()
                .with_concurrency_level(MAX_SEGMENTS)
                .validate(),
            Ok(())
        );
    }

    #[test]
    fn rejects_oversized_segments() {
        let config = Config::default()
            .with_expected_items(usize::MAX / 2)
            .with_concurrency_level(1);

        assert!(matches!(
            config.validate(),
            Err(Error::CapacityOverflow { .. })
        ));
    }
}
