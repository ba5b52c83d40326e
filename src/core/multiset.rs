//! Count multisets: how many of each city card sit in one place.
//!
//! A `CountMultiset` is the atomic container of the deck model. Every pile
//! (a known segment, the discard pile, the undrawn pile) is one of these.
//!
//! ## Invariant
//!
//! Entries present imply count > 0. Adjusting a city down to zero removes
//! its entry, so two multisets holding the same cards always compare equal.
//!
//! ## Persistence
//!
//! Backed by `im::OrdMap`, so `clone()` is O(1) and [`CountMultiset::increment`]
//! returns a new value that shares structure with the old one. Neither value
//! can observe later changes to the other.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::city::CityId;
use super::error::DeckError;

/// Mapping from city to a strictly positive card count.
///
/// ## Example
///
/// ```
/// use city_deck::core::{CityId, CountMultiset};
///
/// let atlanta = CityId::new("Atlanta");
/// let empty = CountMultiset::new();
///
/// let one = empty.increment(&atlanta, 1).unwrap();
/// assert_eq!(one.count(&atlanta), 1);
///
/// // The original is untouched
/// assert!(empty.is_empty());
///
/// // Going back to zero removes the entry entirely
/// let back = one.increment(&atlanta, -1).unwrap();
/// assert_eq!(back, empty);
///
/// // Going negative is rejected
/// assert!(empty.increment(&atlanta, -1).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "OrdMap<CityId, u32>", into = "OrdMap<CityId, u32>")]
pub struct CountMultiset {
    counts: OrdMap<CityId, u32>,
}

impl CountMultiset {
    /// Create an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a multiset from `(city, count)` pairs.
    ///
    /// Repeated cities have their counts summed, saturating at `u32::MAX`;
    /// zero counts are dropped. Use [`CountMultiset::try_from_counts`] when
    /// the input is not known to fit.
    pub fn from_counts<I, C>(counts: I) -> Self
    where
        I: IntoIterator<Item = (C, u32)>,
        C: Into<CityId>,
    {
        let mut map = OrdMap::new();
        for (city, count) in counts {
            if count == 0 {
                continue;
            }
            let slot = map.entry(city.into()).or_insert(0u32);
            *slot = slot.saturating_add(count);
        }
        Self { counts: map }
    }

    /// Create a multiset from `(city, count)` pairs, rejecting overflow.
    ///
    /// Returns `DeckError::CountOverflow` if a city's summed count does not
    /// fit in a `u32`.
    pub fn try_from_counts<I, C>(counts: I) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (C, u32)>,
        C: Into<CityId>,
    {
        let mut set = Self::new();
        for (city, count) in counts {
            let city = city.into();
            set = set.increment(&city, i64::from(count))?;
        }
        Ok(set)
    }

    /// Return a copy with `city` adjusted by `delta`.
    ///
    /// An absent city counts as zero. A result of zero removes the entry.
    ///
    /// Returns `DeckError::NegativeCount` if the result would be below zero
    /// and `DeckError::CountOverflow` if it would exceed `u32::MAX`.
    pub fn increment(&self, city: &CityId, delta: i64) -> Result<Self, DeckError> {
        let current = self.count(city);
        let negative = || DeckError::NegativeCount {
            city: city.clone(),
            count: current,
            delta,
        };
        let overflow = || DeckError::CountOverflow {
            city: city.clone(),
            count: current,
            delta,
        };

        let next = match i64::from(current).checked_add(delta) {
            Some(n) if n < 0 => return Err(negative()),
            Some(n) => u32::try_from(n).map_err(|_| overflow())?,
            None if delta < 0 => return Err(negative()),
            None => return Err(overflow()),
        };

        let mut counts = self.counts.clone();
        if next == 0 {
            counts.remove(city);
        } else {
            counts.insert(city.clone(), next);
        }
        Ok(Self { counts })
    }

    /// Get the count for a city (zero if absent).
    #[must_use]
    pub fn count(&self, city: &CityId) -> u32 {
        self.counts.get(city).copied().unwrap_or(0)
    }

    /// Check whether at least one card of `city` is present.
    #[must_use]
    pub fn contains(&self, city: &CityId) -> bool {
        self.counts.contains_key(city)
    }

    /// Total number of cards across all cities.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of distinct cities present.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Check if no cards are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(city, count)` pairs in ascending city order.
    pub fn entries(&self) -> impl Iterator<Item = (&CityId, u32)> + '_ {
        self.counts.iter().map(|(city, &count)| (city, count))
    }
}

impl From<OrdMap<CityId, u32>> for CountMultiset {
    fn from(counts: OrdMap<CityId, u32>) -> Self {
        Self::from_counts(counts)
    }
}

impl From<CountMultiset> for OrdMap<CityId, u32> {
    fn from(multiset: CountMultiset) -> Self {
        multiset.counts
    }
}

impl<C: Into<CityId>> FromIterator<(C, u32)> for CountMultiset {
    fn from_iter<I: IntoIterator<Item = (C, u32)>>(iter: I) -> Self {
        Self::from_counts(iter)
    }
}
