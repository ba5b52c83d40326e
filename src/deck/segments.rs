//! Stack of known deck segments.
//!
//! Each segment is a [`CountMultiset`] describing cards known to sit in one
//! contiguous band of the deck, in unknown order within the band.
//!
//! ## Pruning
//!
//! A segment is removed as soon as a removal empties it, unless it is the
//! only segment left. The rule is the same for every index. Removals report
//! whether they pruned so the change can be reversed exactly.
//!
//! A shuffle that lands on a stack holding only one empty segment replaces
//! that segment instead of burying it, so an empty segment never sits below
//! a non-empty one. Undoing the shuffle puts the empty segment back.
//!
//! All operations return a new stack and leave `self` untouched.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CityId, CountMultiset, DeckError};

/// Where a card came out of the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentRemoval {
    /// Index of the segment that was decremented.
    pub index: usize,
    /// Whether the segment emptied and was removed.
    pub pruned: bool,
}

/// Ordered layers of known deck content. Index 0 is the bottom.
///
/// ## Example
///
/// ```
/// use city_deck::core::{CityId, CountMultiset};
/// use city_deck::deck::DeckSegmentStack;
///
/// let atlanta = CityId::new("Atlanta");
/// let stack = DeckSegmentStack::from_segment(CountMultiset::from_counts([("Atlanta", 2)]));
///
/// // Shuffle a discarded Atlanta back on top
/// let stack = stack.push_segment(CountMultiset::from_counts([("Atlanta", 1)]));
/// assert_eq!(stack.len(), 2);
///
/// // Draw it: the top segment empties and is pruned
/// let (stack, removal) = stack.draw_from_top(&atlanta).unwrap();
/// assert_eq!(removal.index, 1);
/// assert!(removal.pruned);
/// assert_eq!(stack.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckSegmentStack {
    segments: Vector<CountMultiset>,
}

impl DeckSegmentStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack holding one segment.
    #[must_use]
    pub fn from_segment(segment: CountMultiset) -> Self {
        Self {
            segments: Vector::unit(segment),
        }
    }

    /// Create a stack from segments listed bottom first.
    pub fn from_segments(segments: impl IntoIterator<Item = CountMultiset>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the segment at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CountMultiset> {
        self.segments.get(index)
    }

    /// Index of the top segment, if any.
    #[must_use]
    pub fn top_index(&self) -> Option<usize> {
        self.segments.len().checked_sub(1)
    }

    /// The top segment, or an empty one if the stack is empty.
    #[must_use]
    pub fn top_segment(&self) -> CountMultiset {
        self.segments.last().cloned().unwrap_or_default()
    }

    /// Iterate segments bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CountMultiset> + '_ {
        self.segments.iter()
    }

    /// Total cards across all segments.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.segments.iter().map(CountMultiset::total).sum()
    }

    /// Check whether every segment is empty.
    #[must_use]
    pub fn all_empty(&self) -> bool {
        self.segments.iter().all(CountMultiset::is_empty)
    }

    /// Remove one `city` from the top segment.
    pub fn draw_from_top(&self, city: &CityId) -> Result<(Self, SegmentRemoval), DeckError> {
        let index = self.top_index().ok_or(DeckError::SegmentOutOfRange { index: 0, len: 0 })?;
        self.remove_at(index, city)
    }

    /// Remove one `city` from the segment at `index`, bypassing discard.
    pub fn destroy_at(
        &self,
        index: usize,
        city: &CityId,
    ) -> Result<(Self, SegmentRemoval), DeckError> {
        self.remove_at(index, city)
    }

    /// Append `segment` as the new top.
    #[must_use]
    pub fn push_segment(&self, segment: CountMultiset) -> Self {
        let mut segments = self.segments.clone();
        segments.push_back(segment);
        Self { segments }
    }

    /// Lay `segment` on top, replacing a sole empty segment.
    ///
    /// Returns whether an empty segment was replaced; pass it back to
    /// [`DeckSegmentStack::unshuffle`] to reverse.
    #[must_use]
    pub fn shuffle_in(&self, segment: CountMultiset) -> (Self, bool) {
        if self.segments.len() == 1 && self.all_empty() {
            (Self::from_segment(segment), true)
        } else {
            (self.push_segment(segment), false)
        }
    }

    /// Reverse [`DeckSegmentStack::shuffle_in`], returning the shuffled segment.
    pub fn unshuffle(&self, replaced_empty: bool) -> Result<(Self, CountMultiset), DeckError> {
        let (rest, top) = self.pop_top_segment()?;
        if !replaced_empty {
            return Ok((rest, top));
        }
        if !rest.is_empty() {
            return Err(DeckError::EmptyStack);
        }
        Ok((Self::from_segment(CountMultiset::new()), top))
    }

    /// Remove and return the top segment.
    pub fn pop_top_segment(&self) -> Result<(Self, CountMultiset), DeckError> {
        let mut segments = self.segments.clone();
        let top = segments.pop_back().ok_or(DeckError::EmptyStack)?;
        Ok((Self { segments }, top))
    }

    /// Put one `city` back where `removal` took it from.
    ///
    /// A pruned removal re-inserts a segment holding just that card.
    pub fn restore(&self, removal: SegmentRemoval, city: &CityId) -> Result<Self, DeckError> {
        let mut segments = self.segments.clone();
        if removal.pruned {
            if removal.index > segments.len() {
                return Err(DeckError::EmptyStack);
            }
            segments.insert(removal.index, CountMultiset::from_counts([(city.clone(), 1)]));
        } else {
            let segment = segments.get(removal.index).ok_or(DeckError::EmptyStack)?;
            let restored = segment.increment(city, 1)?;
            segments.set(removal.index, restored);
        }
        Ok(Self { segments })
    }

    fn remove_at(&self, index: usize, city: &CityId) -> Result<(Self, SegmentRemoval), DeckError> {
        let segment = self.segments.get(index).ok_or(DeckError::SegmentOutOfRange {
            index,
            len: self.segments.len(),
        })?;
        let remaining = segment.increment(city, -1)?;

        let mut segments = self.segments.clone();
        let pruned = remaining.is_empty() && segments.len() > 1;
        if pruned {
            segments.remove(index);
        } else {
            segments.set(index, remaining);
        }

        Ok((Self { segments }, SegmentRemoval { index, pruned }))
    }
}
