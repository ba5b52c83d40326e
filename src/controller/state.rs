//! Deck state and the snapshots handed to hosts.
//!
//! ## DeckState
//!
//! The three kinds of pile the controller owns:
//! - Known segments (the layered deck)
//! - Discard pile
//! - Undrawn pile (only in the `UndrawnPile` layout)
//!
//! Every method returns a new state. Because all piles are persistent
//! values, a rejected operation simply drops the half-built state and the
//! committed one is never touched.
//!
//! ## StateSnapshot
//!
//! What a host renders after each call: the piles plus the last action label
//! and history length.

use serde::{Deserialize, Serialize};

use crate::core::{CityId, CountMultiset, DeckConfig, DeckError, DeckLayout};
use crate::deck::{Container, DeckSegmentStack, SegmentRemoval};
use crate::history::{ActionLabel, ActionRecord};

/// The piles owned by one controller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    /// Known segments, bottom first.
    pub segments: DeckSegmentStack,

    /// Cards discarded since the last shuffle.
    pub discard: CountMultiset,

    /// Cards with unknown position. `None` in the segmented layout.
    pub undrawn: Option<CountMultiset>,
}

/// Result of taking one card out of a pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Taken {
    /// Count of the city in the pile before removal.
    pub was_count: u32,
    /// The pile was a segment that emptied and was removed.
    pub pruned: bool,
}

impl DeckState {
    /// Build the initial state for a configuration.
    ///
    /// Fails with `DeckError::CountOverflow` if repeated cities sum past
    /// `u32::MAX`.
    pub fn from_config(config: &DeckConfig) -> Result<Self, DeckError> {
        let cards = config.to_multiset()?;
        let state = match config.layout {
            DeckLayout::Segmented => Self {
                segments: DeckSegmentStack::from_segment(cards),
                discard: CountMultiset::new(),
                undrawn: None,
            },
            DeckLayout::UndrawnPile => Self {
                segments: DeckSegmentStack::new(),
                discard: CountMultiset::new(),
                undrawn: Some(cards),
            },
        };
        Ok(state)
    }

    /// Total cards still in play across every pile.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.segments.total()
            + self.discard.total()
            + self.undrawn.as_ref().map_or(0, CountMultiset::total)
    }

    /// Count of `city` in `container`, or zero if the container does not exist.
    #[must_use]
    pub fn count_in(&self, container: Container, city: &CityId) -> u32 {
        match container {
            Container::Segment(index) => self.segments.get(index).map_or(0, |s| s.count(city)),
            Container::Undrawn => self.undrawn.as_ref().map_or(0, |u| u.count(city)),
            Container::Discard => self.discard.count(city),
        }
    }

    /// Check whether the undrawn pile exists and holds cards.
    #[must_use]
    pub fn has_undrawn_cards(&self) -> bool {
        self.undrawn.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Take one `city` out of `container`.
    pub(crate) fn take(
        &self,
        container: Container,
        city: &CityId,
    ) -> Result<(Self, Taken), DeckError> {
        let was_count = self.count_in(container, city);
        let mut next = self.clone();
        let mut pruned = false;

        match container {
            Container::Segment(index) => {
                let (segments, removal) = self.segments.destroy_at(index, city)?;
                next.segments = segments;
                pruned = removal.pruned;
            }
            Container::Undrawn => {
                let undrawn = self.undrawn.as_ref().ok_or(DeckError::NoUndrawnPile)?;
                next.undrawn = Some(undrawn.increment(city, -1)?);
            }
            Container::Discard => {
                next.discard = self.discard.increment(city, -1)?;
            }
        }

        Ok((next, Taken { was_count, pruned }))
    }

    /// Put one `city` back into `container`, re-inserting a pruned segment.
    pub(crate) fn put_back(
        &self,
        container: Container,
        city: &CityId,
        pruned: bool,
    ) -> Result<Self, DeckError> {
        let mut next = self.clone();
        match container {
            Container::Segment(index) => {
                next.segments = self.segments.restore(SegmentRemoval { index, pruned }, city)?;
            }
            Container::Undrawn => {
                let undrawn = self.undrawn.as_ref().ok_or(DeckError::NoUndrawnPile)?;
                next.undrawn = Some(undrawn.increment(city, 1)?);
            }
            Container::Discard => {
                next.discard = self.discard.increment(city, 1)?;
            }
        }
        Ok(next)
    }

    /// The state before `record` was applied.
    pub(crate) fn reverse(&self, record: &ActionRecord) -> Result<Self, DeckError> {
        match record {
            ActionRecord::Draw { city, source, pruned } => {
                let mut next = self.put_back((*source).into(), city, *pruned)?;
                next.discard = next.discard.increment(city, -1)?;
                Ok(next)
            }
            ActionRecord::Destroy {
                city,
                container,
                pruned,
                ..
            } => self.put_back(*container, city, *pruned),
            ActionRecord::Shuffle { replaced_empty } => {
                let (segments, top) = self.segments.unshuffle(*replaced_empty)?;
                Ok(Self {
                    segments,
                    discard: top,
                    undrawn: self.undrawn.clone(),
                })
            }
        }
    }
}

/// Everything a host needs to render the deck after a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Known segments, bottom first.
    pub segments: DeckSegmentStack,

    /// Discard pile.
    pub discard: CountMultiset,

    /// Undrawn pile, if the layout has one.
    pub undrawn: Option<CountMultiset>,

    /// Tag of the most recent action still in history.
    pub last_action: ActionLabel,

    /// Number of actions that can still be undone.
    pub history_len: usize,
}

impl StateSnapshot {
    /// Total cards in play in this snapshot.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.segments.total()
            + self.discard.total()
            + self.undrawn.as_ref().map_or(0, CountMultiset::total)
    }
}
