//! The deck controller: the only way to change a deck.
//!
//! A `DeckController` owns the piles and the action history of one session.
//! It accepts four operations, each of which either commits a new state and
//! pushes one history record, or fails and changes nothing:
//!
//! - `draw`: a card moves from the top of the deck to the discard pile
//! - `destroy`: a card leaves play entirely
//! - `shuffle_discard`: the discard pile becomes a new top segment
//! - `undo`: the most recent of the above is reversed exactly
//!
//! `draw_bottom` is a draw from the bottom of the deck, used when an
//! epidemic pulls the bottom card. It is recorded and undone like any draw.
//!
//! ## Example
//!
//! ```
//! use city_deck::controller::DeckController;
//! use city_deck::core::{CityConfig, CityId, DeckConfig};
//! use city_deck::deck::DrawSource;
//! use city_deck::history::ActionLabel;
//!
//! let config = DeckConfig::new()
//!     .with_city(CityConfig::new("Atlanta", 3))
//!     .with_city(CityConfig::new("Chicago", 3));
//! let mut deck = DeckController::new(&config).unwrap();
//! let atlanta = CityId::new("Atlanta");
//!
//! let snapshot = deck.draw(&atlanta, DrawSource::Segment(0)).unwrap();
//! assert_eq!(snapshot.discard.count(&atlanta), 1);
//! assert_eq!(snapshot.last_action, ActionLabel::Draw);
//!
//! let snapshot = deck.undo();
//! assert!(snapshot.discard.is_empty());
//! assert_eq!(snapshot.last_action, ActionLabel::None);
//! ```
//!
//! A controller is a plain value with `&mut self` operations. Hosts that
//! share one across threads must serialize access to it.

mod state;

pub use state::{DeckState, StateSnapshot};

use tracing::{debug, error, warn};

use crate::core::{CityId, DeckConfig, DeckError};
use crate::deck::{Container, DrawSource};
use crate::history::{ActionHistory, ActionLabel, ActionRecord};

/// Owner of one deck's piles and history.
#[derive(Clone, Debug)]
pub struct DeckController {
    state: DeckState,
    history: ActionHistory,
    initial_total: u64,
}

impl DeckController {
    /// Create a controller for a fresh deck.
    ///
    /// Fails with `DeckError::CountOverflow` if the configuration repeats a
    /// city with counts summing past `u32::MAX`.
    pub fn new(config: &DeckConfig) -> Result<Self, DeckError> {
        DeckState::from_config(config)
            .map(Self::from_state)
            .map_err(|err| rejected("new", err))
    }

    /// Create a controller starting from an arbitrary state.
    ///
    /// The state's card total becomes the baseline for
    /// [`DeckController::destroyed_count`].
    #[must_use]
    pub fn from_state(state: DeckState) -> Self {
        let initial_total = state.total();
        Self {
            state,
            history: ActionHistory::new(),
            initial_total,
        }
    }

    // === Operations ===

    /// Draw one `city` from `source` into the discard pile.
    ///
    /// `source` must be the top segment, or the undrawn pile when every
    /// known segment is empty.
    pub fn draw(
        &mut self,
        city: &CityId,
        source: DrawSource,
    ) -> Result<StateSnapshot, DeckError> {
        self.check_draw_source(source)
            .and_then(|()| self.apply_draw(city, source))
            .map_err(|err| rejected("draw", err))
    }

    /// Draw one `city` from the bottom of the deck into the discard pile.
    ///
    /// The bottom is the undrawn pile while it holds cards, otherwise the
    /// lowest non-empty known segment.
    pub fn draw_bottom(&mut self, city: &CityId) -> Result<StateSnapshot, DeckError> {
        let source = if self.state.has_undrawn_cards() {
            DrawSource::Undrawn
        } else {
            let lowest = self.state.segments.iter().position(|s| !s.is_empty());
            DrawSource::Segment(lowest.unwrap_or(0))
        };
        self.apply_draw(city, source).map_err(|err| rejected("draw_bottom", err))
    }

    /// Remove one `city` from play without discarding it.
    pub fn destroy(
        &mut self,
        city: &CityId,
        container: Container,
    ) -> Result<StateSnapshot, DeckError> {
        let (next, taken) = self
            .state
            .take(container, city)
            .map_err(|err| rejected("destroy", err))?;

        debug!(city = %city, container = %container, was_count = taken.was_count, "destroy");
        Ok(self.commit(
            next,
            ActionRecord::Destroy {
                city: city.clone(),
                container,
                was_count: taken.was_count,
                pruned: taken.pruned,
            },
        ))
    }

    /// Move the whole discard pile onto the deck as a new top segment.
    ///
    /// If the deck is down to its one emptied segment, the discard replaces
    /// it rather than landing on top of it.
    ///
    /// Fails with `DeckError::EmptyDiscard` if there is nothing to shuffle.
    pub fn shuffle_discard(&mut self) -> Result<StateSnapshot, DeckError> {
        if self.state.discard.is_empty() {
            return Err(rejected("shuffle_discard", DeckError::EmptyDiscard));
        }

        let mut next = self.state.clone();
        let (segments, replaced_empty) = self.state.segments.shuffle_in(self.state.discard.clone());
        next.segments = segments;
        next.discard = Default::default();

        debug!(
            cards = self.state.discard.total(),
            segments = next.segments.len(),
            replaced_empty,
            "shuffle discard"
        );
        Ok(self.commit(next, ActionRecord::Shuffle { replaced_empty }))
    }

    /// Reverse the most recent action.
    ///
    /// With an empty history this is a no-op returning the current snapshot.
    /// If the history no longer matches the piles, the desync is logged at
    /// error level and the unchanged snapshot is returned; use
    /// [`DeckController::try_undo`] to observe it.
    pub fn undo(&mut self) -> StateSnapshot {
        match self.try_undo() {
            Ok(snapshot) => snapshot,
            // Logged by try_undo
            Err(_) => self.snapshot(),
        }
    }

    /// Reverse the most recent action, reporting a history desync.
    ///
    /// An error means the history no longer matches the piles; state and
    /// history are left as they were.
    pub fn try_undo(&mut self) -> Result<StateSnapshot, DeckError> {
        let Some(record) = self.history.peek() else {
            debug!("undo with empty history");
            return Ok(self.snapshot());
        };

        let next = self.state.reverse(record).map_err(|err| {
            error!(error = %err, record = ?record, "history out of sync with deck state");
            err
        })?;

        self.state = next;
        let undone = self.history.pop();
        debug!(undone = ?undone, remaining = self.history.len(), "undo");
        Ok(self.snapshot())
    }

    // === Queries ===

    /// Current piles, history length and last action.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            segments: self.state.segments.clone(),
            discard: self.state.discard.clone(),
            undrawn: self.state.undrawn.clone(),
            last_action: self.history.last_label(),
            history_len: self.history.len(),
        }
    }

    /// Current piles.
    #[must_use]
    pub fn state(&self) -> &DeckState {
        &self.state
    }

    /// Recorded actions.
    #[must_use]
    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    /// Label of the most recent action still in history.
    #[must_use]
    pub fn last_action(&self) -> ActionLabel {
        self.history.last_label()
    }

    /// Number of actions that can be undone.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Cards in play when the controller was created.
    #[must_use]
    pub fn initial_total(&self) -> u64 {
        self.initial_total
    }

    /// Cards currently in play across every pile.
    #[must_use]
    pub fn total_in_play(&self) -> u64 {
        self.state.total()
    }

    /// Cards destroyed and not restored by undo.
    #[must_use]
    pub fn destroyed_count(&self) -> u64 {
        self.initial_total.saturating_sub(self.state.total())
    }

    // === Internals ===

    fn check_draw_source(&self, source: DrawSource) -> Result<(), DeckError> {
        let segments = &self.state.segments;
        match source {
            DrawSource::Segment(index) => match segments.top_index() {
                Some(top) if index == top => Ok(()),
                Some(top) if index < top => Err(DeckError::NotTopSegment { index, top }),
                _ => Err(DeckError::SegmentOutOfRange {
                    index,
                    len: segments.len(),
                }),
            },
            DrawSource::Undrawn => {
                if self.state.undrawn.is_none() {
                    Err(DeckError::NoUndrawnPile)
                } else if !segments.all_empty() {
                    Err(DeckError::UndrawnNotReachable)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn apply_draw(
        &mut self,
        city: &CityId,
        source: DrawSource,
    ) -> Result<StateSnapshot, DeckError> {
        let (mut next, taken) = self.state.take(source.into(), city)?;
        next.discard = next.discard.increment(city, 1)?;

        debug!(city = %city, source = %source, pruned = taken.pruned, "draw");
        Ok(self.commit(
            next,
            ActionRecord::Draw {
                city: city.clone(),
                source,
                pruned: taken.pruned,
            },
        ))
    }

    fn commit(&mut self, next: DeckState, record: ActionRecord) -> StateSnapshot {
        self.state = next;
        self.history.push(record);
        self.snapshot()
    }
}

fn rejected(operation: &'static str, err: DeckError) -> DeckError {
    warn!(operation, error = %err, "deck operation rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CityConfig, CountMultiset, DeckLayout};
    use crate::deck::DeckSegmentStack;

    fn city(name: &str) -> CityId {
        CityId::new(name)
    }

    fn seg(counts: &[(&str, u32)]) -> CountMultiset {
        CountMultiset::from_counts(counts.iter().map(|&(c, n)| (c, n)))
    }

    fn segmented() -> DeckController {
        DeckController::new(
            &DeckConfig::new()
                .with_city(CityConfig::new("Atlanta", 3))
                .with_city(CityConfig::new("Chicago", 3)),
        )
        .unwrap()
    }

    fn with_undrawn() -> DeckController {
        DeckController::new(
            &DeckConfig::new()
                .with_city(CityConfig::new("Atlanta", 2))
                .with_city(CityConfig::new("Chicago", 1))
                .with_layout(DeckLayout::UndrawnPile),
        )
        .unwrap()
    }

    #[test]
    fn test_draw_moves_to_discard() {
        let mut deck = segmented();
        let snapshot = deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();

        assert_eq!(snapshot.segments.top_segment(), seg(&[("Atlanta", 2), ("Chicago", 3)]));
        assert_eq!(snapshot.discard, seg(&[("Atlanta", 1)]));
        assert_eq!(snapshot.last_action, ActionLabel::Draw);
        assert_eq!(snapshot.history_len, 1);
    }

    #[test]
    fn test_draw_missing_city_rejected() {
        let mut deck = segmented();
        let before = deck.snapshot();

        let err = deck.draw(&city("Lagos"), DrawSource::Segment(0)).unwrap_err();
        assert!(matches!(err, DeckError::NegativeCount { .. }));
        assert_eq!(deck.snapshot(), before);
    }

    #[test]
    fn test_draw_below_top_rejected() {
        let mut deck = segmented();
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        deck.shuffle_discard().unwrap();

        let err = deck.draw(&city("Chicago"), DrawSource::Segment(0)).unwrap_err();
        assert_eq!(err, DeckError::NotTopSegment { index: 0, top: 1 });
        assert_eq!(deck.history_len(), 2);
    }

    #[test]
    fn test_draw_out_of_range() {
        let mut deck = segmented();
        let err = deck.draw(&city("Atlanta"), DrawSource::Segment(4)).unwrap_err();
        assert_eq!(err, DeckError::SegmentOutOfRange { index: 4, len: 1 });
    }

    #[test]
    fn test_draw_undrawn_without_pile() {
        let mut deck = segmented();
        let err = deck.draw(&city("Atlanta"), DrawSource::Undrawn).unwrap_err();
        assert_eq!(err, DeckError::NoUndrawnPile);
    }

    #[test]
    fn test_draw_undrawn_covered_by_known() {
        let mut deck = with_undrawn();
        deck.draw(&city("Atlanta"), DrawSource::Undrawn).unwrap();
        deck.shuffle_discard().unwrap();

        let err = deck.draw(&city("Atlanta"), DrawSource::Undrawn).unwrap_err();
        assert_eq!(err, DeckError::UndrawnNotReachable);

        // Drawing the known card uncovers the undrawn pile again
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        deck.draw(&city("Chicago"), DrawSource::Undrawn).unwrap();
    }

    #[test]
    fn test_draw_bottom_prefers_undrawn() {
        let mut deck = with_undrawn();
        deck.draw(&city("Atlanta"), DrawSource::Undrawn).unwrap();
        deck.shuffle_discard().unwrap();

        let snapshot = deck.draw_bottom(&city("Chicago")).unwrap();
        assert_eq!(snapshot.undrawn, Some(seg(&[("Atlanta", 1)])));
        assert_eq!(snapshot.segments.top_segment(), seg(&[("Atlanta", 1)]));
        assert_eq!(snapshot.discard, seg(&[("Chicago", 1)]));

        let snapshot = deck.undo();
        assert_eq!(snapshot.undrawn, Some(seg(&[("Atlanta", 1), ("Chicago", 1)])));
        assert_eq!(snapshot.last_action, ActionLabel::Shuffle);
    }

    #[test]
    fn test_draw_bottom_prunes_bottom_segment() {
        let mut deck = DeckController::from_state(DeckState {
            segments: DeckSegmentStack::from_segments([
                seg(&[("Cairo", 1)]),
                seg(&[("Lagos", 2)]),
            ]),
            ..DeckState::default()
        });

        let snapshot = deck.draw_bottom(&city("Cairo")).unwrap();
        assert_eq!(snapshot.segments, DeckSegmentStack::from_segment(seg(&[("Lagos", 2)])));

        let snapshot = deck.undo();
        assert_eq!(snapshot.segments.get(0), Some(&seg(&[("Cairo", 1)])));
        assert_eq!(snapshot.segments.len(), 2);
    }

    #[test]
    fn test_destroy_from_discard() {
        let mut deck = segmented();
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();

        let snapshot = deck.destroy(&city("Atlanta"), Container::Discard).unwrap();
        assert!(snapshot.discard.is_empty());
        assert_eq!(snapshot.last_action, ActionLabel::Destroy);
        assert_eq!(deck.destroyed_count(), 1);

        let snapshot = deck.undo();
        assert_eq!(snapshot.discard, seg(&[("Atlanta", 1)]));
        assert_eq!(deck.destroyed_count(), 0);
    }

    #[test]
    fn test_destroy_records_was_count() {
        let mut deck = segmented();
        deck.destroy(&city("Chicago"), Container::Segment(0)).unwrap();

        let record = deck.history().peek().cloned();
        assert_eq!(
            record,
            Some(ActionRecord::Destroy {
                city: city("Chicago"),
                container: Container::Segment(0),
                was_count: 3,
                pruned: false,
            })
        );
    }

    #[test]
    fn test_destroy_lower_segment_allowed() {
        let mut deck = segmented();
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        deck.shuffle_discard().unwrap();

        let snapshot = deck.destroy(&city("Chicago"), Container::Segment(0)).unwrap();
        assert_eq!(snapshot.segments.get(0), Some(&seg(&[("Atlanta", 2), ("Chicago", 2)])));
    }

    #[test]
    fn test_shuffle_empty_discard_rejected() {
        let mut deck = segmented();
        let err = deck.shuffle_discard().unwrap_err();

        assert_eq!(err, DeckError::EmptyDiscard);
        assert_eq!(deck.history_len(), 0);
        assert_eq!(deck.last_action(), ActionLabel::None);
    }

    #[test]
    fn test_undo_empty_history_is_noop() {
        let mut deck = segmented();
        let before = deck.snapshot();

        assert_eq!(deck.undo(), before);
        assert_eq!(deck.try_undo().unwrap(), before);
    }

    #[test]
    fn test_undo_desync_leaves_state() {
        let mut deck = segmented();
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        deck.shuffle_discard().unwrap();

        // Forge a desync: drop the segment the shuffle record refers to
        deck.state.segments = DeckSegmentStack::new();
        let before = deck.snapshot();

        let err = deck.try_undo().unwrap_err();
        assert_eq!(err, DeckError::EmptyStack);
        assert_eq!(deck.snapshot(), before);

        // The infallible form reports the same desync by leaving everything put
        assert_eq!(deck.undo(), before);
        assert_eq!(deck.history_len(), 2);
    }

    #[test]
    fn test_new_rejects_count_overflow() {
        let config = DeckConfig::new()
            .with_city(CityConfig::new("Atlanta", u32::MAX))
            .with_city(CityConfig::new("Atlanta", 1));

        let err = DeckController::new(&config).unwrap_err();
        assert!(matches!(err, DeckError::CountOverflow { .. }));
    }

    #[test]
    fn test_draw_into_full_discard_rejected() {
        let mut deck = DeckController::from_state(DeckState {
            segments: DeckSegmentStack::from_segment(seg(&[("Atlanta", 1)])),
            discard: seg(&[("Atlanta", u32::MAX)]),
            undrawn: None,
        });
        let before = deck.snapshot();

        let err = deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap_err();
        assert!(matches!(err, DeckError::CountOverflow { .. }));
        assert_eq!(deck.snapshot(), before);
        assert_eq!(deck.total_in_play(), u64::from(u32::MAX) + 1);

        // Nothing was recorded, so undo cannot lose the card
        assert_eq!(deck.undo(), before);
    }

    #[test]
    fn test_shuffle_replaces_drained_sole_segment() {
        let mut deck = DeckController::from_state(DeckState {
            segments: DeckSegmentStack::from_segment(seg(&[("Atlanta", 1)])),
            ..DeckState::default()
        });
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        assert!(deck.state().segments.all_empty());

        let snapshot = deck.shuffle_discard().unwrap();
        assert_eq!(snapshot.segments, DeckSegmentStack::from_segment(seg(&[("Atlanta", 1)])));
        assert_eq!(
            deck.history().peek(),
            Some(&ActionRecord::Shuffle { replaced_empty: true })
        );

        // The known card is drawable from the top again
        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        deck.undo();

        let snapshot = deck.undo();
        assert_eq!(snapshot.segments, DeckSegmentStack::from_segment(CountMultiset::new()));
        assert_eq!(snapshot.discard, seg(&[("Atlanta", 1)]));
    }

    #[test]
    fn test_totals() {
        let mut deck = segmented();
        assert_eq!(deck.initial_total(), 6);

        deck.draw(&city("Atlanta"), DrawSource::Segment(0)).unwrap();
        deck.destroy(&city("Chicago"), Container::Segment(0)).unwrap();

        assert_eq!(deck.total_in_play(), 5);
        assert_eq!(deck.destroyed_count(), 1);
    }
}
