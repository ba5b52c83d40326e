//! Error types for deck operations.
//!
//! Every rejected operation leaves the deck untouched and reports one of
//! these errors. [`DeckError::kind`] collapses them into the two kinds a
//! host needs to distinguish: caller mistakes and internal desyncs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::city::CityId;

/// Coarse classification of a [`DeckError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The caller asked for something the current state does not allow.
    InvalidOperation,
    /// The history referred to a segment that is not there.
    ///
    /// Indicates a bookkeeping bug, never a user error.
    EmptyStack,
}

/// Errors returned by deck operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Adjusting a count would take it below zero.
    #[error("count of {city} would become negative ({count} {delta:+})")]
    NegativeCount { city: CityId, count: u32, delta: i64 },

    /// Adjusting a count would take it past `u32::MAX`.
    #[error("count of {city} would overflow ({count} {delta:+})")]
    CountOverflow { city: CityId, count: u32, delta: i64 },

    /// A segment index past the top of the stack was addressed.
    #[error("segment index {index} out of range for {len} segments")]
    SegmentOutOfRange { index: usize, len: usize },

    /// A draw addressed a segment below the top one.
    #[error("segment {index} is not the top segment (top is {top})")]
    NotTopSegment { index: usize, top: usize },

    /// A draw addressed the undrawn pile while known cards sit above it.
    #[error("undrawn pile is covered by known segments")]
    UndrawnNotReachable,

    /// The undrawn pile was addressed in a layout that has none.
    #[error("deck has no undrawn pile")]
    NoUndrawnPile,

    /// Draws move cards into the discard pile, never out of it.
    #[error("cannot draw from the discard pile")]
    CannotDrawFromDiscard,

    /// Shuffle was requested with nothing in the discard pile.
    #[error("discard pile is empty")]
    EmptyDiscard,

    /// The segment stack was empty when history said it could not be.
    #[error("segment stack is empty")]
    EmptyStack,

    /// The deck configuration could not be used.
    #[error("invalid deck configuration: {0}")]
    InvalidConfig(String),
}

impl DeckError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeckError::EmptyStack => ErrorKind::EmptyStack,
            DeckError::NegativeCount { .. }
            | DeckError::CountOverflow { .. }
            | DeckError::SegmentOutOfRange { .. }
            | DeckError::NotTopSegment { .. }
            | DeckError::UndrawnNotReachable
            | DeckError::NoUndrawnPile
            | DeckError::CannotDrawFromDiscard
            | DeckError::EmptyDiscard
            | DeckError::InvalidConfig(_) => ErrorKind::InvalidOperation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(DeckError::EmptyStack.kind(), ErrorKind::EmptyStack);
        assert_eq!(DeckError::EmptyDiscard.kind(), ErrorKind::InvalidOperation);
        let overflow = DeckError::CountOverflow {
            city: CityId::new("Cairo"),
            count: u32::MAX,
            delta: 1,
        };
        assert_eq!(overflow.kind(), ErrorKind::InvalidOperation);
        assert_eq!(
            DeckError::SegmentOutOfRange { index: 3, len: 1 }.kind(),
            ErrorKind::InvalidOperation
        );
    }

    #[test]
    fn test_display() {
        let err = DeckError::NegativeCount {
            city: CityId::new("Atlanta"),
            count: 0,
            delta: -1,
        };
        assert_eq!(err.to_string(), "count of Atlanta would become negative (0 -1)");

        let err = DeckError::SegmentOutOfRange { index: 2, len: 1 };
        assert_eq!(err.to_string(), "segment index 2 out of range for 1 segments");
    }
}
