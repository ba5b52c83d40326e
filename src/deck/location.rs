//! Addressing of the piles a card can be taken from.

use serde::{Deserialize, Serialize};

/// A pile a card can be drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawSource {
    /// A known segment, by index (0 = bottom).
    Segment(usize),
    /// The pile of cards with unknown position.
    Undrawn,
}

/// Any pile a card can be destroyed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    /// A known segment, by index (0 = bottom).
    Segment(usize),
    /// The pile of cards with unknown position.
    Undrawn,
    /// The discard pile.
    Discard,
}

impl From<DrawSource> for Container {
    fn from(source: DrawSource) -> Self {
        match source {
            DrawSource::Segment(index) => Container::Segment(index),
            DrawSource::Undrawn => Container::Undrawn,
        }
    }
}

impl std::fmt::Display for DrawSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Container::from(*self).fmt(f)
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Segment(index) => write!(f, "Segment({})", index),
            Container::Undrawn => f.write_str("Undrawn"),
            Container::Discard => f.write_str("Discard"),
        }
    }
}
