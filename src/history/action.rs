//! Action records: one per user-visible mutation.
//!
//! Each variant stores exactly what is needed to reverse it. Reversal
//! itself lives with the controller, which matches on these exhaustively.

use serde::{Deserialize, Serialize};

use crate::core::CityId;
use crate::deck::{Container, DrawSource};

/// A recorded, reversible deck mutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionRecord {
    /// One card moved from `source` to the discard pile.
    Draw {
        city: CityId,
        /// Pile the card was taken from, as addressed before removal.
        source: DrawSource,
        /// The source segment emptied and was removed.
        pruned: bool,
    },

    /// One card removed from play without passing through discard.
    Destroy {
        city: CityId,
        container: Container,
        /// Count of `city` in `container` before the destroy.
        was_count: u32,
        /// The source segment emptied and was removed.
        pruned: bool,
    },

    /// The discard pile became a new top segment.
    Shuffle {
        /// The stack held only an empty segment, which the new one replaced.
        replaced_empty: bool,
    },
}

impl ActionRecord {
    /// The label hosts display for this record.
    #[must_use]
    pub fn label(&self) -> ActionLabel {
        match self {
            ActionRecord::Draw { .. } => ActionLabel::Draw,
            ActionRecord::Destroy { .. } => ActionLabel::Destroy,
            ActionRecord::Shuffle { .. } => ActionLabel::Shuffle,
        }
    }

    /// The city this record moved, if it moved a single card.
    #[must_use]
    pub fn city(&self) -> Option<&CityId> {
        match self {
            ActionRecord::Draw { city, .. } | ActionRecord::Destroy { city, .. } => Some(city),
            ActionRecord::Shuffle { .. } => None,
        }
    }
}

/// Tag of the most recent action, or `None` when history is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLabel {
    #[default]
    None,
    Draw,
    Destroy,
    Shuffle,
}

impl ActionLabel {
    /// Lowercase name of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionLabel::None => "none",
            ActionLabel::Draw => "draw",
            ActionLabel::Destroy => "destroy",
            ActionLabel::Shuffle => "shuffle",
        }
    }
}

impl std::fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
