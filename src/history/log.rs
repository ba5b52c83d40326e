//! Append/pop-only log of action records.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{ActionLabel, ActionRecord};

/// LIFO history of applied actions, oldest first.
///
/// Uses `im::Vector` so a snapshot of the controller shares the history
/// instead of copying it.
///
/// ## Example
///
/// ```
/// use city_deck::history::{ActionHistory, ActionLabel, ActionRecord};
///
/// let mut history = ActionHistory::new();
/// assert_eq!(history.last_label(), ActionLabel::None);
///
/// history.push(ActionRecord::Shuffle { replaced_empty: false });
/// assert_eq!(history.last_label(), ActionLabel::Shuffle);
///
/// assert_eq!(history.pop(), Some(ActionRecord::Shuffle { replaced_empty: false }));
/// assert!(history.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistory {
    records: Vector<ActionRecord>,
}

impl ActionHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action.
    pub fn push(&mut self, record: ActionRecord) {
        self.records.push_back(record);
    }

    /// Remove and return the most recent action.
    pub fn pop(&mut self) -> Option<ActionRecord> {
        self.records.pop_back()
    }

    /// Most recent action, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ActionRecord> {
        self.records.last()
    }

    /// Label of the most recent action.
    #[must_use]
    pub fn last_label(&self) -> ActionLabel {
        self.peek().map_or(ActionLabel::None, ActionRecord::label)
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no actions are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActionRecord> + '_ {
        self.records.iter()
    }
}
