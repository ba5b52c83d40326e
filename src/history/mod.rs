//! Reversible action history.
//!
//! Every successful mutation of the deck pushes exactly one
//! [`ActionRecord`]; every undo pops exactly one. There is no redo: a popped
//! record is dropped for good.
//!
//! The "last action" label shown by hosts is never stored. It is read off
//! the top of the history with [`ActionHistory::last_label`].

pub mod action;
pub mod log;

pub use action::{ActionLabel, ActionRecord};
pub use log::ActionHistory;
