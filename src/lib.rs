//! # city-deck
//!
//! Card counting for a cooperative city-card deck with exact undo.
//!
//! ## Design Principles
//!
//! 1. **Layered Knowledge**: The unseen deck is a stack of count multisets.
//!    Each shuffle of the discard pile adds a layer on top; draws always come
//!    from the top layer.
//!
//! 2. **Exact Undo**: Every mutation pushes one record holding just enough
//!    to reverse it. Undo pops one record. There is no redo.
//!
//! 3. **All or Nothing**: Operations validate before committing. A rejected
//!    call changes no pile and records nothing.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so each
//!   operation builds a new state and snapshots never alias.
//!
//! - **Single Owner**: One `DeckController` owns the piles and history of a
//!   session. Nothing is global.
//!
//! ## Modules
//!
//! - `core`: City IDs, count multisets, errors, configuration
//! - `deck`: Segment stack and pile addressing
//! - `history`: Action records and the undo log
//! - `controller`: The deck controller and state snapshots
//! - `odds`: Draw probabilities over a snapshot

pub mod core;
pub mod deck;
pub mod history;
pub mod controller;
pub mod odds;

// Re-export commonly used types
pub use crate::core::{
    CityId, CountMultiset,
    CityConfig, CityRegistry, DeckConfig, DeckLayout,
    DeckError, ErrorKind,
};

pub use crate::deck::{DeckSegmentStack, SegmentRemoval, DrawSource, Container};

pub use crate::history::{ActionHistory, ActionLabel, ActionRecord};

pub use crate::controller::{DeckController, DeckState, StateSnapshot};
