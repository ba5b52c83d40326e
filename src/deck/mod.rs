//! The deck model: layered knowledge of an unseen deck.
//!
//! The deck is a stack of count multisets. Index 0 is the bottom (the
//! oldest knowledge); the last index is the top, which is drawn from first.
//! Each shuffle of the discard pile pushes a new layer on top.
//!
//! ## Key Types
//!
//! - `DeckSegmentStack`: the ordered layers
//! - `SegmentRemoval`: which layer a card came out of, for undo
//! - `DrawSource` / `Container`: how operations address a pile

pub mod location;
pub mod segments;

pub use location::{Container, DrawSource};
pub use segments::{DeckSegmentStack, SegmentRemoval};
