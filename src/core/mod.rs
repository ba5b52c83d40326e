//! Core deck types: city identifiers, count multisets, errors, configuration.
//!
//! This module contains the building blocks every pile is made of. Hosts
//! configure a deck through `DeckConfig` rather than building piles by hand.

pub mod city;
pub mod config;
pub mod error;
pub mod multiset;

pub use city::CityId;
pub use config::{CityConfig, CityRegistry, DeckConfig, DeckLayout};
pub use error::{DeckError, ErrorKind};
pub use multiset::CountMultiset;
