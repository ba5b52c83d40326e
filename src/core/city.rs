//! City card identification.
//!
//! A city card is identified by its printed name. Names are interned in an
//! `Arc<str>` so that the persistent maps holding counts can clone keys in
//! O(1) when snapshots diverge.
//!
//! ## Usage
//!
//! ```
//! use city_deck::core::CityId;
//!
//! let atlanta = CityId::new("Atlanta");
//! assert_eq!(atlanta.name(), "Atlanta");
//! assert_eq!(atlanta, CityId::from("Atlanta"));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier for a city card type.
///
/// Ordering is lexicographic by name, which is also the order in which
/// counts are listed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(Arc<str>);

impl CityId {
    /// Create a city identifier from its name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Get the city name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CityId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CityId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for CityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
