//! Deck configuration types.
//!
//! Hosts configure a deck at startup by providing:
//! - `CityConfig`: one card type and how many copies the deck holds
//! - `DeckLayout`: where those cards start
//! - `DeckConfig`: the whole table plus layout
//!
//! The static deck table used by hosts is a JSON object keyed by city name:
//!
//! ```json
//! {
//!   "Atlanta": { "city": "Atlanta", "count": 3, "color": "blue" },
//!   "Cairo":   { "city": "Cairo",   "count": 2 }
//! }
//! ```
//!
//! The color tag is display-only. The deck core never reads it; hosts that
//! group by color look it up through [`CityRegistry`].

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::city::CityId;
use super::error::DeckError;
use super::multiset::CountMultiset;

/// Where the configured cards start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckLayout {
    /// The whole deck is one known segment. There is no undrawn pile.
    #[default]
    Segmented,
    /// The whole deck starts in the undrawn pile; the segment stack is empty.
    UndrawnPile,
}

/// Configuration for a single city card type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    /// City name.
    pub city: CityId,

    /// Copies of this card in a fresh deck.
    pub count: u32,

    /// Grouping tag used by hosts for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CityConfig {
    /// Create a city configuration.
    pub fn new(city: impl Into<CityId>, count: u32) -> Self {
        Self {
            city: city.into(),
            count,
            color: None,
        }
    }

    /// Set the color tag.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Complete deck configuration.
///
/// ## Example
///
/// ```
/// use city_deck::core::{CityConfig, DeckConfig, DeckLayout};
///
/// let config = DeckConfig::new()
///     .with_city(CityConfig::new("Atlanta", 3))
///     .with_city(CityConfig::new("Chicago", 3))
///     .with_layout(DeckLayout::UndrawnPile);
///
/// assert_eq!(config.total_cards(), 6);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// City card types in the deck.
    pub cities: Vec<CityConfig>,

    /// Where the cards start.
    pub layout: DeckLayout,
}

impl DeckConfig {
    /// Create an empty configuration with the default layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a city card type.
    #[must_use]
    pub fn with_city(mut self, city: CityConfig) -> Self {
        self.cities.push(city);
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: DeckLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Parse a static deck table.
    ///
    /// Each key must match the `city` field of its entry. The result uses
    /// the default layout; chain [`DeckConfig::with_layout`] to change it.
    pub fn from_json(json: &str) -> Result<Self, DeckError> {
        let table: BTreeMap<String, CityConfig> =
            serde_json::from_str(json).map_err(|e| DeckError::InvalidConfig(e.to_string()))?;

        let mut cities = Vec::with_capacity(table.len());
        for (key, entry) in table {
            if key != entry.city.name() {
                return Err(DeckError::InvalidConfig(format!(
                    "key {:?} does not match city {:?}",
                    key,
                    entry.city.name()
                )));
            }
            cities.push(entry);
        }

        Ok(Self {
            cities,
            layout: DeckLayout::default(),
        })
    }

    /// All configured cards as one multiset. Repeated cities are summed.
    ///
    /// Returns `DeckError::CountOverflow` if a summed count does not fit.
    pub fn to_multiset(&self) -> Result<CountMultiset, DeckError> {
        CountMultiset::try_from_counts(self.cities.iter().map(|c| (c.city.clone(), c.count)))
    }

    /// Total number of cards in a fresh deck.
    #[must_use]
    pub fn total_cards(&self) -> u64 {
        self.cities.iter().map(|c| u64::from(c.count)).sum()
    }

    /// Build the color lookup for this deck.
    #[must_use]
    pub fn registry(&self) -> CityRegistry {
        let mut registry = CityRegistry::new();
        for city in &self.cities {
            if let Some(color) = &city.color {
                registry.register(city.city.clone(), color.clone());
            }
        }
        registry
    }
}

/// Lookup of display color tags by city.
#[derive(Clone, Debug, Default)]
pub struct CityRegistry {
    colors: FxHashMap<CityId, String>,
}

impl CityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the color of a city, replacing any earlier one.
    pub fn register(&mut self, city: CityId, color: String) {
        self.colors.insert(city, color);
    }

    /// Get the color of a city.
    #[must_use]
    pub fn color_of(&self, city: &CityId) -> Option<&str> {
        self.colors.get(city).map(String::as_str)
    }

    /// Cities tagged with `color`, in ascending order.
    #[must_use]
    pub fn cities_with_color(&self, color: &str) -> Vec<CityId> {
        let mut cities: Vec<_> = self
            .colors
            .iter()
            .filter(|(_, c)| c.as_str() == color)
            .map(|(city, _)| city.clone())
            .collect();
        cities.sort();
        cities
    }

    /// Number of cities with a color.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if no colors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "Atlanta": { "city": "Atlanta", "count": 3, "color": "blue" },
        "Cairo": { "city": "Cairo", "count": 2, "color": "black" },
        "Lagos": { "city": "Lagos", "count": 1 }
    }"#;

    #[test]
    fn test_config_builder() {
        let config = DeckConfig::new()
            .with_city(CityConfig::new("Atlanta", 3).with_color("blue"))
            .with_layout(DeckLayout::UndrawnPile);

        assert_eq!(config.cities.len(), 1);
        assert_eq!(config.cities[0].color.as_deref(), Some("blue"));
        assert_eq!(config.layout, DeckLayout::UndrawnPile);
    }

    #[test]
    fn test_default_layout() {
        assert_eq!(DeckConfig::new().layout, DeckLayout::Segmented);
    }

    #[test]
    fn test_from_json() {
        let config = DeckConfig::from_json(TABLE).unwrap();

        assert_eq!(config.cities.len(), 3);
        assert_eq!(config.total_cards(), 6);
        assert_eq!(config.to_multiset().unwrap().count(&CityId::new("Atlanta")), 3);
        assert_eq!(config.layout, DeckLayout::Segmented);
    }

    #[test]
    fn test_from_json_key_mismatch() {
        let err = DeckConfig::from_json(r#"{ "Atlanta": { "city": "Chicago", "count": 3 } }"#)
            .unwrap_err();
        assert!(matches!(err, DeckError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = DeckConfig::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, DeckError::InvalidConfig(_)));
    }

    #[test]
    fn test_repeated_cities_sum() {
        let config = DeckConfig::new()
            .with_city(CityConfig::new("Cairo", 2))
            .with_city(CityConfig::new("Cairo", 1));

        assert_eq!(config.to_multiset().unwrap().count(&CityId::new("Cairo")), 3);
    }

    #[test]
    fn test_repeated_cities_overflow() {
        let config = DeckConfig::new()
            .with_city(CityConfig::new("Cairo", u32::MAX))
            .with_city(CityConfig::new("Cairo", 1));

        let err = config.to_multiset().unwrap_err();
        assert!(matches!(err, DeckError::CountOverflow { .. }));
    }

    #[test]
    fn test_registry() {
        let registry = DeckConfig::from_json(TABLE).unwrap().registry();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.color_of(&CityId::new("Atlanta")), Some("blue"));
        assert_eq!(registry.color_of(&CityId::new("Lagos")), None);
        assert_eq!(registry.cities_with_color("black"), vec![CityId::new("Cairo")]);
    }
}
