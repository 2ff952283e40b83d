//! Abacus configuration.
//!
//! Plain data with serde defaults, so a host can hand over a partial JSON
//! document and get sensible values for everything it left out.
//!
//! ```ignore
//! let config = AbacusConfig::from_json(r#"{ "rods": 5, "showNumerals": true }"#)?;
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{AbacusValue, rods_for};
use crate::error::{AbacusError, Result};
use crate::layout::{LayoutConfig, LayoutOptions};
use crate::state::GestureConfig;
use crate::style::ColorScheme;

// =============================================================================
// Rod Count
// =============================================================================

/// How many rods the abacus shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RodCount {
    /// As many rods as the value has digits (at least one).
    #[default]
    Auto,
    Fixed(usize),
}

impl RodCount {
    /// Rods needed to show `value` under this setting.
    ///
    /// `Auto` never shrinks below `current`, so rods do not vanish while the
    /// user is working on them.
    pub fn resolve(self, value: &AbacusValue, current: usize) -> Result<usize> {
        match self {
            Self::Fixed(0) => Err(AbacusError::InvalidRodCount(0)),
            Self::Fixed(n) => Ok(n),
            Self::Auto => Ok(rods_for(value).max(current).max(1)),
        }
    }
}

/// Wire form: a rod count number or the string `"auto"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RodCountRepr {
    Fixed(usize),
    Named(String),
}

impl Serialize for RodCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for RodCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match RodCountRepr::deserialize(deserializer)? {
            RodCountRepr::Fixed(n) => Ok(Self::Fixed(n)),
            RodCountRepr::Named(name) if name == "auto" => Ok(Self::Auto),
            RodCountRepr::Named(name) => Err(D::Error::custom(format!(
                "expected rod count or \"auto\", got {:?}",
                name
            ))),
        }
    }
}

// =============================================================================
// Abacus Config
// =============================================================================

/// Display and interaction settings for one abacus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AbacusConfig {
    pub rods: RodCount,
    pub scale_factor: f32,
    pub show_numerals: bool,
    pub hide_inactive_beads: bool,
    /// Draw zero rods above the highest non-zero digit.
    pub show_empty_columns: bool,
    pub color_scheme: ColorScheme,
    /// Tint numeral labels with the colour scheme.
    pub colored_numerals: bool,
    /// Clicking a bead toggles it.
    pub click_enabled: bool,
    /// Dragging a bead moves it.
    pub gestures_enabled: bool,
    pub layout: LayoutConfig,
    pub gesture: GestureConfig,
}

impl Default for AbacusConfig {
    fn default() -> Self {
        Self {
            rods: RodCount::Auto,
            scale_factor: 1.0,
            show_numerals: false,
            hide_inactive_beads: false,
            show_empty_columns: true,
            color_scheme: ColorScheme::Monochrome,
            colored_numerals: false,
            click_enabled: true,
            gestures_enabled: true,
            layout: LayoutConfig::default(),
            gesture: GestureConfig::default(),
        }
    }
}

impl AbacusConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.scale_factor <= 0.0 || !config.scale_factor.is_finite() {
            log::warn!(
                "scale factor {} is not positive, using 1.0",
                config.scale_factor
            );
            return Ok(Self {
                scale_factor: 1.0,
                ..config
            });
        }
        Ok(config)
    }

    /// Layout switches derived from this config.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            scale_factor: self.scale_factor,
            show_numerals: self.show_numerals,
            hide_inactive_beads: self.hide_inactive_beads,
            show_empty_columns: self.show_empty_columns,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = AbacusConfig::from_json("{}").unwrap();
        assert_eq!(config, AbacusConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = AbacusConfig::from_json(
            r#"{ "rods": 5, "showNumerals": true, "colorScheme": "place-value", "gesture": { "clickGuardMs": 250 } }"#,
        )
        .unwrap();

        assert_eq!(config.rods, RodCount::Fixed(5));
        assert!(config.show_numerals);
        assert_eq!(config.color_scheme, ColorScheme::PlaceValue);
        assert_eq!(config.gesture.click_guard_ms, 250);
        assert_eq!(config.gesture.threshold_fraction, 0.3);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_column_and_numeral_flags() {
        let config =
            AbacusConfig::from_json(r#"{ "showEmptyColumns": false, "coloredNumerals": true }"#)
                .unwrap();
        assert!(config.colored_numerals);
        assert!(!config.layout_options().show_empty_columns);
        assert!(AbacusConfig::default().layout_options().show_empty_columns);
    }

    #[test]
    fn test_auto_rods_json() {
        let config = AbacusConfig::from_json(r#"{ "rods": "auto" }"#).unwrap();
        assert_eq!(config.rods, RodCount::Auto);
        assert!(AbacusConfig::from_json(r#"{ "rods": "many" }"#).is_err());
    }

    #[test]
    fn test_bad_scale_falls_back() {
        let config = AbacusConfig::from_json(r#"{ "scaleFactor": -2.0 }"#).unwrap();
        assert_eq!(config.scale_factor, 1.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AbacusConfig::from_json("{ nope"),
            Err(AbacusError::Config(_))
        ));
    }

    #[test]
    fn test_rod_count_resolve() {
        let value = AbacusValue::from(12345u64);
        assert_eq!(RodCount::Fixed(7).resolve(&value, 1).unwrap(), 7);
        assert_eq!(RodCount::Auto.resolve(&value, 1).unwrap(), 5);
        assert_eq!(RodCount::Auto.resolve(&value, 8).unwrap(), 8);
        assert_eq!(RodCount::Auto.resolve(&AbacusValue::zero(), 0).unwrap(), 1);
        assert!(RodCount::Fixed(0).resolve(&value, 1).is_err());
    }
}
