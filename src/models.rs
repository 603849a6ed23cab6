use std::{borrow::Cow, path::Path};

use parse_display::Display;
use serde_derive::{Deserialize, Serialize};
use strum_macros::EnumString;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::image::{Neighborhood, NeighborhoodError};

pub type Color = palette::Srgb<u8>;

/// Position relative to the top-left corner of a rasterized target
#[derive(Display, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("({x}, {y})")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RadiusUnit {
    /// `amount` is the (odd) width of the sampled square, in pixels
    Pixel,
    /// `amount` is the number of pixels sampled on each side of the center
    Radius,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_pick_radius"))]
pub struct PickRadius {
    pub unit: RadiusUnit,
    pub amount: u32,
}

impl PickRadius {
    pub fn new(unit: RadiusUnit, amount: u32) -> Self {
        Self { unit, amount }
    }

    pub fn pixel(amount: u32) -> Self {
        Self::new(RadiusUnit::Pixel, amount)
    }

    pub fn radius(amount: u32) -> Self {
        Self::new(RadiusUnit::Radius, amount)
    }

    pub fn neighborhood(&self) -> Result<Neighborhood, NeighborhoodError> {
        Neighborhood::new(self)
    }
}

fn validate_pick_radius(radius: &PickRadius) -> Result<(), ValidationError> {
    radius.neighborhood().map(|_| ()).map_err(|error| {
        let mut validation_error = ValidationError::new("pick_radius");
        validation_error.message = Some(Cow::Owned(error.to_string()));
        validation_error
    })
}

/// Channel order of the decimal `rgb(...)` encoding
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RgbChannelOrder {
    /// `rgb(R, B, G)`, the historical encoding
    Legacy,
    /// `rgb(R, G, B)`
    Standard,
}

impl Default for RgbChannelOrder {
    fn default() -> Self {
        Self::Legacy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PickerConfig {
    /// Pointer style while a pick is armed
    #[validate(length(min = 1))]
    pub cursor_active: String,
    /// Pointer style restored once the pick is over
    #[validate(length(min = 1))]
    pub cursor_inactive: String,
    /// Key under which the control exposes the last picked color
    pub pass_through: Option<String>,
    /// Key name which cancels an armed pick
    #[validate(length(min = 1))]
    pub cancel_key: String,
    pub rgb_channel_order: RgbChannelOrder,
    /// Neighborhood to blend around the click point. Single pixel if absent.
    #[validate(nested)]
    pub pick_radius: Option<PickRadius>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            cursor_active: "copy".to_owned(),
            cursor_inactive: "default".to_owned(),
            pass_through: None,
            cancel_key: "Escape".to_owned(),
            rgb_channel_order: RgbChannelOrder::default(),
            pick_radius: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("invalid pick radius: {0}")]
    Neighborhood(#[from] NeighborhoodError),
}

impl PickerConfig {
    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let full = tokio::fs::read_to_string(path).await?;
        let config: Self = full.parse()?;

        debug!(
            path = %path.display(),
            pick_radius = ?config.pick_radius,
            "loaded picker configuration"
        );

        Ok(config)
    }

    pub fn to_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolves the configured neighborhood, if any
    pub fn neighborhood(&self) -> Result<Option<Neighborhood>, NeighborhoodError> {
        self.pick_radius
            .as_ref()
            .map(PickRadius::neighborhood)
            .transpose()
    }
}

impl std::str::FromStr for PickerConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
