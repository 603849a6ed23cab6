//! Sample blending and color encodings

use parse_display::Display;
use serde_derive::{Deserialize, Serialize};

use crate::models::{Color, RgbChannelOrder};

/// Running blend accumulator
///
/// Every sample adds its squared channels to the accumulator. From the second sample on,
/// the accumulator is then replaced by `sqrt(acc / 2)`. Later samples therefore weigh more
/// than earlier ones: this is not a mean.
#[derive(Default, Debug, Clone, Copy)]
struct Blend {
    /// Accumulated channels
    acc: [f64; 3],
    /// Number of samples
    count: usize,
}

impl Blend {
    fn sample(&mut self, color: Color) {
        let (r, g, b) = color.into_components();

        for (acc, channel) in self.acc.iter_mut().zip([r, g, b]) {
            *acc += f64::from(channel).powi(2);

            if self.count > 0 {
                *acc = (*acc / 2.).sqrt();
            }
        }

        self.count += 1;
    }

    fn value(&self) -> Color {
        // Float to int casts truncate toward zero and saturate
        Color::new(self.acc[0] as u8, self.acc[1] as u8, self.acc[2] as u8)
    }
}

/// Blends an ordered set of samples into a single color
///
/// A single sample is returned unchanged. Returns `None` for an empty set.
pub fn aggregate(samples: &[Color]) -> Option<Color> {
    match samples {
        [] => None,
        [single] => Some(*single),
        samples => {
            let mut blend = Blend::default();

            for &sample in samples {
                blend.sample(sample);
            }

            Some(blend.value())
        }
    }
}

/// Decimal-channel encoding, `rgb(R, B, G)` in legacy order
pub fn rgb_string(color: Color, order: RgbChannelOrder) -> String {
    let (r, g, b) = color.into_components();

    match order {
        RgbChannelOrder::Legacy => format!("rgb({}, {}, {})", r, b, g),
        RgbChannelOrder::Standard => format!("rgb({}, {}, {})", r, g, b),
    }
}

/// `#rrggbb` encoding
pub fn hex_string(color: Color) -> String {
    let (r, g, b) = color.into_components();
    format!("#{}", hex::encode([r, g, b]))
}

/// Result of a completed pick
#[derive(Display, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[display("{hex}")]
pub struct PickedColor {
    #[serde(
        serialize_with = "crate::serde::serialize_color_as_array",
        deserialize_with = "crate::serde::deserialize_color_from_array"
    )]
    pub color: Color,
    pub rgb: String,
    pub hex: String,
}

impl PickedColor {
    pub fn new(color: Color, order: RgbChannelOrder) -> Self {
        Self {
            color,
            rgb: rgb_string(color, order),
            hex: hex_string(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_empty() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn aggregate_single_sample() {
        let sample = Color::new(10, 20, 30);

        assert_eq!(aggregate(&[sample]), Some(sample));
    }

    #[test]
    fn aggregate_two_samples() {
        let samples = [Color::new(255, 0, 0), Color::new(0, 0, 0)];

        // sqrt(255² / 2) = 180.31
        assert_eq!(aggregate(&samples), Some(Color::new(180, 0, 0)));
    }

    #[test]
    fn aggregate_is_order_dependent() {
        let a = Color::new(200, 100, 0);
        let b = Color::new(0, 100, 200);
        let c = Color::new(50, 50, 50);

        // ((200² + 0) / 2)^½ = 141.42, then ((141.42 + 50²) / 2)^½ = 36.34
        assert_eq!(aggregate(&[a, b, c]), Some(Color::new(36, 36, 36)));
        // ((50² + 0) / 2)^½ = 35.36, then ((35.36 + 200²) / 2)^½ = 141.48
        assert_eq!(aggregate(&[c, b, a]), Some(Color::new(141, 70, 8)));
    }

    #[test]
    fn aggregate_uniform_samples() {
        let white = Color::new(255, 255, 255);

        assert_eq!(aggregate(&[white, white]), Some(white));
        // The running blend does not converge to the sample value
        assert_eq!(aggregate(&[white, white, white]), Some(Color::new(180, 180, 180)));
    }

    #[test]
    fn encode_hex() {
        assert_eq!(hex_string(Color::new(0, 255, 16)), "#00ff10");
        assert_eq!(hex_string(Color::new(0, 0, 0)), "#000000");
    }

    #[test]
    fn encode_rgb() {
        let color = Color::new(1, 2, 3);

        assert_eq!(rgb_string(color, RgbChannelOrder::Legacy), "rgb(1, 3, 2)");
        assert_eq!(rgb_string(color, RgbChannelOrder::Standard), "rgb(1, 2, 3)");
    }

    #[test]
    fn serialize_picked_color() {
        let picked = PickedColor::new(Color::new(0, 255, 16), RgbChannelOrder::Legacy);

        assert_eq!(picked.to_string(), "#00ff10");

        let json = serde_json::to_value(&picked).expect("failed to serialize picked color");
        assert_eq!(
            json,
            serde_json::json!({
                "color": [0, 255, 16],
                "rgb": "rgb(0, 16, 255)",
                "hex": "#00ff10",
            })
        );

        let back: PickedColor = serde_json::from_value(json).expect("failed to deserialize");
        assert_eq!(back, picked);
    }
}
