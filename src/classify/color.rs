use serde::{Deserialize, Serialize};
use std::fmt;

use super::band::{Band, LOW_MAX, MEDIUM_MAX};

/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rounds each channel and clamps it to 0..=255.
    fn from_channels(r: f64, g: f64, b: f64) -> Self {
        let channel = |value: f64| value.round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_css_rgb(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| format!("invalid color '{value}'"))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid color '{value}'"))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

pub const GREEN: Rgb = Rgb::new(0x22, 0xc5, 0x5e);
pub const ORANGE: Rgb = Rgb::new(0xf9, 0x73, 0x16);
pub const RED: Rgb = Rgb::new(0xdc, 0x26, 0x26);

/// Bars for slots before the current one.
pub const PAST_SLOT: Rgb = Rgb::new(0x93, 0xc5, 0xfd);
/// Bars for slots at or after the current one.
pub const FUTURE_SLOT: Rgb = Rgb::new(0xbf, 0xdb, 0xfe);

/// Green of the gradient at the Medium/High boundary (255, 165, 0).
const GRADIENT_ORANGE_GREEN: f64 = 165.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ColorPolicy {
    /// One fixed color per band.
    #[default]
    Discrete,
    /// Green → yellow → orange → red gradient.
    Continuous,
}

impl ColorPolicy {
    pub fn color(&self, percentage: i64) -> Rgb {
        match self {
            ColorPolicy::Discrete => band_color(Band::of(percentage)),
            ColorPolicy::Continuous => gradient(percentage),
        }
    }
}

pub fn band_color(band: Band) -> Rgb {
    match band {
        Band::Low => GREEN,
        Band::Medium => ORANGE,
        Band::High => RED,
    }
}

/// Piecewise linear gradient with breakpoints at 50 and 80:
///
/// - `p <= 50`: red rises `255 * p / 50`, green stays 255 (green → yellow)
/// - `50 < p <= 80`: red 255, green falls `255 - 90 * (p - 50) / 30` (yellow → orange)
/// - `p > 80`: red 255, green falls `165 - 165 * (p - 80) / 20` (orange → red)
///
/// Blue is always 0. Channels are clamped only when converted to bytes, so
/// values past either end saturate at pure green or pure red.
pub fn gradient(percentage: i64) -> Rgb {
    let p = percentage as f64;
    let low_max = LOW_MAX as f64;
    let medium_max = MEDIUM_MAX as f64;

    if percentage <= LOW_MAX {
        Rgb::from_channels(255.0 * p / low_max, 255.0, 0.0)
    } else if percentage <= MEDIUM_MAX {
        let span = medium_max - low_max;
        let green = 255.0 - (255.0 - GRADIENT_ORANGE_GREEN) * (p - low_max) / span;
        Rgb::from_channels(255.0, green, 0.0)
    } else {
        let span = 100.0 - medium_max;
        let green = GRADIENT_ORANGE_GREEN - GRADIENT_ORANGE_GREEN * (p - medium_max) / span;
        Rgb::from_channels(255.0, green, 0.0)
    }
}
