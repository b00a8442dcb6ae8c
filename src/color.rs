//! Bookmark colors.
//!
//! Outline items carry a `/C` array of three floats in `[0, 1]`. The editor only
//! offers five named colors plus free hex colors, and existing outlines are
//! bucketed back into the named set with fixed thresholds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed palette offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    /// Red
    Red,
    /// Blue
    Blue,
    /// Green
    Green,
    /// Yellow
    Yellow,
    /// Purple
    Purple,
}

impl NamedColor {
    /// All palette entries, in classification order.
    pub const ALL: [NamedColor; 5] = [
        NamedColor::Red,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Yellow,
        NamedColor::Purple,
    ];

    /// Lowercase name used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedColor::Red => "red",
            NamedColor::Blue => "blue",
            NamedColor::Green => "green",
            NamedColor::Yellow => "yellow",
            NamedColor::Purple => "purple",
        }
    }

    /// RGB triple written to `/C`.
    ///
    /// Each triple lands inside its own classification bucket.
    pub fn rgb(&self) -> [f64; 3] {
        match self {
            NamedColor::Red => [1.0, 0.0, 0.0],
            NamedColor::Blue => [0.0, 0.0, 1.0],
            NamedColor::Green => [0.0, 0.8, 0.0],
            NamedColor::Yellow => [1.0, 1.0, 0.0],
            NamedColor::Purple => [0.5, 0.0, 0.5],
        }
    }

    fn matches(&self, [r, g, b]: [f64; 3]) -> bool {
        match self {
            NamedColor::Red => r > 0.8 && g < 0.3 && b < 0.3,
            NamedColor::Blue => b > 0.8 && r < 0.3 && g < 0.3,
            NamedColor::Green => g > 0.5 && r < 0.3 && b < 0.3,
            NamedColor::Yellow => r > 0.8 && g > 0.8 && b < 0.3,
            NamedColor::Purple => r > 0.4 && b > 0.4 && g < 0.3,
        }
    }

    /// Bucket an outline `/C` triple into the palette.
    ///
    /// Returns `None` when no bucket matches; callers leave the color unset
    /// rather than guessing.
    pub fn classify(rgb: [f64; 3]) -> Option<NamedColor> {
        NamedColor::ALL.into_iter().find(|c| c.matches(rgb))
    }
}

/// A custom 8-bit RGB color (`#rrggbb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a new color.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || Error::MalformedInput(format!("invalid hex color '{}'", hex));

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                Ok(Self::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                    channel(4).map_err(|_| invalid())?,
                ))
            },
            3 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                Ok(Self::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(1).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                ))
            },
            _ => Err(invalid()),
        }
    }

    /// Channels as floats in `[0, 1]`.
    pub fn to_floats(&self) -> [f64; 3] {
        [self.r as f64 / 255.0, self.g as f64 / 255.0, self.b as f64 / 255.0]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color of a bookmark: a palette entry or a custom RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BookmarkColor {
    /// One of the five palette colors
    Named(NamedColor),
    /// Free hex color
    Custom(Rgb),
}

impl BookmarkColor {
    /// The `/C` triple for this color.
    pub fn to_rgb(&self) -> [f64; 3] {
        match self {
            BookmarkColor::Named(named) => named.rgb(),
            BookmarkColor::Custom(rgb) => rgb.to_floats(),
        }
    }
}

impl From<NamedColor> for BookmarkColor {
    fn from(color: NamedColor) -> Self {
        BookmarkColor::Named(color)
    }
}

impl FromStr for BookmarkColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Some(named) = NamedColor::ALL.into_iter().find(|c| c.as_str() == lowered) {
            return Ok(BookmarkColor::Named(named));
        }
        Rgb::from_hex(&lowered).map(BookmarkColor::Custom)
    }
}

impl TryFrom<String> for BookmarkColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BookmarkColor> for String {
    fn from(color: BookmarkColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for BookmarkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkColor::Named(named) => f.write_str(named.as_str()),
            BookmarkColor::Custom(rgb) => write!(f, "{}", rgb),
        }
    }
}
