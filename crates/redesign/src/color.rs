//! Hex color values.
//!
//! Theme files store colors as hex strings. Supported forms:
//!
//! - `#rgb` (each digit doubled)
//! - `#rrggbb`
//! - `#aarrggbb` (alpha first, the native toolkit's convention)
//! - `transparent`
//!
//! The leading `#` is optional. Parsing never panics. Callers that must not
//! fail use [`Rgba::parse_or_fallback`], which substitutes [`FALLBACK_COLOR`].

use std::fmt;

use crate::error::{Result, ThemeError};

/// Sentinel color used when a value is missing or fails to parse.
pub const FALLBACK_COLOR: Rgba = Rgba::rgb(0x80, 0x80, 0x80);

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Rgba = Rgba::rgb(0xff, 0x00, 0x00);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses a hex color string.
    ///
    /// `key` names the theme color being parsed and only appears in the error.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let invalid = || ThemeError::InvalidColorValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        let s = value.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        match hex.len() {
            3 => {
                let r = channel(0..1).map_err(|_| invalid())? * 17;
                let g = channel(1..2).map_err(|_| invalid())? * 17;
                let b = channel(2..3).map_err(|_| invalid())? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => {
                let r = channel(0..2).map_err(|_| invalid())?;
                let g = channel(2..4).map_err(|_| invalid())?;
                let b = channel(4..6).map_err(|_| invalid())?;
                Ok(Self::rgb(r, g, b))
            }
            8 => {
                let a = channel(0..2).map_err(|_| invalid())?;
                let r = channel(2..4).map_err(|_| invalid())?;
                let g = channel(4..6).map_err(|_| invalid())?;
                let b = channel(6..8).map_err(|_| invalid())?;
                Ok(Self { r, g, b, a })
            }
            _ => Err(invalid()),
        }
    }

    /// Parses a hex color, logging and substituting [`FALLBACK_COLOR`] on failure.
    pub fn parse_or_fallback(key: &str, value: &str) -> Self {
        Self::parse(key, value).unwrap_or_else(|err| {
            log::warn!("{}; using {}", err, FALLBACK_COLOR);
            FALLBACK_COLOR
        })
    }

    /// Formats as `#rrggbb`, or `#aarrggbb` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
        }
    }

    /// Returns the RGB channels as a tuple.
    pub fn rgb_tuple(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
