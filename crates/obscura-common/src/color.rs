//! Color specifications and their resolution to RGB triples.
//!
//! Colors reach the drawing code in two forms: hex text (`#rgb` or
//! `#rrggbb`, leading `#` optional) or an explicit triple. Both resolve
//! through [`ColorSpec::resolve`]. Malformed hex is rejected with
//! [`CaptchaError::InvalidColorFormat`] rather than degrading to black.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CaptchaError;

/// A resolved color: red, green, blue
pub type Rgb8 = [u8; 3];

/// A user-facing color value
///
/// Deserializes from either a string (`"#ea4335"`) or a three-element
/// array (`[234, 67, 53]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Hex text, 3 or 6 digits
    Hex(String),
    /// Literal triple
    Rgb(u8, u8, u8),
}

impl ColorSpec {
    /// Resolve to exactly one RGB triple
    pub fn resolve(&self) -> Result<Rgb8, CaptchaError> {
        match self {
            Self::Rgb(r, g, b) => Ok([*r, *g, *b]),
            Self::Hex(hex) => parse_hex(hex),
        }
    }
}

/// Parse `#rgb` / `#rrggbb` (the `#` is optional)
pub fn parse_hex(input: &str) -> Result<Rgb8, CaptchaError> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    let invalid = || CaptchaError::InvalidColorFormat(input.to_string());

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    match digits.len() {
        6 => {
            let channel =
                |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
            Ok([channel(0)?, channel(2)?, channel(4)?])
        }
        3 => {
            // #abc -> #aabbcc
            let channel = |i: usize| {
                u8::from_str_radix(&digits[i..i + 1], 16)
                    .map(|n| n * 17)
                    .map_err(|_| invalid())
            };
            Ok([channel(0)?, channel(1)?, channel(2)?])
        }
        _ => Err(invalid()),
    }
}

impl FromStr for ColorSpec {
    type Err = CaptchaError;

    /// Parses and validates hex text; the original text is kept
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)?;
        Ok(Self::Hex(s.to_string()))
    }
}

impl From<Rgb8> for ColorSpec {
    fn from([r, g, b]: Rgb8) -> Self {
        Self::Rgb(r, g, b)
    }
}

impl From<&str> for ColorSpec {
    fn from(value: &str) -> Self {
        Self::Hex(value.to_string())
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(hex) => f.write_str(hex),
            Self::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}
