//! Core types shared across Obscura components.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{ColorSpec, Rgb8};
use crate::error::CaptchaError;

/// Kind of obfuscation shape drawn behind the phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Filled ellipse (equal radii)
    #[default]
    Circle,
    /// Square rotated by 45 degrees
    Diamond,
    /// Axis-aligned square
    Square,
    /// Five-pointed star
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [Self::Circle, Self::Diamond, Self::Square, Self::Star];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Square => "square",
            Self::Star => "star",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = CaptchaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CaptchaError::InvalidConfig(format!("unknown shape kind {s:?}")))
    }
}

/// One palette slot: fill color plus optional border ring color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub background: ColorSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<ColorSpec>,
}

impl PaletteEntry {
    pub fn new(background: impl Into<ColorSpec>, border: Option<ColorSpec>) -> Self {
        Self {
            background: background.into(),
            border,
        }
    }

    pub fn resolve(&self) -> Result<ShapeStyle, CaptchaError> {
        Ok(ShapeStyle {
            fill: self.background.resolve()?,
            border: self.border.as_ref().map(ColorSpec::resolve).transpose()?,
        })
    }
}

/// A palette entry with its colors resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeStyle {
    pub fill: Rgb8,
    pub border: Option<Rgb8>,
}

/// Ordered, non-empty collection of palette entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PaletteEntry>", into = "Vec<PaletteEntry>")]
pub struct ShapePalette {
    entries: Vec<PaletteEntry>,
}

impl ShapePalette {
    /// Names accepted by [`ShapePalette::named`]
    pub const PRESETS: [&'static str; 2] = ["google", "slate"];

    /// Create a palette, rejecting an empty entry list
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, CaptchaError> {
        if entries.is_empty() {
            return Err(CaptchaError::InvalidConfig(
                "shape palette must have at least one entry".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    /// Look up a preset palette by name (case-insensitive)
    pub fn named(name: &str) -> Result<Self, CaptchaError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::google()),
            "slate" => Ok(Self::slate()),
            other => Err(CaptchaError::InvalidConfig(format!(
                "unknown palette {other:?} (expected one of {:?})",
                Self::PRESETS
            ))),
        }
    }

    /// Red, blue, yellow, and green discs with lighter rims
    pub fn google() -> Self {
        Self::from_pairs(&[
            ("#ea4335", "#f5897f"),
            ("#4285f4", "#80aefb"),
            ("#fbbc05", "#f5897f"),
            ("#34a853", "#80b89a"),
        ])
    }

    /// Greyscale discs
    pub fn slate() -> Self {
        Self::from_pairs(&[
            ("#5f6368", "#9aa0a6"),
            ("#80868b", "#bdc1c6"),
            ("#3c4043", "#5f6368"),
        ])
    }

    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(background, border)| PaletteEntry::new(*background, Some((*border).into())))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a palette built through `new`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every entry, failing on the first malformed color
    pub fn resolve(&self) -> Result<Vec<ShapeStyle>, CaptchaError> {
        self.entries.iter().map(PaletteEntry::resolve).collect()
    }
}

impl Default for ShapePalette {
    fn default() -> Self {
        Self::google()
    }
}

impl TryFrom<Vec<PaletteEntry>> for ShapePalette {
    type Error = CaptchaError;

    fn try_from(entries: Vec<PaletteEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ShapePalette> for Vec<PaletteEntry> {
    fn from(palette: ShapePalette) -> Self {
        palette.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_kind_parse() {
        assert_eq!("circle".parse::<ShapeKind>().unwrap(), ShapeKind::Circle);
        assert_eq!(" STAR ".parse::<ShapeKind>().unwrap(), ShapeKind::Star);
        assert!("hexagon".parse::<ShapeKind>().is_err());
        assert_eq!(ShapeKind::default(), ShapeKind::Circle);
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(ShapePalette::new(vec![]).is_err());
        let err = serde_json::from_str::<ShapePalette>("[]").unwrap_err();
        assert!(err.to_string().contains("at least one entry"));
    }

    #[test]
    fn test_google_palette_resolves() {
        let styles = ShapePalette::google().resolve().unwrap();
        assert_eq!(styles.len(), 4);
        assert_eq!(styles[0].fill, [234, 67, 53]);
        assert_eq!(styles[0].border, Some([245, 137, 127]));
    }

    #[test]
    fn test_named_presets() {
        for name in ShapePalette::PRESETS {
            assert!(ShapePalette::named(name).is_ok());
        }
        assert_eq!(ShapePalette::named("Google").unwrap(), ShapePalette::google());
        assert!(ShapePalette::named("neon").is_err());
    }

    #[test]
    fn test_entry_without_border() {
        let json = r##"[{"background": "#000"}, {"background": [1, 2, 3], "border": "#fff"}]"##;
        let palette: ShapePalette = serde_json::from_str(json).unwrap();
        let styles = palette.resolve().unwrap();
        assert_eq!(styles[0], ShapeStyle { fill: [0, 0, 0], border: None });
        assert_eq!(styles[1].border, Some([255, 255, 255]));
    }

    #[test]
    fn test_malformed_entry_fails_resolution() {
        let palette = ShapePalette::new(vec![PaletteEntry::new("#12345", None)]).unwrap();
        assert!(matches!(
            palette.resolve(),
            Err(CaptchaError::InvalidColorFormat(_))
        ));
    }
}
