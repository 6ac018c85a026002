//! # Obscura
//!
//! Synthesizes CAPTCHA images: randomly placed, ringed shapes across the
//! canvas as occlusion noise, with a phrase drawn glyph by glyph on top.
//!
//! ## Build cycle
//! ```text
//! BuildConfig ──▶ CaptchaBuilder::build()
//!                   ├─ blank canvas + background fill
//!                   ├─ ShapeObfuscator  (noise, one shape per band)
//!                   ├─ PhraseRenderer   (jittered size, centered glyphs)
//!                   └─ BuiltImage ──▶ save_as / get / inline / output
//! ```
//!
//! All randomness flows through the builder's RNG; seed it with
//! [`CaptchaBuilder::with_rng`] for reproducible images. This is visual
//! obfuscation, not a cryptographic guarantee.

pub mod builder;
pub mod canvas;
pub mod export;
pub mod font;
pub mod phrase;
pub mod shapes;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{BuildConfig, BuildConfigBuilder, BuiltImage, CaptchaBuilder};
pub use canvas::Canvas;
pub use export::CaptchaRecord;
pub use font::{BoundingBox, GlyphFont, TtfFont};
pub use obscura_common::{
    CaptchaError, ColorSpec, PaletteEntry, ShapeKind, ShapePalette, ShapeStyle,
};
pub use phrase::{FixedPhrase, PhraseSource, WordListSource};
pub use shapes::{ShapeObfuscator, ShapePlacement};
pub use text::{PhraseLayout, PhraseRenderer};
