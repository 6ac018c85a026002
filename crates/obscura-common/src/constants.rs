//! Shared constants for Obscura components.

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 500;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 150;

/// Default number of obfuscation shapes per image
pub const DEFAULT_SHAPE_COUNT: u32 = 8;

/// Most shapes a config may ask for; beyond this a build is all noise
pub const MAX_SHAPE_COUNT: u32 = 256;

/// Default background color (white)
pub const DEFAULT_BACKGROUND: &str = "#fff";

/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 100;

/// Highest accepted JPEG quality
pub const MAX_QUALITY: u8 = 100;

/// Default TrueType font shipped with deployments
pub const DEFAULT_FONT_PATH: &str = "assets/fonts/DejaVuSans-Bold.ttf";

/// Default phrase corpus (one phrase per line)
pub const DEFAULT_PHRASES_PATH: &str = "assets/phrases.txt";

/// Name of the palette used when none is configured
pub const DEFAULT_PALETTE: &str = "google";

/// Data-URI prefix for inline JPEG output
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Shape placement tuning
pub mod shapes {
    /// Shapes may start this many pixels above the top edge
    pub const TOP_OVERHANG: i32 = 10;

    /// Smallest shape diameter is `height / MIN_DIAMETER_DIVISOR`
    pub const MIN_DIAMETER_DIVISOR: u32 = 5;

    /// Border ring is drawn this many pixels wider than the shape
    pub const BORDER_GROWTH: u32 = 2;
}

/// Phrase layout tuning
pub mod text {
    /// Glyph size is reduced by `1 + rand(0..=SIZE_JITTER_MAX)`
    pub const SIZE_JITTER_MAX: u32 = 3;

    /// Glyph sizes never drop below this
    pub const MIN_GLYPH_SIZE: f32 = 1.0;

    /// Upper bound for each channel of a randomized text color
    pub const TEXT_CHANNEL_MAX: u8 = 150;

    /// Point-to-pixel factor at 96 DPI
    pub const POINTS_TO_PIXELS: f32 = 96.0 / 72.0;
}
