//! # Obscura - CAPTCHA image generator
//!
//! Renders a phrase over randomized, ringed noise shapes and writes the
//! result as JPEG.
//!
//! ## Usage
//! ```bash
//! # Random phrase from the configured word list, saved to captcha.jpg
//! obscura
//!
//! # Fixed phrase, reproducible image, printed as a data URI
//! obscura --phrase hello --seed 42 --emit inline
//!
//! # Answer + image as JSON for a verification backend
//! obscura --emit json --shape star
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use crate::config::AppConfig;
use obscura::{CaptchaBuilder, FixedPhrase, PhraseSource, ShapeKind, TtfFont, WordListSource};

/// Where the finished CAPTCHA goes
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// JPEG file at --output
    File,
    /// data:image/jpeg;base64 URI on stdout
    Inline,
    /// Phrase and inline image as JSON on stdout
    Json,
}

/// Obscura - CAPTCHA image generator
#[derive(Parser, Debug)]
#[command(name = "obscura")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/obscura.toml")]
    config: String,

    /// Phrase to render (overrides the word list)
    #[arg(short, long, env = "OBSCURA_PHRASE")]
    phrase: Option<String>,

    /// Font file (overrides config)
    #[arg(long, env = "OBSCURA_FONT")]
    font: Option<String>,

    /// Phrase corpus (overrides config)
    #[arg(long, env = "OBSCURA_PHRASES")]
    phrases: Option<String>,

    /// Canvas width (overrides config)
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height (overrides config)
    #[arg(long)]
    height: Option<u32>,

    /// Shape kind: circle, diamond, square, star (overrides config)
    #[arg(long)]
    shape: Option<ShapeKind>,

    /// JPEG quality 0-100 (overrides config)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Output file for --emit file
    #[arg(short, long, default_value = "captcha.jpg")]
    output: PathBuf,

    /// Output mode
    #[arg(long, value_enum, default_value_t = Emit::File)]
    emit: Emit,

    /// Seed for a reproducible image
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Pick up OBSCURA_* / LOG_LEVEL from .env before clap reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Obscura v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(&args.config, &args)?;
    let build_config = config
        .build_config()
        .context("Invalid CAPTCHA configuration")?;

    let font = TtfFont::from_path(&config.font_path)
        .with_context(|| format!("Failed to load font {}", config.font_path))?;
    info!(font = font.name(), "Font ready");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let source: Box<dyn PhraseSource> = match args.phrase {
        Some(ref phrase) => Box::new(FixedPhrase::new(phrase.clone())),
        None => Box::new(
            WordListSource::from_path(&config.phrases_path)
                .with_context(|| format!("Failed to load phrases from {}", config.phrases_path))?,
        ),
    };
    let phrase = source.next_phrase(&mut rng)?;

    let mut builder = CaptchaBuilder::with_rng(build_config, Arc::new(font), phrase, rng);
    let image = builder.build().context("Failed to build CAPTCHA")?;

    match args.emit {
        Emit::File => {
            image
                .save_as(&args.output, config.quality)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
            info!(
                path = %args.output.display(),
                width = image.width(),
                height = image.height(),
                "CAPTCHA written"
            );
        }
        Emit::Inline => {
            println!("{}", image.inline(config.quality)?);
        }
        Emit::Json => {
            let record = image.record(config.quality)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// Initialize structured logging with tracing (stderr keeps stdout for output)
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
