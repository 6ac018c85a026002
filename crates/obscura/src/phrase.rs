//! Phrase sources.
//!
//! The builder only needs one string per CAPTCHA. [`WordListSource`] picks
//! uniformly from a newline-separated corpus; [`FixedPhrase`] always returns
//! the same text.

use std::path::Path;

use obscura_common::CaptchaError;
use rand::RngCore;
use rand::seq::IndexedRandom;

/// Supplies the text rendered into a CAPTCHA
pub trait PhraseSource: Send + Sync {
    fn next_phrase(&self, rng: &mut dyn RngCore) -> Result<String, CaptchaError>;
}

/// Corpus of phrases, one per line
#[derive(Debug, Clone)]
pub struct WordListSource {
    phrases: Vec<String>,
}

impl WordListSource {
    /// Read a corpus file; an unreadable or empty file is `SourceUnavailable`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptchaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CaptchaError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;

        let source = Self::from_text(&text)?;
        tracing::debug!(path = %path.display(), phrases = source.len(), "Loaded phrase corpus");
        Ok(source)
    }

    /// Split `text` into trimmed, non-blank lines
    pub fn from_text(text: &str) -> Result<Self, CaptchaError> {
        Self::from_phrases(
            text.trim_start_matches('\u{feff}')
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        )
    }

    pub fn from_phrases<I, S>(phrases: I) -> Result<Self, CaptchaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(CaptchaError::SourceUnavailable(
                "phrase corpus is empty".to_string(),
            ));
        }
        Ok(Self { phrases })
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl PhraseSource for WordListSource {
    fn next_phrase(&self, rng: &mut dyn RngCore) -> Result<String, CaptchaError> {
        self.phrases
            .choose(rng)
            .cloned()
            .ok_or_else(|| CaptchaError::SourceUnavailable("phrase corpus is empty".to_string()))
    }
}

/// Always yields the same phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPhrase(String);

impl FixedPhrase {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }
}

impl PhraseSource for FixedPhrase {
    fn next_phrase(&self, _rng: &mut dyn RngCore) -> Result<String, CaptchaError> {
        Ok(self.0.clone())
    }
}
