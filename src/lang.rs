use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnuvadError, Result};

/// The closed set of languages the workflow translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Marathi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    /// ISO 639-1 code, also used in model names and environment variables.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Marathi => "mr",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Marathi => "Marathi",
        }
    }

    /// Parse a language from its display name or ISO code, case-insensitive.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Language::English),
            "hi" | "hin" | "hindi" => Ok(Language::Hindi),
            "mr" | "mar" | "marathi" => Ok(Language::Marathi),
            _ => Err(AnuvadError::UnsupportedLanguage(s.trim().to_string())),
        }
    }

    /// Hindi and Marathi are both written in Devanagari.
    pub fn uses_devanagari(&self) -> bool {
        matches!(self, Language::Hindi | Language::Marathi)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered source -> target language pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }

    /// Directory name for fine-tuned model checkpoints, e.g. "en-hi".
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.source.code(), self.target.code())
    }

    /// Environment variable naming a per-pair model override, e.g. "MT_MODEL_en_hi".
    pub fn override_var(&self) -> String {
        format!("MT_MODEL_{}_{}", self.source.code(), self.target.code())
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source.code(), self.target.code())
    }
}
