use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Supported language codes for the pipeline
///
/// This is a closed set: detection always coerces its output into one of
/// these members, so downstream components never see an unsupported code.
/// Codes follow ISO 639-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    /// English - the working language
    En,
    /// Hindi - the deployment's default regional language
    Hi,
    /// Bengali
    Bn,
    /// Tamil
    Ta,
    /// Telugu
    Te,
    /// Kannada
    Kn,
    /// Gujarati
    Gu,
    /// Malayalam
    Ml,
    /// Punjabi
    Pa,
    /// Marathi
    Mr,
    /// Odia
    Or,
    /// Assamese
    As,
}

impl LanguageCode {
    /// All supported languages, in a stable order
    pub const ALL: [LanguageCode; 12] = [
        Self::En,
        Self::Hi,
        Self::Bn,
        Self::Ta,
        Self::Te,
        Self::Kn,
        Self::Gu,
        Self::Ml,
        Self::Pa,
        Self::Mr,
        Self::Or,
        Self::As,
    ];

    /// The working language all text is translated into before
    /// generation and the first validation checkpoint
    pub const WORKING: LanguageCode = Self::En;

    /// The default regional language used when detection cannot
    /// produce a supported result
    pub const DEFAULT_REGIONAL: LanguageCode = Self::Hi;

    /// ISO 639-1 code for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Bn => "bn",
            Self::Ta => "ta",
            Self::Te => "te",
            Self::Kn => "kn",
            Self::Gu => "gu",
            Self::Ml => "ml",
            Self::Pa => "pa",
            Self::Mr => "mr",
            Self::Or => "or",
            Self::As => "as",
        }
    }

    /// English name of the language, via the ISO 639 tables
    pub fn english_name(&self) -> &'static str {
        isolang::Language::from_639_1(self.as_str())
            .map(|lang| lang.to_name())
            .unwrap_or("Unknown")
    }

    /// Native name of the language, falling back to the English name
    /// when no autonym is recorded
    pub fn native_name(&self) -> &'static str {
        isolang::Language::from_639_1(self.as_str())
            .and_then(|lang| lang.to_autonym())
            .unwrap_or_else(|| self.english_name())
    }

    /// Whether this is the working language
    pub fn is_working(&self) -> bool {
        *self == Self::WORKING
    }

    /// Map an ISO 639-3 code (as produced by statistical detectors)
    /// to a supported language, if there is one
    pub fn from_part3(code: &str) -> Option<LanguageCode> {
        let lang = isolang::Language::from_639_3(code.trim())?;
        let part1 = lang.to_639_1()?;
        part1.parse().ok()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "hi" => Ok(Self::Hi),
            "bn" => Ok(Self::Bn),
            "ta" => Ok(Self::Ta),
            "te" => Ok(Self::Te),
            "kn" => Ok(Self::Kn),
            "gu" => Ok(Self::Gu),
            "ml" => Ok(Self::Ml),
            "pa" => Ok(Self::Pa),
            "mr" => Ok(Self::Mr),
            "or" => Ok(Self::Or),
            "as" => Ok(Self::As),
            _ => Err(anyhow!("Unsupported language code: {}", s)),
        }
    }
}
