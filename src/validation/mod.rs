/*!
 * Response quality validation.
 *
 * Every candidate answer passes through here before it reaches the
 * farmer, once in the working language and once more after outbound
 * translation. Validation never fails: it always produces a verdict,
 * and a rejected verdict carries the reason that fired so callers can
 * log it and substitute a fallback.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;
use crate::script::max_consecutive_repeats;

mod common;
mod scripts;

use common::{max_token_frequency, short_token_ratio, text_symbol_ratio};
use scripts::{devanagari_corruption, latin_gibberish_ratio};

/// Thresholds for the quality checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Minimum trimmed length in characters
    #[serde(default = "default_min_response_length")]
    pub min_response_length: usize,

    /// Responses with fewer tokens than this are accepted outright;
    /// the statistical checks are meaningless on them
    #[serde(default = "default_short_accept_max_tokens")]
    pub short_accept_max_tokens: usize,

    /// Maximum share any single token may have of all tokens
    #[serde(default = "default_max_token_frequency")]
    pub max_token_frequency: f64,

    /// A phrase repeated this many times back to back rejects
    #[serde(default = "default_max_consecutive_repeats")]
    pub max_consecutive_repeats: usize,

    /// Maximum share of tokens that may be two characters or shorter
    #[serde(default = "default_max_short_token_ratio")]
    pub max_short_token_ratio: f64,

    /// Maximum share of non-word, non-space characters
    #[serde(default = "default_max_symbol_ratio")]
    pub max_symbol_ratio: f64,

    /// Maximum share of long lowercase Latin tokens that may look
    /// vowel-gibberish before the English branch rejects
    #[serde(default = "default_max_latin_gibberish_ratio")]
    pub max_latin_gibberish_ratio: f64,

    /// Lower bound of the plausible English vowel ratio band
    #[serde(default = "default_min_vowel_ratio")]
    pub min_vowel_ratio: f64,

    /// Upper bound of the plausible English vowel ratio band
    #[serde(default = "default_max_vowel_ratio")]
    pub max_vowel_ratio: f64,
}

fn default_min_response_length() -> usize {
    10
}

fn default_short_accept_max_tokens() -> usize {
    5
}

fn default_max_token_frequency() -> f64 {
    0.2
}

fn default_max_consecutive_repeats() -> usize {
    5
}

fn default_max_short_token_ratio() -> f64 {
    0.7
}

fn default_max_symbol_ratio() -> f64 {
    0.08
}

fn default_max_latin_gibberish_ratio() -> f64 {
    0.3
}

fn default_min_vowel_ratio() -> f64 {
    0.15
}

fn default_max_vowel_ratio() -> f64 {
    0.7
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_response_length: default_min_response_length(),
            short_accept_max_tokens: default_short_accept_max_tokens(),
            max_token_frequency: default_max_token_frequency(),
            max_consecutive_repeats: default_max_consecutive_repeats(),
            max_short_token_ratio: default_max_short_token_ratio(),
            max_symbol_ratio: default_max_symbol_ratio(),
            max_latin_gibberish_ratio: default_max_latin_gibberish_ratio(),
            min_vowel_ratio: default_min_vowel_ratio(),
            max_vowel_ratio: default_max_vowel_ratio(),
        }
    }
}

/// Outcome of a validation run, with the reason that decided it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    /// Whether the response may be delivered as-is
    pub accepted: bool,
    /// The check that decided the verdict
    pub reason: String,
}

impl ValidationVerdict {
    /// Create an accepting verdict
    pub fn accepted(reason: impl Into<String>) -> Self {
        Self {
            accepted: true,
            reason: reason.into(),
        }
    }

    /// Create a rejecting verdict
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
        }
    }
}

/// Longest phrase length considered by the consecutive-repetition check
const REPEAT_MAX_PHRASE_LEN: usize = 3;

/// Validator applying the common checks plus a per-script branch.
#[derive(Debug, Clone, Default)]
pub struct ResponseValidator {
    config: ValidatorConfig,
}

impl ResponseValidator {
    /// Create a validator with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with explicit thresholds
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate `text` as a candidate answer in `language`. Never fails.
    pub fn validate(&self, text: &str, language: LanguageCode) -> ValidationVerdict {
        let trimmed = text.trim();

        if trimmed.chars().count() < self.config.min_response_length {
            return ValidationVerdict::rejected("response too short");
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        // Too few tokens for the statistical checks to mean anything
        if tokens.len() < self.config.short_accept_max_tokens {
            return ValidationVerdict::accepted("short response accepted");
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let lowered_refs: Vec<&str> = lowered.iter().map(String::as_str).collect();

        let frequency = max_token_frequency(&lowered_refs);
        if frequency > self.config.max_token_frequency {
            debug!("Rejecting response, max token frequency {:.2}", frequency);
            return ValidationVerdict::rejected("excessive word repetition detected");
        }

        if max_consecutive_repeats(&lowered_refs, REPEAT_MAX_PHRASE_LEN)
            >= self.config.max_consecutive_repeats
        {
            return ValidationVerdict::rejected("excessive consecutive repetition detected");
        }

        if short_token_ratio(&tokens) > self.config.max_short_token_ratio {
            return ValidationVerdict::rejected("text too fragmented to be meaningful");
        }

        if text_symbol_ratio(trimmed) > self.config.max_symbol_ratio {
            return ValidationVerdict::rejected("too many non-word characters");
        }

        match language {
            LanguageCode::En => {
                let ratio = latin_gibberish_ratio(
                    &lowered_refs,
                    self.config.min_vowel_ratio,
                    self.config.max_vowel_ratio,
                );
                if ratio > self.config.max_latin_gibberish_ratio {
                    debug!("Rejecting response, latin gibberish ratio {:.2}", ratio);
                    return ValidationVerdict::rejected("text appears to be gibberish");
                }
            }
            LanguageCode::Hi => {
                if let Some(pattern) = devanagari_corruption(trimmed) {
                    return ValidationVerdict::rejected(pattern);
                }
            }
            _ => {}
        }

        ValidationVerdict::accepted("response passed validation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_withNormalEnglish_shouldAccept() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate(
            "Water the tomato plants every morning and check for early blight on the lower leaves.",
            LanguageCode::En,
        );

        assert!(verdict.accepted);
        assert_eq!(verdict.reason, "response passed validation");
    }

    #[test]
    fn test_validate_withTooShortText_shouldReject() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate("ok", LanguageCode::En);

        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, "response too short");
    }

    #[test]
    fn test_validate_withFewTokens_shouldShortAccept() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate("Sow in early June.", LanguageCode::En);

        assert!(verdict.accepted);
        assert_eq!(verdict.reason, "short response accepted");
    }

    #[test]
    fn test_validate_withDominantToken_shouldReject() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate(
            "price price price price the price is price and price today price",
            LanguageCode::En,
        );

        assert!(!verdict.accepted);
        assert!(verdict.reason.contains("repetition"));

        let runaway = validator.validate(&"rain ".repeat(25), LanguageCode::En);
        assert!(!runaway.accepted);
        assert!(runaway.reason.contains("repetition"));
    }

    #[test]
    fn test_validate_withConsecutivePhraseRepeats_shouldReject() {
        let validator = ResponseValidator::new();

        // Long enough that no single token dominates, so only the
        // consecutive-phrase check can fire
        let verdict = validator.validate(
            "Before planting, dig a trench dig a trench dig a trench dig a trench dig a trench \
             along the field edge and fill it with compost for better drainage",
            LanguageCode::En,
        );

        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, "excessive consecutive repetition detected");
    }

    #[test]
    fn test_validate_withFragmentedText_shouldReject() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate("a b c d e f g h i j water", LanguageCode::En);

        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, "text too fragmented to be meaningful");
    }

    #[test]
    fn test_validate_withSymbolHeavyText_shouldReject() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate(
            "wheat@@ price## today$$ market%% advice^^ crops&&",
            LanguageCode::En,
        );

        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, "too many non-word characters");
    }

    #[test]
    fn test_validate_withLatinGibberish_shouldRejectEnglishOnly() {
        let validator = ResponseValidator::new();
        let text = "xkcdqrs zzvrtpw bcdfghj qrtwxzv the market price stays";

        let en = validator.validate(text, LanguageCode::En);
        let ta = validator.validate(text, LanguageCode::Ta);

        assert!(!en.accepted);
        assert!(ta.accepted);
    }

    #[test]
    fn test_validate_withCorruptedDevanagari_shouldRejectHindiOnly() {
        let validator = ResponseValidator::new();
        let text = "गेहूंxb की कीमत आज बाजार में अच्छी चल रही है";

        let hi = validator.validate(text, LanguageCode::Hi);
        let en = validator.validate(text, LanguageCode::En);

        assert!(!hi.accepted);
        assert!(en.accepted);
    }

    #[test]
    fn test_validate_withCleanHindi_shouldAccept() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate(
            "गेहूं की कीमत आज मंडी में अच्छी चल रही है। आप कल सुबह बेच सकते हैं।",
            LanguageCode::Hi,
        );

        assert!(verdict.accepted);
    }

    #[test]
    fn test_validate_withIndicVowelSigns_shouldNotCountAsSymbols() {
        let validator = ResponseValidator::new();

        // Matras and the danda must not trip the symbol-ratio check
        let verdict = validator.validate(
            "மண்ணில் ஈரப்பதம் இருந்தால் மட்டும் தண்ணீர் பாய்ச்சவும். காலை நேரம் சிறந்தது.",
            LanguageCode::Ta,
        );

        assert!(verdict.accepted);
    }
}
