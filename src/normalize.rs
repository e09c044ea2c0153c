/*!
 * Text normalization for corrupted or garbled input.
 *
 * Upstream transcription and transliteration produce a characteristic
 * mix of artifacts: runaway word and character repetition, random-letter
 * noise, and words with scripts interleaved mid-token. The normalizer
 * strips these in a fixed stage order before the text is translated.
 *
 * `clean` is a pure function and idempotent: the stage list runs to a
 * fixpoint, so cleaning already-clean text changes nothing.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::script;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static ASTERISK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*{2,}").expect("Invalid asterisk regex"));

static DOT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}").expect("Invalid dot regex"));

/// Common short Hindi grammatical particles. Corrupted transcriptions
/// tend to loop on exactly these.
const FUNCTION_WORDS: [&str; 13] = [
    "में", "की", "के", "का", "को", "से", "पर", "और", "है", "हैं", "जो", "यह", "वह",
];

/// Configuration for the text normalizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Tokens longer than this are dropped as broken
    #[serde(default = "default_max_token_len")]
    pub max_token_len: usize,

    /// Tokens with a higher symbol-to-letter ratio are dropped
    #[serde(default = "default_max_token_symbol_ratio")]
    pub max_token_symbol_ratio: f64,

    /// Acceptable vowel-ratio band for long lowercase Latin tokens
    #[serde(default = "default_vowel_ratio_min")]
    pub vowel_ratio_min: f64,

    /// Upper bound of the vowel-ratio band
    #[serde(default = "default_vowel_ratio_max")]
    pub vowel_ratio_max: f64,

    /// Tokens above this share of the text are dropped (non-consecutive
    /// repetition corruption), applied to texts with > 10 tokens
    #[serde(default = "default_max_token_frequency")]
    pub max_token_frequency: f64,

    /// Fewer surviving tokens than this signals unsalvageable input
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Shorter surviving text than this signals unsalvageable input
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_max_token_len() -> usize {
    25
}

fn default_max_token_symbol_ratio() -> f64 {
    0.6
}

fn default_vowel_ratio_min() -> f64 {
    0.2
}

fn default_vowel_ratio_max() -> f64 {
    0.8
}

fn default_max_token_frequency() -> f64 {
    0.25
}

fn default_min_tokens() -> usize {
    3
}

fn default_min_chars() -> usize {
    10
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_token_len: default_max_token_len(),
            max_token_symbol_ratio: default_max_token_symbol_ratio(),
            vowel_ratio_min: default_vowel_ratio_min(),
            vowel_ratio_max: default_vowel_ratio_max(),
            max_token_frequency: default_max_token_frequency(),
            min_tokens: default_min_tokens(),
            min_chars: default_min_chars(),
        }
    }
}

/// Corruption-stripping text normalizer
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Create a normalizer with default thresholds
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Create a normalizer with custom thresholds
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Clean corrupted text. Returns an empty string when fewer than 3
    /// tokens or 10 characters survive, signaling that the input is
    /// unsalvageable and the caller should fall back to topic extraction
    /// instead of translating noise.
    pub fn clean(&self, text: &str) -> String {
        let mut current = text.trim().to_string();

        // Run the stage list to a fixpoint. A single pass is not
        // idempotent: dropping a dominant token can push another over the
        // frequency threshold, and token drops can create new adjacent
        // repetition. Every stage only shrinks the text, so this
        // terminates.
        loop {
            let next = self.pass(&current);
            if next == current {
                break;
            }
            current = next;
        }

        let token_count = current.split_whitespace().count();
        if token_count < self.config.min_tokens || current.chars().count() < self.config.min_chars {
            if !text.trim().is_empty() {
                debug!(
                    "Normalization left {} tokens / {} chars, marking unsalvageable",
                    token_count,
                    current.chars().count()
                );
            }
            return String::new();
        }

        current
    }

    /// One ordered application of every cleanup stage
    fn pass(&self, text: &str) -> String {
        // Stage 1: collapse 1-3 token sequences repeated 4+ times
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let tokens = script::collapse_repeated_phrases(&tokens, 3, 4);
        let text = tokens.join(" ");

        // Stage 2: collapse short periodic substrings (6+ repeats) and
        // single-character runs (4+)
        let text = script::collapse_substring_runs(&text, 3, 6);
        let text = script::collapse_char_runs(&text, 4);

        // Stage 3: collapse runs of common grammatical particles that
        // stage 2's character-level merges may have re-exposed
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let tokens = collapse_function_word_runs(&tokens, 4);

        // Stage 4: per-token corruption filters
        let tokens: Vec<String> = tokens
            .into_iter()
            .filter(|token| self.keep_token(token))
            .collect();

        // Stage 5: global frequency filter for longer texts
        let tokens = self.filter_dominant_tokens(tokens);

        // Stage 6: whitespace and punctuation cleanup
        let text = tokens.join(" ");
        let text = WHITESPACE_RE.replace_all(&text, " ");
        let text = ASTERISK_RUN_RE.replace_all(&text, "*");
        let text = DOT_RUN_RE.replace_all(&text, "...");
        text.trim().to_string()
    }

    /// Per-token filter. Very short tokens are left alone; longer tokens
    /// are dropped on any corruption signature.
    fn keep_token(&self, token: &str) -> bool {
        let len = token.chars().count();
        if len <= 2 {
            return true;
        }

        if len > self.config.max_token_len {
            return false;
        }

        if script::has_script_sandwich(token) {
            return false;
        }

        if script::symbol_ratio(token) > self.config.max_token_symbol_ratio {
            return false;
        }

        if script::has_irregular_case_mixing(token) {
            return false;
        }

        // Long all-lowercase Latin tokens with an implausible vowel share
        // are random-letter noise
        if len > 6 && script::is_lower_ascii_word(token) {
            let ratio = script::vowel_ratio(token);
            if ratio < self.config.vowel_ratio_min || ratio > self.config.vowel_ratio_max {
                return false;
            }
        }

        true
    }

    /// Second-pass repetition removal: drop tokens whose frequency
    /// exceeds the threshold, catching corruption that stage 1 missed
    /// because it was not consecutive. Only applies to texts with more
    /// than 10 tokens.
    fn filter_dominant_tokens(&self, tokens: Vec<String>) -> Vec<String> {
        let total = tokens.len();
        if total <= 10 {
            return tokens;
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in &tokens {
            *counts.entry(token.to_lowercase()).or_insert(0) += 1;
        }

        tokens
            .into_iter()
            .filter(|token| {
                let frequency = counts[&token.to_lowercase()] as f64 / total as f64;
                frequency <= self.config.max_token_frequency
            })
            .collect()
    }
}

/// Collapse runs of known function words of length >= `min_run` to one
/// occurrence
fn collapse_function_word_runs(tokens: &[&str], min_run: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let mut j = i + 1;
        if FUNCTION_WORDS.contains(&token) {
            while j < tokens.len() && tokens[j] == token {
                j += 1;
            }
        }
        let run = j - i;
        if run >= min_run {
            out.push(token.to_string());
        } else {
            for _ in 0..run {
                out.push(token.to_string());
            }
        }
        i = j;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new()
    }

    #[test]
    fn test_clean_withCleanText_shouldReturnUnchanged() {
        let text = "टमाटर का भाव आज क्या है बाजार में";

        assert_eq!(normalizer().clean(text), text);
    }

    #[test]
    fn test_clean_withConsecutiveWordRepetition_shouldCollapse() {
        let cleaned = normalizer().clean("भाव भाव भाव भाव भाव क्या है आज मंडी में");

        assert_eq!(cleaned, "भाव क्या है आज मंडी में");
    }

    #[test]
    fn test_clean_withCharacterRuns_shouldCollapse() {
        let cleaned = normalizer().clean("heeeeello market price today please");

        assert_eq!(cleaned, "hello market price today please");
    }

    #[test]
    fn test_clean_withOverlongToken_shouldDropIt() {
        // varied characters so the run-collapse stages leave the token
        // intact and the length filter is what drops it
        let noise = "qazwsxedcrfvtgbyhnujmikolpqazws";
        let cleaned = normalizer().clean(&format!("tomato price in pune {} today", noise));

        assert_eq!(cleaned, "tomato price in pune today");
    }

    #[test]
    fn test_clean_withMixedScriptToken_shouldDropIt() {
        let cleaned = normalizer().clean("मुझे खीrरे का भाव बताओ आज मंडी में");

        assert!(!cleaned.contains("खीrरे"));
        assert!(cleaned.contains("भाव"));
    }

    #[test]
    fn test_clean_withSymbolNoise_shouldDropNoiseTokens() {
        let cleaned = normalizer().clean("tomato @#$%^&*! price in market today");

        assert_eq!(cleaned, "tomato price in market today");
    }

    #[test]
    fn test_clean_withCaseMixingToken_shouldDropIt() {
        let cleaned = normalizer().clean("the KANTAmandi report for onion prices today");

        assert!(!cleaned.contains("KANTAmandi"));
    }

    #[test]
    fn test_clean_withVowellessNoise_shouldDropIt() {
        let cleaned = normalizer().clean("wheat price xkcdqwrtz for the market");

        assert_eq!(cleaned, "wheat price for the market");
    }

    #[test]
    fn test_clean_withNonConsecutiveDominantToken_shouldDropIt() {
        // 12 tokens, "spam" appears 4 times spread out (33%)
        let cleaned =
            normalizer().clean("spam wheat spam price spam in spam pune market today rate list");

        assert!(!cleaned.contains("spam"));
        assert!(cleaned.contains("wheat"));
    }

    #[test]
    fn test_clean_withHeavyCorruption_shouldReturnEmpty() {
        assert_eq!(normalizer().clean("क की की"), "");
        assert_eq!(normalizer().clean("zz qq"), "");
        assert_eq!(normalizer().clean(""), "");
        assert_eq!(normalizer().clean("   "), "");
    }

    #[test]
    fn test_clean_isIdempotent() {
        let inputs = [
            "भाव भाव भाव भाव भाव क्या है आज मंडी में",
            "tomato @#$%^&*! price in market today",
            "spam wheat spam price spam in spam pune market today rate list",
            "की की की की की खेती के बारे में बताइए ......",
            "a b a b a b a b wheat price today",
            "heeeeello market price today please",
            "",
        ];
        let normalizer = normalizer();

        for input in inputs {
            let once = normalizer.clean(input);
            let twice = normalizer.clean(&once);
            assert_eq!(once, twice, "clean not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_clean_withDotRuns_shouldNormalizePunctuation() {
        // long runs fall to the character-run collapse, exactly three
        // dots survive as an ellipsis
        let cleaned = normalizer().clean("wheat price today.......... please tell");
        assert_eq!(cleaned, "wheat price today. please tell");

        let cleaned = normalizer().clean("wheat price today... please tell");
        assert_eq!(cleaned, "wheat price today... please tell");
    }
}
