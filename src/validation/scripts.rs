/*!
 * Script-specific corruption checks.
 *
 * Machine translation into Indic scripts fails in recognizable shapes:
 * stray Latin characters wedged between Devanagari syllables, tokens
 * mixing two scripts, or shouted Latin acronym debris inside an
 * otherwise Devanagari answer. English output fails differently, as
 * vowel-starved gibberish tokens. Each branch here targets one family
 * of those shapes.
 */

use crate::script::{
    contains_devanagari, has_embedded_latin, has_mixed_script_token, has_script_sandwich,
    has_uppercase_run, is_lower_ascii_word, vowel_ratio,
};

/// Devanagari corruption patterns, checked in order. Returns the name of
/// the first pattern that fires.
pub(crate) fn devanagari_corruption(text: &str) -> Option<&'static str> {
    if has_script_sandwich(text) {
        return Some("latin characters sandwiched between devanagari");
    }
    if has_embedded_latin(text) {
        return Some("latin fragment embedded in devanagari");
    }
    if has_mixed_script_token(text) {
        return Some("token mixes scripts");
    }
    if has_uppercase_run(text) && contains_devanagari(text) {
        return Some("uppercase run inside devanagari text");
    }
    None
}

/// Share of long lowercase Latin tokens whose vowel ratio falls outside
/// the plausible English band
pub(crate) fn latin_gibberish_ratio(
    tokens: &[&str],
    min_vowel_ratio: f64,
    max_vowel_ratio: f64,
) -> f64 {
    let candidates: Vec<&&str> = tokens
        .iter()
        .filter(|t| t.chars().count() > 4 && is_lower_ascii_word(t))
        .collect();
    if candidates.is_empty() {
        return 0.0;
    }

    let gibberish = candidates
        .iter()
        .filter(|t| {
            let ratio = vowel_ratio(t);
            ratio < min_vowel_ratio || ratio > max_vowel_ratio
        })
        .count();
    gibberish as f64 / candidates.len() as f64
}
