/*!
 * Corruption-detection primitives shared by the text normalizer and the
 * response validator.
 *
 * Corruption in this domain shows up as literal interleaving of writing
 * systems inside a single word, runaway repetition of characters, words
 * or phrases, and random-letter noise. These helpers express each
 * signature as a small, independently testable function over characters
 * or token sequences. The upstream patterns relied on regex
 * backreferences for the repetition checks, which the regex crate does
 * not support, so those scans are explicit token/char loops here.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Non-word, non-space characters (symbols and stray punctuation).
/// `\w` is Unicode-aware, so Indic letters and combining vowel signs
/// are not counted as symbols.
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("Invalid non-word regex"));

/// Run of 3+ uppercase Latin letters
static UPPERCASE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{3,}").expect("Invalid uppercase run regex"));

/// Irregular case mixing inside a token, like "KANTAmandi"
static CASE_MIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{3,}[a-z]|[a-z][A-Z]{3,}").expect("Invalid case mix regex"));

/// Purely lowercase ASCII token
static LOWER_ASCII_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+$").expect("Invalid lowercase regex"));

/// Whether a character is an ASCII Latin letter
pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Whether a character belongs to the Devanagari block
pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Whether the text contains at least one Devanagari character
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(is_devanagari)
}

/// Ratio of ASCII vowels to total characters in a token
pub fn vowel_ratio(token: &str) -> f64 {
    let len = token.chars().count();
    if len == 0 {
        return 0.0;
    }
    let vowels = token
        .chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count();
    vowels as f64 / len as f64
}

/// Ratio of symbol characters (neither word characters nor whitespace)
/// to total characters
pub fn symbol_ratio(text: &str) -> f64 {
    let len = text.chars().count();
    if len == 0 {
        return 0.0;
    }
    NON_WORD_RE.find_iter(text).count() as f64 / len as f64
}

/// Whether a token is made of lowercase ASCII letters only
pub fn is_lower_ascii_word(token: &str) -> bool {
    LOWER_ASCII_RE.is_match(token)
}

/// Whether the text contains a run of 3+ uppercase Latin letters
pub fn has_uppercase_run(text: &str) -> bool {
    UPPERCASE_RUN_RE.is_match(text)
}

/// Whether a token mixes case irregularly (3+ consecutive uppercase
/// letters adjacent to lowercase)
pub fn has_irregular_case_mixing(token: &str) -> bool {
    CASE_MIX_RE.is_match(token)
}

/// Detect the Latin/Devanagari sandwich signature: a letter of one
/// script directly between two letters of the other, within a
/// 3-character window. Well-formed text never interleaves scripts at
/// this granularity.
pub fn has_script_sandwich(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(3).any(|w| {
        (is_latin_letter(w[0]) && is_devanagari(w[1]) && is_latin_letter(w[2]))
            || (is_devanagari(w[0]) && is_latin_letter(w[1]) && is_devanagari(w[2]))
    })
}

/// Detect one or two Latin letters embedded inside a Devanagari word
pub fn has_embedded_latin(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if is_devanagari(chars[i]) {
            // count the Latin run that follows
            let mut j = i + 1;
            while j < chars.len() && is_latin_letter(chars[j]) {
                j += 1;
            }
            let run = j - (i + 1);
            if (1..=2).contains(&run) && j < chars.len() && is_devanagari(chars[j]) {
                return true;
            }
        }
        i += 1;
    }
    false
}

/// Whether a single token contains both Devanagari and Latin letters
pub fn token_mixes_scripts(token: &str) -> bool {
    token.chars().any(is_devanagari) && token.chars().any(is_latin_letter)
}

/// Whether any whitespace-delimited token in the text mixes scripts
pub fn has_mixed_script_token(text: &str) -> bool {
    text.split_whitespace().any(token_mixes_scripts)
}

/// Maximum number of consecutive repetitions of any phrase of
/// 1..=`max_phrase_len` tokens, compared case-insensitively.
pub fn max_consecutive_repeats(tokens: &[&str], max_phrase_len: usize) -> usize {
    if tokens.is_empty() {
        return 0;
    }
    let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let mut max_run = 1;

    for i in 0..tokens.len() {
        for width in 1..=max_phrase_len.min(tokens.len() - i) {
            let mut run = 1;
            while i + (run + 1) * width <= tokens.len()
                && lower[i + run * width..i + (run + 1) * width] == lower[i..i + width]
            {
                run += 1;
            }
            max_run = max_run.max(run);
        }
    }

    max_run
}

/// Collapse any phrase of 1..=`max_phrase_len` tokens repeated at least
/// `min_repeats` times consecutively down to a single occurrence.
/// Comparison is case-insensitive; the first occurrence's casing wins.
pub fn collapse_repeated_phrases(
    tokens: &[&str],
    max_phrase_len: usize,
    min_repeats: usize,
) -> Vec<String> {
    let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let mut collapsed = false;
        for width in 1..=max_phrase_len.min(tokens.len() - i) {
            let mut run = 1;
            while i + (run + 1) * width <= tokens.len()
                && lower[i + run * width..i + (run + 1) * width] == lower[i..i + width]
            {
                run += 1;
            }
            if run >= min_repeats {
                out.extend(tokens[i..i + width].iter().map(|t| t.to_string()));
                i += run * width;
                collapsed = true;
                break;
            }
        }
        if !collapsed {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }

    out
}

/// Collapse runs of a single repeated character of length
/// >= `min_run` down to one character.
pub fn collapse_char_runs(text: &str, min_run: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let mut j = i + 1;
        while j < chars.len() && chars[j] == chars[i] {
            j += 1;
        }
        let run = j - i;
        if run >= min_run {
            out.push(chars[i]);
        } else {
            for _ in 0..run {
                out.push(chars[i]);
            }
        }
        i = j;
    }

    out
}

/// Collapse a short substring (1..=`max_period` chars) repeated at least
/// `min_repeats` times back-to-back down to a single occurrence.
pub fn collapse_substring_runs(text: &str, max_period: usize, min_repeats: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let mut collapsed = false;
        for period in 1..=max_period {
            if i + period > chars.len() {
                break;
            }
            let unit = &chars[i..i + period];
            let mut run = 1;
            while i + (run + 1) * period <= chars.len()
                && chars[i + run * period..i + (run + 1) * period] == *unit
            {
                run += 1;
            }
            if run >= min_repeats {
                out.extend(unit.iter());
                i += run * period;
                collapsed = true;
                break;
            }
        }
        if !collapsed {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}
