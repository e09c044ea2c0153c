/*!
 * Language-independent quality checks shared by every script branch.
 */

use std::collections::HashMap;

use crate::script::symbol_ratio;

/// Highest frequency of any single token, as a fraction of all tokens
pub(crate) fn max_token_frequency(tokens: &[&str]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(0);
    max as f64 / tokens.len() as f64
}

/// Fraction of tokens that are two characters or shorter
pub(crate) fn short_token_ratio(tokens: &[&str]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let short = tokens
        .iter()
        .filter(|t| t.chars().count() <= 2)
        .count();
    short as f64 / tokens.len() as f64
}

/// Fraction of non-whitespace characters that are symbols
pub(crate) fn text_symbol_ratio(text: &str) -> f64 {
    symbol_ratio(text)
}
