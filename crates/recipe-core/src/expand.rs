// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Minimum-length enforcement for model replies.

pub use recipe_config::DEFAULT_MIN_WORDS;

/// Appended once to replies shorter than the minimum word count.
pub const EXPANSION_SUFFIX: &str =
    " Please provide more details on preparation steps, cooking tips, or variations for the recipe.";

/// Number of whitespace-delimited words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Return `text` unchanged when it has at least `min_words` words, otherwise
/// `text` followed by [`EXPANSION_SUFFIX`].  The suffix is appended at most
/// once, even if the result is still short.
pub fn expand(text: &str, min_words: usize) -> String {
    if count_words(text) >= min_words {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + EXPANSION_SUFFIX.len());
    out.push_str(text);
    out.push_str(EXPANSION_SUFFIX);
    out
}
