// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Markdown restructuring of recipe replies.
//!
//! [`format`] applies three substitution passes in a fixed order.  Each pass
//! is total: text that does not match is left alone.  Pass 2 runs over the
//! output of pass 1, so any change to the header rewrite must keep
//! `*Ingredients:*` from producing a `*label*:` match.

use std::sync::LazyLock;

use regex::Regex;

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(Ingredients|Instructions):\*").unwrap());

static LABELED_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*:").unwrap());

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// Run all passes: section headers, labeled bullets, numbered lines.
pub fn format(text: &str) -> String {
    let text = rewrite_section_headers(text);
    let text = rewrite_labeled_bullets(&text);
    bullet_numbered_lines(&text)
}

/// Pass 1: `*Ingredients:*` → `### Ingredients:` (same for `Instructions`).
/// Case-sensitive.
pub fn rewrite_section_headers(text: &str) -> String {
    SECTION_HEADER.replace_all(text, "### ${1}:").into_owned()
}

/// Pass 2: `*label*:` → `- **label:**`.  The label is the shortest run of
/// non-newline characters between the first asterisk and `*:`.
pub fn rewrite_labeled_bullets(text: &str) -> String {
    LABELED_BULLET.replace_all(text, "- **${1}:**").into_owned()
}

/// Pass 3: lines whose trimmed content starts with `<digits>.` become
/// `- <trimmed line>`; every other line is kept byte for byte.
pub fn bullet_numbered_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if NUMBERED_LINE.is_match(trimmed) {
                format!("- {trimmed}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Pass 1 ────────────────────────────────────────────────────────────────

    #[test]
    fn section_headers_become_h3() {
        assert_eq!(rewrite_section_headers("*Ingredients:*"), "### Ingredients:");
        assert_eq!(rewrite_section_headers("*Instructions:*"), "### Instructions:");
    }

    #[test]
    fn section_headers_are_case_sensitive_and_exact() {
        for text in ["*ingredients:*", "*INSTRUCTIONS:*", "*Notes:*", "*Ingredients*:"] {
            assert_eq!(rewrite_section_headers(text), text);
        }
    }

    #[test]
    fn section_headers_rewritten_mid_line() {
        assert_eq!(
            rewrite_section_headers("Here you go. *Ingredients:* flour"),
            "Here you go. ### Ingredients: flour"
        );
    }

    // ── Pass 2 ────────────────────────────────────────────────────────────────

    #[test]
    fn labeled_bullet_rewritten() {
        assert_eq!(
            rewrite_labeled_bullets("*Prep Time*: 10 minutes"),
            "- **Prep Time:** 10 minutes"
        );
    }

    #[test]
    fn labeled_bullets_match_non_greedily() {
        assert_eq!(
            rewrite_labeled_bullets("*Serves*: 4, *Difficulty*: easy"),
            "- **Serves:** 4, - **Difficulty:** easy"
        );
    }

    #[test]
    fn labeled_bullet_does_not_span_lines() {
        let text = "*open\nclose*: no";
        assert_eq!(rewrite_labeled_bullets(text), text);
    }

    #[test]
    fn double_asterisk_label_matches_from_first_asterisk() {
        assert_eq!(rewrite_labeled_bullets("**Salt**: 1 tsp"), "- ***Salt*:** 1 tsp");
    }

    // ── Pass 3 ────────────────────────────────────────────────────────────────

    #[test]
    fn numbered_lines_get_bullets() {
        assert_eq!(bullet_numbered_lines("1. Mix flour\n2. Bake"), "- 1. Mix flour\n- 2. Bake");
    }

    #[test]
    fn numbered_lines_are_trimmed_other_lines_untouched() {
        assert_eq!(
            bullet_numbered_lines("  12. Rest\n  keep indent  \n1) not numbered"),
            "- 12. Rest\n  keep indent  \n1) not numbered"
        );
    }

    #[test]
    fn digit_without_period_is_not_numbered() {
        assert_eq!(bullet_numbered_lines("2 eggs\n.5 cup"), "2 eggs\n.5 cup");
    }

    #[test]
    fn empty_lines_and_trailing_newline_survive() {
        assert_eq!(bullet_numbered_lines("a\n\n1. b\n"), "a\n\n- 1. b\n");
        assert_eq!(bullet_numbered_lines(""), "");
    }

    // ── Full pipeline ─────────────────────────────────────────────────────────

    #[test]
    fn format_header_alone() {
        assert_eq!(format("*Ingredients:*"), "### Ingredients:");
    }

    #[test]
    fn format_labeled_bullet() {
        assert_eq!(format("*Prep Time*: 10 minutes"), "- **Prep Time:** 10 minutes");
    }

    #[test]
    fn format_numbered_steps() {
        assert_eq!(format("1. Mix flour\n2. Bake"), "- 1. Mix flour\n- 2. Bake");
    }

    #[test]
    fn rewritten_headers_are_not_rematched_by_labeled_bullets() {
        // Regression guard for the pass ordering.
        let text = "*Ingredients:*\n*Instructions:*";
        let after_headers = rewrite_section_headers(text);
        assert_eq!(rewrite_labeled_bullets(&after_headers), after_headers);
        assert_eq!(format(text), "### Ingredients:\n### Instructions:");
    }

    #[test]
    fn header_and_labeled_bullet_on_one_line() {
        assert_eq!(
            format("*Ingredients:* and *Salt*: pinch"),
            "### Ingredients: and - **Salt:** pinch"
        );
    }

    #[test]
    fn header_followed_by_colon_is_left_to_pass_one() {
        assert_eq!(format("*Ingredients:*:"), "### Ingredients::");
    }

    #[test]
    fn plain_text_is_identity_and_idempotent() {
        let samples = [
            "",
            "Preheat the oven.\nServe warm.",
            "  indented line\n\ttabbed\n",
            "Step one: chop onions. Step 2 - fry.",
        ];
        for x in samples {
            let once = format(x);
            assert_eq!(once, x);
            assert_eq!(format(&once), once);
        }
    }

    #[test]
    fn full_recipe_example() {
        let raw = "*Ingredients:*\n*Flour*: 2 cups\n*Sugar*: 1 cup\n\n*Instructions:*\n1. Mix.\n 2. Bake at 180C.\nEnjoy!";
        let expected = "### Ingredients:\n- **Flour:** 2 cups\n- **Sugar:** 1 cup\n\n### Instructions:\n- 1. Mix.\n- 2. Bake at 180C.\nEnjoy!";
        assert_eq!(format(raw), expected);
    }
}
