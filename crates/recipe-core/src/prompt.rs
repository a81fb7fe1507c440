// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

/// Build the chat prompt for a user query.  The query is inserted verbatim
/// in both places.
pub fn recipe_prompt(query: &str) -> String {
    format!(
        "Can you suggest a detailed recipe based on these ingredients: {query}? \
         Or a specific recipe for {query} with over 500 words."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_substituted_twice() {
        assert_eq!(
            recipe_prompt("chicken"),
            "Can you suggest a detailed recipe based on these ingredients: chicken? \
             Or a specific recipe for chicken with over 500 words."
        );
    }

    #[test]
    fn query_is_not_escaped() {
        let p = recipe_prompt("{eggs} & \"milk\"");
        assert_eq!(p.matches("{eggs} & \"milk\"").count(), 2);
    }
}
