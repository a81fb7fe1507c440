// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Markdown and JSON views of a session.

use recipe_core::{History, Submission};
use serde::Serialize;

pub const INPUT_PROMPT: &str =
    "🔍 Enter ingredients or dish name (e.g., chicken, pasta, chocolate cake, etc.): ";

pub fn banner() -> String {
    [
        "# 🍽️ Recipe Maker ✨",
        "",
        "**Welcome to the Recipe Maker!**",
        "Enter the ingredients or dish name below, and we'll suggest a delicious recipe tailored just for you!",
        "Type `quit` or press Ctrl-D to leave.",
        "",
    ]
    .join("\n")
}

pub fn footer() -> &'static str {
    "---\n🔗 For more culinary adventures, come back any time!\n"
}

/// The displayed history: a heading, then each entry as a bold role label
/// followed by its Markdown text.
pub fn render_history(history: &History) -> String {
    let mut out = String::from("## 🥘 Your Recipe\n");
    for entry in history.entries() {
        out.push_str(&format!("\n**{}:**\n\n{}\n", entry.role, entry.text));
    }
    out
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    raw_response: &'a str,
    formatted_response: &'a str,
    history: &'a History,
}

pub fn render_json(submission: &Submission, history: &History) -> anyhow::Result<String> {
    let out = JsonOutput {
        query: &submission.query,
        raw_response: &submission.raw_response,
        formatted_response: &submission.formatted_response,
        history,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}
