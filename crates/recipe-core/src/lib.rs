// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod expand;
mod format;
mod prompt;
mod history;
mod pipeline;

pub use expand::{count_words, expand, DEFAULT_MIN_WORDS, EXPANSION_SUFFIX};
pub use format::{bullet_numbered_lines, format, rewrite_labeled_bullets, rewrite_section_headers};
pub use prompt::recipe_prompt;
pub use history::{History, HistoryEntry, Speaker};
pub use pipeline::{RecipeMaker, SubmitError, Submission};
