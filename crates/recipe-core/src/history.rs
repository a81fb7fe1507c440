// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    You,
    Model,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Model => "Model",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Speaker,
    pub text: String,
}

/// Displayed chat history for the current interaction.
///
/// Holds (query, response) pairs in submission order.  The pipeline resets it
/// when a submission begins, so after a successful submission it contains
/// exactly that one pair, and after a failed one it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Append one query/response pair.
    pub fn record(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.entries.push(HistoryEntry { role: Speaker::You, text: query.into() });
        self.entries.push(HistoryEntry { role: Speaker::Model, text: response.into() });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The formatted text of the most recent model entry.
    pub fn last_response(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.role == Speaker::Model)
            .map(|e| e.text.as_str())
    }
}
