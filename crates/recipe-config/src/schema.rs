// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

/// Serde default helper returning `true`.
///
/// `#[serde(default)]` on a `bool` falls back to `false`, so fields that are
/// on unless switched off need a named function.
fn default_true() -> bool {
    true
}

fn default_min_words() -> usize {
    DEFAULT_MIN_WORDS
}

/// Word count below which a reply gets the expansion sentence appended.
pub const DEFAULT_MIN_WORDS: usize = 500;

/// Environment variable holding the Gemini API key.
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub recipe: RecipeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider identifier: "google" | "mock"
    pub provider: String,
    /// Model name forwarded to the provider API
    pub name: String,
    /// Environment variable that holds the API key (read when the first
    /// request is built, not at startup)
    pub api_key_env: Option<String>,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    /// Base URL override.  Useful for local proxies and tests.
    pub base_url: Option<String>,
    /// Maximum output tokens.  Omitted from the request when unset so the
    /// API default applies.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0–2.0).  Omitted from the request when unset.
    pub temperature: Option<f32>,

    // ── Mock provider ─────────────────────────────────────────────────────────
    /// Canned reply returned when provider = "mock".  Without it the mock
    /// echoes the prompt back.
    pub mock_response: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            name: "gemini-pro".into(),
            api_key_env: Some(DEFAULT_API_KEY_ENV.into()),
            api_key: None,
            base_url: None,
            max_tokens: None,
            temperature: None,
            mock_response: None,
        }
    }
}

/// Post-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Replies with fewer whitespace-delimited words than this get the
    /// expansion sentence appended once.
    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self { min_words: DEFAULT_MIN_WORDS }
    }
}

/// Terminal presentation settings for the interactive shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print the welcome banner before the first prompt.
    #[serde(default = "default_true")]
    pub banner: bool,
    /// Print the footer rule and link after each rendered history.
    #[serde(default = "default_true")]
    pub footer: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { banner: true, footer: true }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
