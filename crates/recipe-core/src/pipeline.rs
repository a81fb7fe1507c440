// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use futures::StreamExt;
use recipe_config::RecipeConfig;
use recipe_model::{ChatSession, ModelProvider};
use thiserror::Error;
use tracing::debug;

use crate::{expand, format, recipe_prompt, History};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Sending the prompt or reading the streamed reply failed.
    #[error("model request failed: {0:#}")]
    Model(#[from] anyhow::Error),
}

/// Result of one successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub query: String,
    /// Concatenated fragments exactly as streamed.
    pub raw_response: String,
    /// Expanded and formatted reply, as stored in the history.
    pub formatted_response: String,
}

/// Query → prompt → streamed reply → expand → format → history.
pub struct RecipeMaker {
    chat: ChatSession,
    min_words: usize,
}

impl RecipeMaker {
    pub fn new(provider: Arc<dyn ModelProvider>, config: &RecipeConfig) -> Self {
        Self { chat: ChatSession::new(provider), min_words: config.min_words }
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub async fn submit(
        &mut self,
        history: &mut History,
        query: &str,
    ) -> Result<Submission, SubmitError> {
        self.submit_with(history, query, |_| {}).await
    }

    /// Like [`submit`](Self::submit), calling `on_fragment` for every streamed
    /// fragment as it arrives.
    ///
    /// `history` is reset before the request is sent; it receives the
    /// (query, formatted reply) pair only when the whole reply was read.
    pub async fn submit_with<F>(
        &mut self,
        history: &mut History,
        query: &str,
        mut on_fragment: F,
    ) -> Result<Submission, SubmitError>
    where
        F: FnMut(&str) + Send,
    {
        history.reset();

        let prompt = recipe_prompt(query);
        let mut fragments = self.chat.send_message(&prompt).await?;

        let mut raw = String::new();
        let mut count = 0usize;
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            raw.push_str(&fragment);
            count += 1;
        }
        debug!(fragments = count, chars = raw.len(), "reply received");

        let formatted = format(&expand(&raw, self.min_words));
        self.chat.complete_turn(raw.clone());
        history.record(query, formatted.clone());

        Ok(Submission {
            query: query.to_string(),
            raw_response: raw,
            formatted_response: formatted,
        })
    }
}
