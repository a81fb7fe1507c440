// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use crate::{provider::ResponseStream, CompletionRequest, ResponseEvent};

/// Deterministic offline provider.  Replies with a canned text when one is
/// configured, otherwise echoes the last user message back.
#[derive(Debug, Default)]
pub struct MockProvider {
    reply: Option<String>,
}

impl MockProvider {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()) }
    }
}

#[async_trait]
impl crate::ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let reply = match &self.reply {
            Some(r) => r.clone(),
            None => {
                let last = req
                    .messages
                    .iter()
                    .rev()
                    .find(|m| matches!(m.role, crate::Role::User))
                    .map(|m| m.as_text())
                    .unwrap_or("[no input]");
                format!("MOCK: {last}")
            }
        };

        let events: Vec<anyhow::Result<ResponseEvent>> = vec![
            Ok(ResponseEvent::TextDelta(reply)),
            Ok(ResponseEvent::Usage { input_tokens: 10, output_tokens: 10 }),
            Ok(ResponseEvent::Done),
        ];
        Ok(Box::pin(stream::iter(events)))
    }
}

/// One scripted step of a [`ScriptedMockProvider`] stream.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Event(ResponseEvent),
    /// Yield a transport error at this point in the stream.
    Fail(String),
}

/// A pre-scripted mock provider.  Each call to `complete` pops the next
/// response script from the front of the queue.  This lets tests specify
/// exact fragment sequences without network access.
pub struct ScriptedMockProvider {
    scripts: Arc<Mutex<Vec<Vec<ScriptStep>>>>,
    /// Every `CompletionRequest` seen by this provider, in call order.
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedMockProvider {
    /// Build a provider from a list of response scripts.
    /// The outer `Vec` is the ordered list of calls; the inner `Vec` is the
    /// sequence of steps emitted for that call.
    pub fn new(scripts: Vec<Vec<ScriptStep>>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience: one call streaming `fragments` as separate text deltas.
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(vec![fragment_script(fragments)])
    }

    /// Convenience: provider that always returns a single text reply.
    pub fn always_text(reply: impl Into<String>) -> Self {
        Self::fragments([reply.into()])
    }

    /// Convenience: one call that streams `before` and then fails.
    pub fn fails_after<I, S>(before: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut script: Vec<ScriptStep> = before
            .into_iter()
            .map(|f| ScriptStep::Event(ResponseEvent::TextDelta(f.into())))
            .collect();
        script.push(ScriptStep::Fail(message.into()));
        Self::new(vec![script])
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

/// Script for one call: each fragment as a text delta, then usage and done.
pub fn fragment_script<I, S>(fragments: I) -> Vec<ScriptStep>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut script: Vec<ScriptStep> = fragments
        .into_iter()
        .map(|f| ScriptStep::Event(ResponseEvent::TextDelta(f.into())))
        .collect();
    script.push(ScriptStep::Event(ResponseEvent::Usage { input_tokens: 5, output_tokens: 5 }));
    script.push(ScriptStep::Event(ResponseEvent::Done));
    script
}

#[async_trait]
impl crate::ModelProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }
    fn model_name(&self) -> &str {
        "scripted-mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        self.requests.lock().unwrap().push(req);
        let steps = {
            let mut scripts = self.scripts.lock().unwrap();
            if scripts.is_empty() {
                // Default fallback when all scripts are consumed
                fragment_script(["[no more scripts]"])
            } else {
                scripts.remove(0)
            }
        };
        let wrapped: Vec<anyhow::Result<ResponseEvent>> = steps
            .into_iter()
            .map(|s| match s {
                ScriptStep::Event(ev) => Ok(ev),
                ScriptStep::Fail(msg) => Err(anyhow::anyhow!(msg)),
            })
            .collect();
        Ok(Box::pin(stream::iter(wrapped)))
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
