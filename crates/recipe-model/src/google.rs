//! Google Gemini driver for the native Generative Language API.
//!
//! Uses the `streamGenerateContent` endpoint with server-sent events.
//!
//! # Auth
//! API key via the `x-goog-api-key` header, so the key never appears in a
//! URL or in transport errors.  The key is resolved when the first request
//! is built, so a missing key surfaces as an error on the first call rather
//! than at startup.
//!
//! # Endpoint pattern
//! `POST https://generativelanguage.googleapis.com/v1beta/models/{model}:streamGenerateContent?alt=sse`
//!
//! # Stream termination
//! Every reply must end with a chunk carrying `finishReason`.  `STOP` and
//! `MAX_TOKENS` end the stream normally; any other reason, or a transport
//! that closes before a finish reason arrives, is a stream error.

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::{provider::ResponseStream, CompletionRequest, ResponseEvent, Role};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GoogleProvider {
    model: String,
    api_key: Option<String>,
    base_url: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            max_tokens,
            temperature,
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, req: &CompletionRequest) -> Value {
        // Separate system instruction from conversation
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for m in &req.messages {
            match m.role {
                Role::System => system_parts.push(json!({ "text": m.content })),
                Role::User => {
                    contents.push(json!({ "role": "user", "parts": [{ "text": m.content }] }))
                }
                Role::Assistant => {
                    contents.push(json!({ "role": "model", "parts": [{ "text": m.content }] }))
                }
            }
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(max) = self.max_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(max));
        }
        if let Some(t) = self.temperature {
            generation_config.insert("temperature".into(), json!(t));
        }

        let mut body = json!({ "contents": contents });
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }
        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }
        body
    }
}

#[async_trait]
impl crate::ModelProvider for GoogleProvider {
    fn name(&self) -> &str { "google" }
    fn model_name(&self) -> &str { &self.model }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let key = self
            .api_key
            .as_deref()
            .context("Gemini API key not set (export GOOGLE_API_KEY or set model.api_key)")?;

        let body = self.request_body(&req);
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url.trim_end_matches('/'),
            self.model,
        );

        debug!(model = %self.model, messages = req.messages.len(), "sending Google Gemini request");

        let resp = self.client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await
            .context("Google Gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Google Gemini error {status}: {text}");
        }

        let events = resp
            .bytes_stream()
            .eventsource()
            .map(|event| match event {
                Ok(event) => decode_payload(&event.data),
                Err(e) => vec![Err(anyhow!("reading Google Gemini stream: {e}"))],
            })
            .flat_map(futures::stream::iter);

        Ok(require_finish(Box::pin(events)))
    }
}

/// Pass events through, appending an error when the transport ends before
/// the reply was finished.
fn require_finish(events: ResponseStream) -> ResponseStream {
    let guarded = futures::stream::unfold(
        (events, false, false),
        |(mut events, finished, ended)| async move {
            if ended {
                return None;
            }
            match events.next().await {
                Some(ev) => {
                    let finished = finished || matches!(ev, Ok(ResponseEvent::Done));
                    Some((ev, (events, finished, false)))
                }
                None if finished => None,
                None => {
                    let err = anyhow!("Google Gemini stream ended before the reply was finished");
                    Some((Err(err), (events, finished, true)))
                }
            }
        },
    );
    Box::pin(guarded)
}

fn decode_payload(data: &str) -> Vec<anyhow::Result<ResponseEvent>> {
    if data == "[DONE]" {
        return vec![Ok(ResponseEvent::Done)];
    }
    let parsed = serde_json::from_str::<Value>(data)
        .with_context(|| format!("malformed Gemini stream payload: {data}"))
        .and_then(|v| parse_gemini_chunk(&v));
    match parsed {
        Ok(evs) => evs.into_iter().map(Ok).collect(),
        Err(e) => vec![Err(e)],
    }
}

/// Translate one streamed `GenerateContentResponse` into events.
///
/// A single chunk may carry text, usage metadata and a finish reason at
/// once; they are emitted in that order.
fn parse_gemini_chunk(v: &Value) -> anyhow::Result<Vec<ResponseEvent>> {
    if let Some(err) = v.get("error") {
        let message = err["message"].as_str().unwrap_or("unknown Gemini API error");
        bail!("Google Gemini error: {message}");
    }

    if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
        bail!("Google Gemini blocked the prompt: {reason}");
    }

    let mut events = Vec::new();
    let candidate = &v["candidates"][0];

    let mut text = String::new();
    for part in candidate["content"]["parts"].as_array().into_iter().flatten() {
        if part.get("thought").and_then(|t| t.as_bool()) == Some(true) {
            trace!("skipping thought part");
            continue;
        }
        if let Some(t) = part["text"].as_str() {
            text.push_str(t);
        }
    }
    if !text.is_empty() {
        events.push(ResponseEvent::TextDelta(text));
    }

    if let Some(meta) = v.get("usageMetadata") {
        events.push(ResponseEvent::Usage {
            input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        });
    }

    if let Some(reason) = candidate["finishReason"].as_str() {
        match reason {
            "STOP" | "MAX_TOKENS" => events.push(ResponseEvent::Done),
            other => bail!("Google Gemini stopped the reply early: finish reason {other}"),
        }
    }

    Ok(events)
}
