//! Multi-turn chat on top of a [`ModelProvider`].
//!
//! The session keeps the API-side conversation so every prompt is sent with
//! the turns that preceded it.  Replies are consumed as a lazy
//! [`FragmentStream`] of text; the caller hands the assembled reply back via
//! [`ChatSession::complete_turn`] once the stream has been drained.

use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::{CompletionRequest, Message, ModelProvider, ResponseEvent, Usage};

/// Lazily produced, non-empty text fragments of one reply, in arrival order.
/// The stream ends at the provider's `Done` event; dropping it abandons the
/// request.
pub type FragmentStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;

pub struct ChatSession {
    provider: Arc<dyn ModelProvider>,
    history: Vec<Message>,
    pending: Option<Message>,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider, history: Vec::new(), pending: None }
    }

    pub fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    /// Committed turns, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Send `prompt` together with the committed history and stream the reply.
    ///
    /// A previous turn that was never completed is discarded.
    pub async fn send_message(&mut self, prompt: &str) -> anyhow::Result<FragmentStream> {
        if self.pending.take().is_some() {
            debug!("discarding incomplete chat turn");
        }

        let user = Message::user(prompt);
        let mut messages = self.history.clone();
        messages.push(user.clone());

        let events = self
            .provider
            .complete(CompletionRequest { messages, stream: true })
            .await?;
        self.pending = Some(user);
        Ok(text_fragments(events))
    }

    /// Commit the pending prompt and its assembled reply to the history.
    /// Does nothing when no turn is pending.
    pub fn complete_turn(&mut self, reply: impl Into<String>) {
        if let Some(user) = self.pending.take() {
            self.history.push(user);
            self.history.push(Message::assistant(reply));
        }
    }

    /// Forget every committed turn.
    pub fn reset(&mut self) {
        self.history.clear();
        self.pending = None;
    }
}

/// Reduce a provider event stream to its text fragments.
fn text_fragments(events: crate::provider::ResponseStream) -> FragmentStream {
    let stream = events
        .take_while(|ev| futures::future::ready(!matches!(ev, Ok(ResponseEvent::Done))))
        .filter_map(|ev| async move {
            match ev {
                Ok(ResponseEvent::TextDelta(t)) if !t.is_empty() => Some(Ok(t)),
                Ok(ResponseEvent::TextDelta(_)) | Ok(ResponseEvent::Done) => None,
                Ok(ResponseEvent::Usage { input_tokens, output_tokens }) => {
                    let usage = Usage { input_tokens, output_tokens };
                    debug!(?usage, "model usage");
                    None
                }
                Ok(ResponseEvent::Error(msg)) => Some(Err(anyhow!("model reported an error: {msg}"))),
                Err(e) => Some(Err(e)),
            }
        });
    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockProvider, Role, ScriptStep, ScriptedMockProvider};

    async fn collect(stream: FragmentStream) -> anyhow::Result<Vec<String>> {
        let mut out = Vec::new();
        let mut stream = stream;
        while let Some(f) = stream.next().await {
            out.push(f?);
        }
        Ok(out)
    }

    #[tokio::test]
    async fn fragments_exclude_empty_and_non_text_events() {
        let provider = ScriptedMockProvider::new(vec![vec![
            ScriptStep::Event(ResponseEvent::TextDelta("a".into())),
            ScriptStep::Event(ResponseEvent::TextDelta(String::new())),
            ScriptStep::Event(ResponseEvent::Usage { input_tokens: 1, output_tokens: 2 }),
            ScriptStep::Event(ResponseEvent::TextDelta("b".into())),
            ScriptStep::Event(ResponseEvent::Done),
            ScriptStep::Event(ResponseEvent::TextDelta("after done".into())),
        ]]);
        let mut chat = ChatSession::new(Arc::new(provider));
        let frags = collect(chat.send_message("q").await.unwrap()).await.unwrap();
        assert_eq!(frags, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn provider_error_event_fails_the_stream() {
        let provider = ScriptedMockProvider::new(vec![vec![
            ScriptStep::Event(ResponseEvent::TextDelta("*Ingredients:* partial".into())),
            ScriptStep::Event(ResponseEvent::Error("finish reason: SAFETY".into())),
            ScriptStep::Event(ResponseEvent::Done),
        ]]);
        let mut chat = ChatSession::new(Arc::new(provider));
        let err = collect(chat.send_message("q").await.unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"), "{err}");
    }

    #[tokio::test]
    async fn completed_turns_are_sent_as_context() {
        let provider = Arc::new(ScriptedMockProvider::new(vec![
            crate::fragment_script(["first reply"]),
            crate::fragment_script(["second reply"]),
        ]));
        let mut chat = ChatSession::new(provider.clone());

        let reply = collect(chat.send_message("one").await.unwrap()).await.unwrap().concat();
        chat.complete_turn(reply);
        let _ = collect(chat.send_message("two").await.unwrap()).await.unwrap();

        let sent = provider.last_request().unwrap().messages;
        let roles: Vec<Role> = sent.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(sent[1].as_text(), "first reply");
        assert_eq!(sent[2].as_text(), "two");
    }

    #[tokio::test]
    async fn incomplete_turn_is_discarded() {
        let provider = Arc::new(ScriptedMockProvider::new(vec![
            vec![ScriptStep::Fail("boom".into())],
            crate::fragment_script(["ok"]),
        ]));
        let mut chat = ChatSession::new(provider.clone());

        assert!(collect(chat.send_message("lost").await.unwrap()).await.is_err());
        let _ = collect(chat.send_message("kept").await.unwrap()).await.unwrap();
        chat.complete_turn("ok");

        let sent = provider.last_request().unwrap().messages;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].as_text(), "kept");
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn complete_turn_without_pending_is_noop() {
        let mut chat = ChatSession::new(Arc::new(MockProvider::default()));
        chat.complete_turn("orphan");
        assert!(chat.history().is_empty());
    }

    #[tokio::test]
    async fn reset_clears_history() {
        let mut chat = ChatSession::new(Arc::new(MockProvider::default()));
        let reply = collect(chat.send_message("hi").await.unwrap()).await.unwrap().concat();
        assert_eq!(reply, "MOCK: hi");
        chat.complete_turn(reply);
        chat.reset();
        assert!(chat.history().is_empty());
    }
}
