mod types;
mod provider;
mod google;
mod mock;
mod chat;

pub use types::*;
pub use provider::{ModelProvider, ResponseStream};
pub use google::GoogleProvider;
pub use mock::{fragment_script, MockProvider, ScriptStep, ScriptedMockProvider};
pub use chat::{ChatSession, FragmentStream};

use anyhow::bail;
use recipe_config::{ModelConfig, DEFAULT_API_KEY_ENV};

/// Construct a boxed [`ModelProvider`] from configuration.
///
/// Provider selection:
/// - `"google"` → [`GoogleProvider`]
/// - `"mock"` → [`MockProvider`] (canned reply if configured, else echo-back)
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    match cfg.provider.as_str() {
        "google" | "gemini" => Ok(Box::new(GoogleProvider::new(
            cfg.name.clone(),
            resolve_api_key(cfg),
            cfg.base_url.clone(),
            cfg.max_tokens,
            cfg.temperature,
        ))),
        "mock" => Ok(Box::new(match &cfg.mock_response {
            Some(reply) => MockProvider::with_reply(reply.clone()),
            None => MockProvider::default(),
        })),
        other => bail!("unknown model provider: {other}"),
    }
}

fn resolve_api_key(cfg: &ModelConfig) -> Option<String> {
    if let Some(k) = &cfg.api_key {
        return Some(k.clone());
    }
    let env = cfg.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
    std::env::var(env).ok().filter(|k| !k.is_empty())
}
