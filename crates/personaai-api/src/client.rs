use anyhow::Result;
use async_trait::async_trait;
use futures::Stream;

use personaai_models::Message;

/// Token accounting reported by the provider, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// One decoded fragment of generated text.
#[derive(Debug, Clone, Default)]
pub struct StreamChunk {
    pub delta: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// A lazy, finite, non-restartable sequence of text fragments. Terminates
/// with end-of-stream, or with an `Err` item after which no further
/// fragments arrive.
pub type TextStream = Box<dyn Stream<Item = Result<StreamChunk>> + Send + Unpin>;

/// The capability offered by the hosted model provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One-shot generation: the complete reply as a single string.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Open a streaming generation call seeded with `history` plus the
    /// composed prompt as the new turn.
    async fn stream_reply(&self, history: &[Message], prompt: &str) -> Result<TextStream>;
}
