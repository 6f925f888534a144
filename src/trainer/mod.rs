pub mod anthropic;
pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// What we ask of a model: a prompt, and the JSON Schema its answer must fit.
#[derive(Debug, Clone)]
pub struct Completion {
    pub prompt: String,
    pub schema: Value,
}

/// Token usage from a single model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another usage into this one.
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }

    /// Total tokens (input + output).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// The model's raw answer. Not yet checked against the schema.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// The borrowed expertise. Could be Claude, Gemini, or a test script.
///
/// Failures to reach the model or get any text back are
/// [`Error::Generation`](crate::error::Error::Generation).
#[async_trait]
pub trait Trainer: Send + Sync {
    /// Provider name, e.g. `"anthropic"`.
    fn provider(&self) -> &str;

    /// Model id in use.
    fn model(&self) -> &str;

    async fn complete(&self, request: &Completion) -> Result<Reply>;
}
