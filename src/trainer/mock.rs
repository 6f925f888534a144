use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Completion, Reply, TokenUsage, Trainer};
use crate::error::{Error, Result};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Reply with this text.
    Text(String),
    /// Fail as if the model were unreachable.
    Fail(String),
}

/// A scripted trainer for tests. Returns pre-defined replies in order and
/// remembers every prompt it was given.
pub struct MockTrainer {
    replies: Vec<Scripted>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockTrainer {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A trainer that answers once with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![Scripted::Text(text.into())])
    }

    /// How many times `complete` has been called.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Trainer for MockTrainer {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &Completion) -> Result<Reply> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(i) {
            Some(Scripted::Text(text)) => Ok(Reply {
                text: text.clone(),
                usage: Some(TokenUsage {
                    input_tokens: request.prompt.len() as u64,
                    output_tokens: text.len() as u64,
                }),
            }),
            Some(Scripted::Fail(message)) => Err(Error::Generation(message.clone())),
            None => Err(Error::Generation(format!(
                "MockTrainer: no more replies (called {} times)",
                i + 1
            ))),
        }
    }
}
