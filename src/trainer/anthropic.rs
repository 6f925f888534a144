use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Completion, Reply, TokenUsage, Trainer};
use crate::error::{Error, Result};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const MAX_TOKENS: u32 = 4096;

/// A trainer backed by the Anthropic Messages API.
///
/// The Messages API has no structured-output switch, so the schema goes into
/// the system prompt and the reply is validated afterwards.
pub struct AnthropicTrainer {
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl AnthropicTrainer {
    /// `api_key` may be `None`; calls then fail with a hint on how to set one.
    pub fn new(model: Option<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn build_system_prompt(schema: &serde_json::Value) -> String {
        format!(
            r#"You are a careful personal trainer who writes daily exercise routines.

## How to respond

Respond with a single JSON object that validates against this JSON Schema:

{schema}

## Rules
- Always respond with ONLY valid JSON, no markdown fences, no extra text.
- Use whole numbers for "sets" and "completed"; "completed" is always 0.
- Keep "reps" and "restTime" short strings such as "8-12" and "60 seconds"."#
        )
    }

    fn build_request<'a>(&'a self, system: &'a str, request: &'a Completion) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        }
    }

    fn reply_from(api_resp: ApiResponse) -> Result<Reply> {
        let text: String = api_resp
            .content
            .iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text.as_deref()
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(Error::Generation(
                "Anthropic API returned an empty response".to_string(),
            ));
        }

        let usage = api_resp.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        });

        Ok(Reply { text, usage })
    }
}

#[async_trait]
impl Trainer for AnthropicTrainer {
    fn provider(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &Completion) -> Result<Reply> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Generation(format!(
                "no Anthropic API key found. Run `coach key anthropic <key>` or set {API_KEY_ENV}."
            ))
        })?;

        let system = Self::build_system_prompt(&request.schema);
        let body = self.build_request(&system, request);

        let resp = self
            .client
            .post(API_URL)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Anthropic API error ({status}): {text}"
            )));
        }

        let api_resp: ApiResponse = resp.json().await?;
        let reply = Self::reply_from(api_resp)?;
        if let Some(usage) = reply.usage {
            debug!(
                input = usage.input_tokens,
                output = usage.output_tokens,
                "anthropic token usage"
            );
        }
        Ok(reply)
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completion() -> Completion {
        Completion {
            prompt: "Fitness Goal: endurance".to_string(),
            schema: json!({"type": "object", "required": ["routine"]}),
        }
    }

    #[test]
    fn default_model_when_none_given() {
        let trainer = AnthropicTrainer::new(None, None);
        assert_eq!(trainer.model(), DEFAULT_MODEL);
        assert_eq!(trainer.provider(), "anthropic");
    }

    #[test]
    fn system_prompt_embeds_schema() {
        let prompt = AnthropicTrainer::build_system_prompt(&completion().schema);
        assert!(prompt.contains(r#""required":["routine"]"#));
        assert!(prompt.contains("ONLY valid JSON"));
    }

    #[test]
    fn request_body_shape() {
        let trainer = AnthropicTrainer::new(Some("claude-test".to_string()), None);
        let request = completion();
        let body = trainer.build_request("sys", &request);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "claude-test");
        assert_eq!(json["system"], "sys");
        assert_eq!(json["max_tokens"], MAX_TOKENS);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Fitness Goal: endurance");
    }

    #[test]
    fn reply_joins_text_blocks_and_reads_usage() {
        let resp: ApiResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "{\"routine\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "[]}"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 34}
        }))
        .unwrap();
        let reply = AnthropicTrainer::reply_from(resp).unwrap();
        assert_eq!(reply.text, "{\"routine\":[]}");
        assert_eq!(reply.usage.unwrap().total(), 46);
    }

    #[test]
    fn empty_reply_is_generation_error() {
        let resp: ApiResponse =
            serde_json::from_value(json!({"content": [], "usage": null})).unwrap();
        assert!(matches!(
            AnthropicTrainer::reply_from(resp),
            Err(Error::Generation(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let trainer = AnthropicTrainer::new(None, None);
        let err = trainer.complete(&completion()).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().contains(API_KEY_ENV));
    }
}
