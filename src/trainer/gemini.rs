use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{Completion, Reply, TokenUsage, Trainer};
use crate::error::{Error, Result};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_KEY_ENV: &str = "GOOGLE_GENAI_API_KEY";

/// Schema keywords Gemini's `responseSchema` accepts. Anything else is dropped.
const SUPPORTED_KEYWORDS: &[&str] = &[
    "type",
    "format",
    "description",
    "nullable",
    "enum",
    "properties",
    "required",
    "items",
    "minItems",
    "maxItems",
    "minimum",
    "maximum",
];

/// A trainer backed by Google's Gemini `generateContent` endpoint.
///
/// Gemini can constrain its output to a schema directly, so the declared
/// schema is sent as `responseSchema` rather than described in the prompt.
pub struct GeminiTrainer {
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiTrainer {
    pub fn new(model: Option<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE_URL}/models/{}:generateContent", self.model)
    }

    fn build_request(request: &Completion) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: to_gemini_schema(&request.schema),
            },
        }
    }

    fn reply_from(resp: GeminiResponse) -> Result<Reply> {
        let text: String = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Generation(
                "Gemini API returned an empty response".to_string(),
            ));
        }

        let usage = resp.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        Ok(Reply { text, usage })
    }
}

#[async_trait]
impl Trainer for GeminiTrainer {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &Completion) -> Result<Reply> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Generation(format!(
                "no Gemini API key found. Run `coach key gemini <key>` or set {API_KEY_ENV}."
            ))
        })?;

        let resp = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request(request))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Gemini API error ({status}): {text}"
            )));
        }

        let reply = Self::reply_from(resp.json().await?)?;
        if let Some(usage) = reply.usage {
            debug!(
                input = usage.input_tokens,
                output = usage.output_tokens,
                "gemini token usage"
            );
        }
        Ok(reply)
    }
}

/// Translate a JSON Schema into Gemini's OpenAPI-style subset: upper-case
/// type names, unsupported keywords removed.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(obj) => {
            let mut out = Map::new();
            for (key, value) in obj {
                if !SUPPORTED_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let converted = match (key.as_str(), value) {
                    ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                    ("properties", Value::Object(props)) => Value::Object(
                        props
                            .iter()
                            .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                            .collect(),
                    ),
                    ("items", items) => to_gemini_schema(items),
                    (_, other) => other.clone(),
                };
                out.insert(key.clone(), converted);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

// --- API types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
