//! Optional AI collaborators.
//!
//! The store and the batch command only see the [`Summarizer`] and
//! [`FileProcessor`] traits. [`OpenAiClient`] talks to an OpenAI-compatible
//! chat completions endpoint; [`Unavailable`] stands in when no credential is
//! configured so that a missing key is an ordinary error path.

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TaskError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SUMMARY_SYSTEM_PROMPT: &str = "You summarize tasks as very short phrases, 15 words or less. \
Output only the bare summary with no extra commentary.";
const SUMMARY_USER_PREFIX: &str = "Summarize the following task description as a very short phrase:\n\n";
const SUMMARY_MAX_TOKENS: u32 = 32;

const PROCESS_SYSTEM_PROMPT: &str = "You are an assistant that helps produce a clear, finished version of a \
student's homework file. Return only the revised file content (no extra explanatory text). \
If the file contains code, return runnable code where possible.";
const PROCESS_USER_PREFIX: &str = "Process and improve the following file content. \
Return only the new file contents (no commentary):\n\n";
const PROCESS_MAX_TOKENS: u32 = 1600;

const TEMPERATURE: f32 = 0.2;

/// Turns a task description into a short phrase.
pub trait Summarizer {
    fn summarize(&self, text: &str) -> Result<String>;
}

/// Rewrites the content of a single file.
pub trait FileProcessor {
    fn process_file(&self, content: &str, filename: &str) -> Result<String>;
}

/// Connection settings for an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// `None` waits for the remote side indefinitely.
    pub timeout: Option<Duration>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        OpenAiConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| TaskError::unavailable("OPENAI_API_KEY not set; cannot call OpenAI API."))?;
        let mut config = OpenAiConfig::new(api_key);
        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Blocking chat-completions client.
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| TaskError::unavailable(format!("invalid API key: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(OpenAiClient { client, config })
    }

    pub fn from_env() -> Result<Self> {
        OpenAiClient::new(OpenAiConfig::from_env()?)
    }

    fn complete(&self, system: &str, user: String, max_tokens: u32) -> Result<String> {
        debug!(model = %self.config.model, max_tokens, "requesting chat completion");
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system.to_string() },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(text);
            return Err(TaskError::unavailable(format!("OpenAI API error ({}): {message}", status.as_u16())));
        }

        let completion: ChatResponse = response.json()?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TaskError::unavailable("Unexpected response from OpenAI API"))
    }
}

impl Summarizer for OpenAiClient {
    fn summarize(&self, text: &str) -> Result<String> {
        let summary = self.complete(SUMMARY_SYSTEM_PROMPT, format!("{SUMMARY_USER_PREFIX}{text}"), SUMMARY_MAX_TOKENS)?;
        Ok(summary.trim().to_string())
    }
}

impl FileProcessor for OpenAiClient {
    fn process_file(&self, content: &str, filename: &str) -> Result<String> {
        debug!(filename, "processing file");
        self.complete(PROCESS_SYSTEM_PROMPT, format!("{PROCESS_USER_PREFIX}{content}"), PROCESS_MAX_TOKENS)
    }
}

/// Stand-in collaborator that always fails with the reason it was built with.
#[derive(Debug, Clone)]
pub struct Unavailable {
    reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Unavailable { reason: reason.into() }
    }
}

impl Summarizer for Unavailable {
    fn summarize(&self, _text: &str) -> Result<String> {
        Err(TaskError::unavailable(self.reason.clone()))
    }
}

impl FileProcessor for Unavailable {
    fn process_file(&self, _content: &str, _filename: &str) -> Result<String> {
        Err(TaskError::unavailable(self.reason.clone()))
    }
}

/// Build the OpenAI client from the environment, or an [`Unavailable`] explaining why not.
pub fn client_from_env() -> std::result::Result<OpenAiClient, Unavailable> {
    OpenAiClient::from_env().map_err(|e| match e {
        TaskError::CollaboratorUnavailable(reason) => Unavailable::new(reason),
        other => Unavailable::new(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reports_its_reason() {
        let u = Unavailable::new("OPENAI_API_KEY not set");
        let err = u.summarize("anything").unwrap_err();
        assert!(matches!(err, TaskError::CollaboratorUnavailable(ref r) if r == "OPENAI_API_KEY not set"));
        assert!(u.process_file("x", "a.txt").is_err());
    }

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage { role: "user", content: "hi".into() }],
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "gpt-4o-mini");
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["max_tokens"], 32);
    }

    #[test]
    fn reply_without_content_is_tolerated_by_parser() {
        let r: ChatResponse = serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(r.choices[0].message.content.is_none());
    }
}
