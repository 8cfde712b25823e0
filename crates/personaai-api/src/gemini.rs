use anyhow::Result;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use personaai_models::{Message, Sender};

use crate::client::{StreamChunk, TextGenerator, TextStream, TokenUsage};
use crate::logging;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the Gemini API. The credential is carried here
/// explicitly; the client never reads the process environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub verbose: bool,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            verbose: false,
        }
    }
}

/// Client for Google's generative-language API
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(mut config: GeminiConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Conversation history in Gemini's alternating user/model turn format,
    /// with the composed prompt appended as the final user turn.
    fn build_contents(history: &[Message], prompt: &str) -> Vec<GeminiContent> {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|msg| GeminiContent {
                role: match msg.from {
                    Sender::User => "user",
                    Sender::Bot => "model",
                }
                .to_string(),
                parts: vec![GeminiPart {
                    text: msg.text.clone(),
                }],
            })
            .collect();

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        });

        contents
    }

    /// Parse a single SSE line; returns a chunk if the line carried text,
    /// a finish reason, or usage counts. Non-data lines yield nothing.
    fn parse_sse_line(line: &str) -> Option<StreamChunk> {
        let data = line.strip_prefix("data: ")?;

        let response: GeminiResponse = serde_json::from_str(data.trim()).ok()?;

        let mut chunk = StreamChunk::default();
        if let Some(candidates) = response.candidates {
            for candidate in candidates {
                if let Some(content) = candidate.content {
                    for part in content.parts {
                        if let Some(text) = part.text {
                            chunk.delta.push_str(&text);
                        }
                    }
                }
                if candidate.finish_reason.is_some() {
                    chunk.finish_reason = candidate.finish_reason;
                }
            }
        }
        chunk.usage = response.usage_metadata.map(TokenUsage::from);

        if chunk.delta.is_empty() && chunk.finish_reason.is_none() && chunk.usage.is_none() {
            return None;
        }
        Some(chunk)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: Self::build_contents(&[], prompt),
        };

        let url = format!("{}?key={}", self.generate_url(), self.config.api_key);
        logging::log_request(
            &self.generate_url(),
            &serde_json::to_value(&request)?,
            &self.config.api_key,
            self.config.verbose,
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            logging::log_response_error(&status, &body, self.config.verbose);
            anyhow::bail!("Gemini API error: {} - {}", status, body);
        }

        let api_response: GeminiResponse = response.json().await?;
        if let Some(error) = &api_response.error {
            anyhow::bail!("Gemini error: {}", error.message);
        }

        let mut text = String::new();
        for candidate in api_response.candidates.unwrap_or_default() {
            if let Some(content) = candidate.content {
                for part in content.parts {
                    if let Some(t) = part.text {
                        text.push_str(&t);
                    }
                }
            }
        }
        if text.is_empty() {
            anyhow::bail!("No content in Gemini response");
        }
        Ok(text)
    }

    async fn stream_reply(&self, history: &[Message], prompt: &str) -> Result<TextStream> {
        let request = GeminiRequest {
            contents: Self::build_contents(history, prompt),
        };

        let url = format!("{}?alt=sse&key={}", self.stream_url(), self.config.api_key);
        logging::log_request(
            &self.stream_url(),
            &serde_json::to_value(&request)?,
            &self.config.api_key,
            self.config.verbose,
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            logging::log_response_error(&status, &body, self.config.verbose);
            anyhow::bail!("Gemini API streaming error: {} - {}", status, body);
        }

        let mut byte_stream = response.bytes_stream();
        let verbose = self.config.verbose;

        let stream = stream! {
            let mut buffer = String::new();
            let mut chunk_counter = 0;

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));

                        // Process complete SSE lines ("data: {json}\n")
                        while let Some(line_end) = buffer.find('\n') {
                            let line = buffer[..line_end].to_string();
                            buffer = buffer[line_end + 1..].to_string();

                            chunk_counter += 1;
                            logging::log_stream_chunk(chunk_counter, &line, verbose);

                            if let Some(chunk) = Self::parse_sse_line(&line) {
                                yield Ok(chunk);
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(anyhow::anyhow!("Error reading stream: {}", e));
                        break;
                    }
                }
            }

            // Trailing data without a final newline
            if !buffer.trim().is_empty() {
                if let Some(chunk) = Self::parse_sse_line(buffer.trim_end()) {
                    yield Ok(chunk);
                }
            }
        };

        Ok(Box::new(Box::pin(stream)))
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Clone)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Clone)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<usize>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<usize>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<usize>,
}

impl From<GeminiUsage> for TokenUsage {
    fn from(u: GeminiUsage) -> Self {
        let prompt = u.prompt_token_count.unwrap_or(0);
        let completion = u.candidates_token_count.unwrap_or(0);
        TokenUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: u.total_token_count.unwrap_or(prompt + completion),
        }
    }
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_contents_alternates_roles_and_appends_prompt() {
        let history = vec![
            Message::user("Hello"),
            Message::bot("Hi there!"),
            Message::user("What is 2+2?"),
        ];

        let contents =
            GeminiClient::build_contents(&history, "Respond concisely and directly. What is 2+2?");

        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert_eq!(contents[3].role, "user");
        assert_eq!(
            contents[3].parts[0].text,
            "Respond concisely and directly. What is 2+2?"
        );
    }

    #[test]
    fn parse_sse_line_extracts_text_delta() {
        let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"4"}],"role":"model"}}]}"#;
        let chunk = GeminiClient::parse_sse_line(line).unwrap();
        assert_eq!(chunk.delta, "4");
        assert_eq!(chunk.finish_reason, None);
    }

    #[test]
    fn parse_sse_line_surfaces_finish_reason_and_usage() {
        let line = concat!(
            r#"data: {"candidates":[{"content":{"parts":[{"text":"."}],"role":"model"},"#,
            r#""finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":7,"#,
            r#""candidatesTokenCount":2,"totalTokenCount":9}}"#
        );
        let chunk = GeminiClient::parse_sse_line(line).unwrap();
        assert_eq!(chunk.delta, ".");
        assert_eq!(chunk.finish_reason.as_deref(), Some("STOP"));
        let usage = chunk.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 7);
        assert_eq!(usage.completion_tokens, 2);
        assert_eq!(usage.total_tokens, 9);
    }

    #[test]
    fn parse_sse_line_ignores_non_data_lines() {
        assert!(GeminiClient::parse_sse_line("").is_none());
        assert!(GeminiClient::parse_sse_line(": keepalive").is_none());
        assert!(GeminiClient::parse_sse_line("event: ping").is_none());
    }

    #[test]
    fn parse_sse_line_ignores_unparseable_payloads() {
        assert!(GeminiClient::parse_sse_line("data: not-json").is_none());
        assert!(GeminiClient::parse_sse_line("data: {}").is_none());
    }

    #[test]
    fn client_normalizes_trailing_slash_in_base_url() {
        let mut config = GeminiConfig::new("test-key".to_string());
        config.base_url = "http://localhost:9090/v1beta/".to_string();
        let client = GeminiClient::new(config);
        assert_eq!(
            client.stream_url(),
            "http://localhost:9090/v1beta/models/gemini-2.0-flash:streamGenerateContent"
        );
    }
}
