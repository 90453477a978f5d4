//! Text generation clients
//!
//! [`TextGenerator`] is the seam between the narrative composer and any
//! remote model. [`OpenAiClient`] talks to an OpenAI-compatible chat
//! completions endpoint with retry; [`MockTextGenerator`] replays canned
//! responses for tests.

use crate::config::PersonalizationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

/// A single generation request: persona plus user prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce text for the request. Implementations may be slow or fail;
    /// callers are expected to bound and tolerate both.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions client with retry on transient failures
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl OpenAiClient {
    pub fn new(api_key: String, settings: &PersonalizationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/chat/completions",
                settings.api_base.trim_end_matches('/')
            ),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_retries: settings.max_retries,
            retry_delay_ms: settings.retry_delay_ms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn make_request(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let completion: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::External(format!("Failed to parse response: {e}")))?;
                completion
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .map(|text| text.trim().to_string())
                    .ok_or_else(|| Error::External("Response contained no choices".to_string()))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Err(Error::External("Rate limit exceeded".to_string()))
            }
            StatusCode::UNAUTHORIZED => Err(Error::Config("Invalid API key".to_string())),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Error::External(format!("API error {status}: {error_text}")))
            }
        }
    }

    fn calculate_backoff(&self, retry_count: u32) -> u64 {
        self.retry_delay_ms
            .saturating_mul(2u64.saturating_pow(retry_count.saturating_sub(1)))
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let mut retry_count = 0;
        loop {
            match self.make_request(request).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if retry_count >= self.max_retries || !e.is_transient() {
                        return Err(e);
                    }
                    retry_count += 1;
                    let delay = self.calculate_backoff(retry_count);
                    warn!(
                        "Text generation attempt {} failed ({}), retrying in {}ms",
                        retry_count, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }
}

// Internal API response structures
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Type alias for recorded generation requests
type RecordedRequests = Arc<Mutex<Vec<GenerationRequest>>>;

/// Replays queued responses in order and records every request
pub struct MockTextGenerator {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    delay: Option<Duration>,
    requests: RecordedRequests,
}

impl MockTextGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep before answering, to exercise timeouts
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn add_response(&self, response: Result<String>) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn add_success_response(&self, text: &str) {
        self.add_response(Ok(text.to_string())).await;
    }

    pub async fn add_error_response(&self, message: &str) {
        self.add_response(Err(Error::External(message.to_string())))
            .await;
    }

    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        let next = self.responses.lock().await.pop_front();
        if next.is_none() {
            debug!("Mock generator has no queued response");
        }
        next.unwrap_or_else(|| Err(Error::External("No mock response configured".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base() {
        let settings = PersonalizationConfig {
            api_base: "https://api.example.com/v1/".to_string(),
            ..PersonalizationConfig::default()
        };
        let client = OpenAiClient::new("key".to_string(), &settings).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_backoff_doubles() {
        let settings = PersonalizationConfig {
            retry_delay_ms: 100,
            ..PersonalizationConfig::default()
        };
        let client = OpenAiClient::new("key".to_string(), &settings).unwrap();
        assert_eq!(client.calculate_backoff(1), 100);
        assert_eq!(client.calculate_backoff(2), 200);
        assert_eq!(client.calculate_backoff(3), 400);
    }

    #[test]
    fn test_backoff_saturates() {
        let settings = PersonalizationConfig {
            retry_delay_ms: u64::MAX / 2,
            ..PersonalizationConfig::default()
        };
        let client = OpenAiClient::new("key".to_string(), &settings).unwrap();
        assert_eq!(client.calculate_backoff(3), u64::MAX);
        assert_eq!(client.calculate_backoff(u32::MAX), u64::MAX);
    }

    #[test]
    fn test_chat_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.5,
            max_tokens: 10,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_chat_response_parsing() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":" Hello "}}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some(" Hello ")
        );
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockTextGenerator::new();
        mock.add_success_response("first").await;
        mock.add_error_response("boom").await;

        let request = GenerationRequest {
            system: "persona".to_string(),
            prompt: "prompt".to_string(),
        };
        assert_eq!(mock.generate(&request).await.unwrap(), "first");
        assert!(mock.generate(&request).await.is_err());
        assert!(mock.generate(&request).await.is_err());
        assert_eq!(mock.requests().await.len(), 3);
    }
}
