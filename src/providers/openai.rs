use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Extracts text from one known response envelope shape
pub type TextExtractor = fn(&Value) -> Option<String>;

/// Response shapes tried in priority order; the first non-blank text wins
pub const RESPONSE_EXTRACTORS: [(&str, TextExtractor); 3] = [
    ("output_text", extract_output_text),
    ("output_items", extract_output_items),
    ("chat_choices", extract_chat_choices),
];

/// OpenAI client for the Responses API
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Responses API request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponsesRequest {
    /// The model to use
    pub model: String,

    /// Instruction prompt followed by the chunk text
    pub input: String,
}

impl ResponsesRequest {
    /// Create a new request
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
        }
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    ///
    /// No overall request timeout is set on the HTTP client; each attempt is
    /// bounded by the caller, which drops the in-flight future when its
    /// budget runs out.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| {
                error!("Failed to build HTTP client: {}", e);
                ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    fn responses_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/responses".to_string()
        } else {
            format!("{}/responses", self.endpoint.trim_end_matches('/'))
        }
    }

    /// Extract text by trying every known response shape in order
    pub fn extract_text_from_value(value: &Value) -> Option<String> {
        RESPONSE_EXTRACTORS.iter().find_map(|(name, extract)| {
            let text = extract(value).filter(|t| !t.trim().is_empty())?;
            debug!("Extracted response text using the '{}' shape", name);
            Some(text)
        })
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = ResponsesRequest;
    type Response = Value;

    fn build_request(&self, model: &str, input: &str) -> Self::Request {
        ResponsesRequest::new(model, input)
    }

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let response = self
            .client
            .post(self.responses_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(classify_status(status, error_text));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to decode OpenAI API response: {}", e)))
    }

    fn extract_text(response: &Self::Response) -> Option<String> {
        Self::extract_text_from_value(response)
    }
}

fn classify_status(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

/// Text carried by a content fragment: a bare string or an object with `text`
fn fragment_text(fragment: &Value) -> Option<&str> {
    match fragment {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("text").and_then(Value::as_str),
        _ => None,
    }
}

fn join_fragments(fragments: &[Value]) -> String {
    fragments.iter().filter_map(fragment_text).collect()
}

/// `{"output_text": "..."}`
pub fn extract_output_text(value: &Value) -> Option<String> {
    value
        .get("output_text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{"output": [{"content": [{"text": "..."}]}, ...]}`
///
/// Items without content (reasoning items, for instance) contribute nothing.
pub fn extract_output_items(value: &Value) -> Option<String> {
    let items = value.get("output")?.as_array()?;
    let text: String = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map
                .get("content")
                .and_then(Value::as_array)
                .map(|fragments| join_fragments(fragments)),
            _ => None,
        })
        .collect();
    Some(text)
}

/// `{"choices": [{"message": {"content": "..."}}]}`
pub fn extract_chat_choices(value: &Value) -> Option<String> {
    let message = value.get("choices")?.as_array()?.first()?.get("message")?;
    match message {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => match map.get("content")? {
            Value::String(s) => Some(s.clone()),
            Value::Array(fragments) => Some(join_fragments(fragments)),
            _ => None,
        },
        _ => None,
    }
}
