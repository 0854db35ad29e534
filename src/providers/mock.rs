/*!
 * Mock provider implementation for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with "translated" text
 * - `MockProvider::fail_first(n)` - Fails the first `n` calls, then succeeds
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::fail_when_contains(s)` - Fails whenever the input contains `s`
 *
 * Every call is counted and recorded with its (tokio) timestamp so tests can
 * assert attempt counts and backoff spacing.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::prompts::BILINGUAL_PROMPT;

/// Marker prepended to every successful mock response
pub const MOCK_TRANSLATION_MARKER: &str = "[ZH]";

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Model identifier
    pub model: String,
    /// Full prompt sent to the service
    pub input: String,
}

impl MockRequest {
    /// The chunk text without the instruction prompt
    pub fn chunk_text(&self) -> &str {
        self.input
            .strip_prefix(BILINGUAL_PROMPT)
            .map(str::trim_start)
            .unwrap_or(&self.input)
    }
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The response text; `None` simulates an unrecognised response shape
    pub text: Option<String>,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails the first `failures` calls, then succeeds
    FailFirst { failures: usize },
    /// Always fails with an error
    Failing,
    /// Fails whenever the input contains the needle
    FailWhenContains(&'static str),
    /// Returns a response without any text
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Inputs and call times, shared between clones
    calls: Arc<Mutex<Vec<(Instant, String)>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that fails `failures` times before succeeding
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails on inputs containing `needle`
    pub fn fail_when_contains(needle: &'static str) -> Self {
        Self::new(MockBehavior::FailWhenContains(needle))
    }

    /// Create a mock that returns responses without text
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Inputs received so far, in call order
    pub fn inputs(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(_, input)| input.clone()).collect())
            .unwrap_or_default()
    }

    /// Gaps between consecutive calls
    pub fn call_gaps(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .map(|calls| calls.windows(2).map(|w| w[1].0 - w[0].0).collect())
            .unwrap_or_default()
    }

    /// The text a working mock returns for a chunk
    pub fn translated(chunk_text: &str) -> String {
        format!("{}\n{}\n", MOCK_TRANSLATION_MARKER, chunk_text)
    }

    fn success(request: &MockRequest) -> MockResponse {
        MockResponse {
            text: Some(Self::translated(request.chunk_text())),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    fn build_request(&self, model: &str, input: &str) -> Self::Request {
        MockRequest {
            model: model.to_string(),
            input: input.to_string(),
        }
    }

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((Instant::now(), request.input.clone()));
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::success(&request)),

            MockBehavior::FailFirst { failures } => {
                if count < failures {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::success(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: format!("Simulated provider failure (request #{})", count + 1),
                status_code: 500,
            }),

            MockBehavior::FailWhenContains(needle) => {
                if request.input.contains(needle) {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated connection reset for input containing {:?}",
                        needle
                    )))
                } else {
                    Ok(Self::success(&request))
                }
            }

            MockBehavior::Empty => Ok(MockResponse { text: None }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::success(&request))
            }
        }
    }

    fn extract_text(response: &Self::Response) -> Option<String> {
        response.text.clone().filter(|t| !t.trim().is_empty())
    }
}
