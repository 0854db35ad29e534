/*!
 * Core translation functionality.
 *
 * `TranslationService` performs one logical "translate this chunk" operation
 * against a provider. Each chunk moves through
 * `Pending -> Attempting(n) -> {Success | Attempting(n + 1) | Exhausted}`;
 * every attempt runs under its own timeout and the in-flight request is
 * dropped when that budget runs out.
 */

use std::time::Duration;

use log::{debug, error, info, trace, warn};

use crate::app_config::Config;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::openai::OpenAI;
use crate::subtitle_processor::SubtitleChunk;

use super::prompts::compose_prompt;
use super::retry::RetryPolicy;

/// Lifecycle of one chunk translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationState {
    Pending,
    Attempting(u32),
    Success,
    Exhausted,
}

impl TranslationState {
    /// First attempt of a pending chunk
    pub fn begin(self) -> Self {
        match self {
            Self::Pending => Self::Attempting(1),
            other => other,
        }
    }

    /// State after the current attempt failed
    pub fn on_failure(self, policy: &RetryPolicy) -> Self {
        match self {
            Self::Attempting(n) if policy.has_attempts_left(n) => Self::Attempting(n + 1),
            Self::Attempting(_) => Self::Exhausted,
            other => other,
        }
    }

    /// State after the current attempt succeeded
    pub fn on_success(self) -> Self {
        match self {
            Self::Attempting(_) => Self::Success,
            other => other,
        }
    }
}

/// Result of a single attempt, kept only for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    Failed(String),
}

/// Transient record of one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationAttempt {
    pub chunk_index: usize,
    pub attempt: u32,
    pub timeout: Duration,
    pub outcome: AttemptOutcome,
}

/// Main translation service for bilingual subtitle chunks
#[derive(Debug)]
pub struct TranslationService<P: Provider = OpenAI> {
    /// Provider implementation
    provider: P,

    /// Model identifier sent with every request
    model: String,

    /// Timeout and backoff schedule
    policy: RetryPolicy,
}

impl TranslationService<OpenAI> {
    /// Create a service talking to the OpenAI Responses API
    pub fn from_config(config: &Config) -> Result<Self, TranslationError> {
        let provider = OpenAI::new(config.api_key.clone(), config.endpoint.clone())?;
        Self::with_provider(provider, config)
    }
}

impl<P: Provider> TranslationService<P> {
    /// Create a service around any provider
    ///
    /// Fails immediately with `MissingCredential` when no API key is configured.
    pub fn with_provider(provider: P, config: &Config) -> Result<Self, TranslationError> {
        if config.api_key.trim().is_empty() {
            return Err(TranslationError::MissingCredential);
        }
        Ok(Self::new(provider, config.model.clone(), RetryPolicy::from_config(config)))
    }

    /// Create a service from its parts, without any credential check
    pub fn new(provider: P, model: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            model: model.into(),
            policy,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Translate one chunk, retrying with backoff
    ///
    /// Returns the raw response text; trimming is left to the caller.
    pub async fn translate_chunk(&self, chunk: &SubtitleChunk) -> Result<String, TranslationError> {
        let input = compose_prompt(&chunk.to_text());
        let preview = chunk.preview();

        let mut attempt = 1;
        let mut state = TranslationState::Pending.begin();
        loop {
            let budget = self.policy.timeout_for_attempt(attempt);
            info!(
                "  - Calling {} for chunk {} preview: \"{}...\" (Attempt {}/{})",
                self.model, chunk.index, preview, attempt, self.policy.max_attempts
            );

            let outcome = self.attempt(&input, budget).await;
            debug!(
                "{:?}",
                TranslationAttempt {
                    chunk_index: chunk.index,
                    attempt,
                    timeout: budget,
                    outcome: match &outcome {
                        Ok(_) => AttemptOutcome::Succeeded,
                        Err(e) => AttemptOutcome::Failed(e.to_string()),
                    },
                }
            );

            let error = match outcome {
                Ok(text) => {
                    trace!("Chunk {}: {:?} -> {:?}", chunk.index, state, state.on_success());
                    return Ok(text);
                }
                Err(error) => error,
            };

            warn!("  - Attempt {} failed: {}", attempt, error);
            if let ProviderError::Timeout { after } = &error {
                warn!(
                    "    The request was aborted after {}s. Increase OPENAI_TIMEOUT_MS or reduce chunk size if this recurs.",
                    after.as_secs_f64()
                );
            }
            debug!(
                "    Error details: kind={}, status={:?}, message={}",
                error.kind(),
                error.status_code(),
                error
            );

            let next = state.on_failure(&self.policy);
            trace!("Chunk {}: {:?} -> {:?}", chunk.index, state, next);
            let TranslationState::Attempting(next_attempt) = next else {
                error!(
                    "  - All {} attempts failed for chunk {}. Giving up on it.",
                    self.policy.max_attempts, chunk.index
                );
                return Err(TranslationError::Provider(error));
            };

            let delay = self.policy.backoff_for_attempt(attempt);
            info!("  - Retrying in {}s...", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
            attempt = next_attempt;
            state = next;
        }
    }

    /// One request bounded by `budget`; the request future is dropped on expiry
    async fn attempt(&self, input: &str, budget: Duration) -> Result<String, ProviderError> {
        let request = self.provider.build_request(&self.model, input);
        let response = tokio::time::timeout(budget, self.provider.complete(request))
            .await
            .map_err(|_| ProviderError::Timeout { after: budget })??;

        P::extract_text(&response).ok_or_else(|| {
            debug!("Response did not contain translated text. Full response: {:?}", response);
            ProviderError::ParseError("Invalid response format. No text found.".to_string())
        })
    }
}
