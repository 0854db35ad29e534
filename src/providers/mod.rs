/*!
 * Provider implementations for the remote completion service.
 *
 * - OpenAI: Responses API integration
 * - Mock: scripted in-process provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all completion providers
///
/// The translation service only needs "submit text, receive text, may fail".
/// Providers build their own request type from a model and a prompt, and
/// know how to pull text back out of their response type.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync + Debug;

    /// Build a single text-completion request
    fn build_request(&self, model: &str, input: &str) -> Self::Request;

    /// Complete a request using this provider
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Returns
    /// * `Option<String>` - The extracted text, or None when the response holds no usable text
    fn extract_text(response: &Self::Response) -> Option<String>;
}

pub mod mock;
pub mod openai;
