//! Chat-completion provider trait.

use crate::types::completion::CompletionResult;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for chat-completion services that turn a prompt into model output.
///
/// Implementations send exactly one logical request per call and return the provider's
/// JSON object untouched. Interpreting the result is left to the caller.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send `prompt` as a single user message and return the decoded response body.
    ///
    /// Fails with `Error::Unavailable` on transport failure, `Error::Status` on any
    /// non-200 answer and `Error::MalformedResponse` when the body is not a JSON object.
    async fn complete(&self, prompt: &str) -> std::result::Result<CompletionResult, Error>;
}
