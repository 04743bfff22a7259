//! Meeting summary domain: transcript model, prompt construction, the completion gateway
//! and retention of generated summaries.
//!
//! The provider abstraction lives in `meeting_ai`; its trait and result type are re-exported
//! here so that consumers of the `domain` crate do not need to depend on it directly.
pub use meeting_ai::{CompletionProvider, CompletionResult};

/// Identifier of a retained meeting summary.
pub type Id = uuid::Uuid;

pub mod error;
pub mod meeting;
pub mod meeting_summary;
pub mod prompt;
pub mod query;
pub mod summary_store;

pub mod gateway;
