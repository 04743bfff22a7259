//! Meeting AI abstraction layer for chat-completion providers.
//!
//! This crate provides the provider-agnostic pieces of the summary pipeline:
//! - the `completion::Provider` trait implemented by concrete gateways
//! - the completion request payload sent to a provider
//! - an open-schema `CompletionResult` with extraction helpers for the few
//!   fields that are actually consumed
//!
//! Provider implementations live outside this crate so the summary workflow can be
//! tested against stubs and pointed at any OpenAI-compatible endpoint.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use traits::completion::Provider as CompletionProvider;
pub use types::completion::{CompletionResult, Message, Request as CompletionRequest, Role};
