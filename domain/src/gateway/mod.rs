//! Clients for the external services the domain talks to.

pub mod chat_completion;
pub mod retry;
