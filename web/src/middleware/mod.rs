pub mod auth_context;
pub mod correlation_id;
