//! This module holds typed parameters for various endpoint inputs.
//!
//! By using typed parameters, inputs are validated (by type) before they reach the domain
//! layer. Each parameter type converts into the domain type the controller hands on.

pub(crate) mod meeting_summary;
