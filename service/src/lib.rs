//! Process-wide infrastructure shared by every layer: configuration and logging.
//!
//! Both are established once at startup and are read-only afterwards.

pub mod config;
pub mod logging;
