//! PodBot Chat API Library
//!
//! Chat-session orchestration between an end user, an OpenAI-compatible
//! completion model, and a remote working-memory store (AMS).
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Memory store client module
pub mod memory;

/// Completion adapter module
pub mod llm;

/// Session orchestration module
pub mod chat;

/// HTTP routing module
pub mod server;

/// Telemetry and Observability
pub mod telemetry;
