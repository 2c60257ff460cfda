//! crates/terragen_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the Gemini API.

use async_trait::async_trait;

use crate::domain::ModelRequest;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external provider (network,
/// HTTP status, malformed response body).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends a formatted multi-turn request and returns the raw completion text.
    async fn send_chat(&self, request: &ModelRequest) -> PortResult<String>;

    /// Sends a single fully-composed prompt and returns the raw completion text.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}
