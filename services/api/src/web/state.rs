//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use terragen_core::ports::GenerationService;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Nothing here is mutable: requests share the provider handle and the
/// configuration, and everything else lives for a single request.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn GenerationService>,
    pub config: Arc<Config>,
}
