//! crates/terragen_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use std::str::FromStr;

/// Identifies who produced a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Ai,
}

/// Represents a single message in a conversation transcript.
///
/// Turns are immutable once created and their ordering is chronological:
/// the last turn in a transcript is the one that triggers the next model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// The role vocabulary understood by the generative-model provider.
///
/// User turns keep the "user" role; every other speaker maps to "model".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl From<Speaker> for ChatRole {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::User => ChatRole::User,
            _ => ChatRole::Model,
        }
    }
}

/// A single role-mapped prior turn, ready to be sent as model context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: ChatRole::from(turn.speaker),
            text: turn.text.clone(),
        }
    }
}

/// The complete, derived payload for one multi-turn model call.
///
/// Built fresh per request and never persisted. `history` holds every turn
/// except the last, in original order; `message` is the last turn's text.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_instruction: &'static str,
    pub history: Vec<ChatMessage>,
    pub message: String,
    pub max_output_tokens: u32,
}

/// Selects the instruction template for the legacy single-prompt flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Generate,
    Explain,
    Suggest,
}

/// Error returned when a mode string is not one of the supported values.
#[derive(Debug, thiserror::Error)]
#[error("Invalid mode specified.")]
pub struct InvalidMode;

impl FromStr for GenerationMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(GenerationMode::Generate),
            "explain" => Ok(GenerationMode::Explain),
            "suggest" => Ok(GenerationMode::Suggest),
            _ => Err(InvalidMode),
        }
    }
}
