pub mod domain;
pub mod ports;
pub mod prompt;

pub use domain::{ChatMessage, ChatRole, GenerationMode, InvalidMode, ModelRequest, Speaker, Turn};
pub use ports::{GenerationService, PortError, PortResult};
pub use prompt::{chat_request, single_prompt, PromptError};
