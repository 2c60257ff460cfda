//! crates/terragen_core/src/prompt.rs
//!
//! The prompt formatter: pure functions that turn a conversation transcript
//! (or a single free-text request plus a mode) into the exact payload sent
//! to the generative model.

const SYSTEM_INSTRUCTION: &str = r#"You are an expert in Terraform and Infrastructure as Code.
Your task is to generate and iteratively update Terraform HCL code based on the user's conversation.
When generating code, only output the raw code block, without any explanation, comments, or markdown formatting.
If the user asks for an explanation or a change, respond naturally, but always provide the complete, updated code block in your final response."#;

const GENERATE_TEMPLATE: &str = r#"You are an expert in Terraform and Infrastructure as Code.
Your task is to generate valid Terraform HCL code based on the user's request.
Only output the raw code block, without any explanation, comments, or markdown formatting like ```hcl.
User request: "{request}""#;

const EXPLAIN_TEMPLATE: &str = r#"You are a helpful assistant who explains technical concepts simply.
Explain the following Terraform code block. Describe what each resource does and what the overall configuration achieves. Format the output clearly.
Terraform Code:
---
{request}
---"#;

const SUGGEST_TEMPLATE: &str = r#"You are a DevOps security and performance expert.
Review this Terraform code and suggest improvements for security, cost-effectiveness, and performance.
Provide actionable feedback in a structured list. If the code is already good, state that and explain why.
Terraform Code:
---
{request}
---"#;

/// Hard ceiling on generated output for multi-turn calls, regardless of input size.
const MAX_OUTPUT_TOKENS: u32 = 2048;

use crate::domain::{ChatMessage, GenerationMode, ModelRequest, Turn};

/// Error returned when the caller supplied nothing to format.
///
/// The `Display` text is safe to show to the caller verbatim.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Conversation history is required.")]
    EmptyTranscript,
    #[error("Prompt is required.")]
    EmptyPrompt,
}

/// Builds the multi-turn model request from a conversation transcript.
///
/// Every turn except the last becomes role-mapped prior context, in original
/// order; the last turn's text is the outgoing message. The system
/// instruction is constant and independent of transcript content.
pub fn chat_request(transcript: &[Turn]) -> Result<ModelRequest, PromptError> {
    let (last, prior) = transcript
        .split_last()
        .ok_or(PromptError::EmptyTranscript)?;

    Ok(ModelRequest {
        system_instruction: SYSTEM_INSTRUCTION,
        history: prior.iter().map(ChatMessage::from).collect(),
        message: last.text.clone(),
        max_output_tokens: MAX_OUTPUT_TOKENS,
    })
}

/// Wraps a single free-text request in the instruction template for `mode`.
pub fn single_prompt(text: &str, mode: GenerationMode) -> Result<String, PromptError> {
    if text.trim().is_empty() {
        return Err(PromptError::EmptyPrompt);
    }

    let template = match mode {
        GenerationMode::Generate => GENERATE_TEMPLATE,
        GenerationMode::Explain => EXPLAIN_TEMPLATE,
        GenerationMode::Suggest => SUGGEST_TEMPLATE,
    };

    Ok(template.replace("{request}", text))
}
