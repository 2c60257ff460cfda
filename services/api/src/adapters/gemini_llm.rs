//! services/api/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the Gemini generative-language API.
//! It implements the `GenerationService` port from the `core` crate by
//! speaking the `models/{model}:generateContent` REST protocol directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use terragen_core::{
    domain::{ChatRole, ModelRequest},
    ports::{GenerationService, PortError, PortResult},
};

//=========================================================================================
// Wire Types for the generateContent Endpoint
//=========================================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

fn user_content(text: impl Into<String>) -> Content {
    Content {
        role: Some("user".to_string()),
        parts: vec![Part { text: text.into() }],
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerationService` against the Gemini REST API.
///
/// One instance holds one long-lived `reqwest::Client`; it is constructed at
/// startup and shared across all requests through the application state.
#[derive(Clone)]
pub struct GeminiGenerationAdapter {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerationAdapter {
    /// Creates a new `GeminiGenerationAdapter`.
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Builds the wire request for a multi-turn call: prior history in order,
    /// then the outgoing message as a trailing user content.
    fn chat_body(request: &ModelRequest) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|message| Content {
                role: Some(role_name(message.role).to_string()),
                parts: vec![Part {
                    text: message.text.clone(),
                }],
            })
            .collect();
        contents.push(user_content(request.message.clone()));

        GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.to_string(),
                }],
            }),
            contents,
            generation_config: Some(GenerationConfig {
                max_output_tokens: request.max_output_tokens,
            }),
        }
    }

    /// Builds the wire request for a single-shot call. The composed prompt
    /// already carries its own instructions, so there is no separate system
    /// instruction and no token cap.
    fn single_body(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: None,
            contents: vec![user_content(prompt)],
            generation_config: None,
        }
    }

    /// Issues exactly one call to the provider and extracts the completion text.
    async fn call(&self, body: &GenerateContentRequest) -> PortResult<String> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| PortError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PortError::Provider(format!(
                "Gemini API returned {}: {}",
                status, detail
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PortError::Provider(e.to_string()))?;

        extract_text(payload)
    }
}

/// Pulls the completion text out of the first candidate, concatenating parts.
fn extract_text(response: GenerateContentResponse) -> PortResult<String> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        PortError::Provider("Gemini response contained no candidates.".to_string())
    })?;

    let content = candidate.content.ok_or_else(|| {
        PortError::Provider("Gemini candidate contained no content.".to_string())
    })?;

    if content.parts.is_empty() {
        return Err(PortError::Provider(
            "Gemini candidate contained no text parts.".to_string(),
        ));
    }

    Ok(content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .concat())
}

//=========================================================================================
// `GenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationService for GeminiGenerationAdapter {
    async fn send_chat(&self, request: &ModelRequest) -> PortResult<String> {
        self.call(&Self::chat_body(request)).await
    }

    async fn generate(&self, prompt: &str) -> PortResult<String> {
        self.call(&Self::single_body(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terragen_core::domain::ChatMessage;

    fn sample_request() -> ModelRequest {
        ModelRequest {
            system_instruction: "You are an expert.",
            history: vec![
                ChatMessage {
                    role: ChatRole::User,
                    text: "an s3 bucket".to_string(),
                },
                ChatMessage {
                    role: ChatRole::Model,
                    text: "resource \"aws_s3_bucket\" \"b\" {}".to_string(),
                },
            ],
            message: "make it versioned".to_string(),
            max_output_tokens: 2048,
        }
    }

    #[test]
    fn chat_body_uses_camel_case_wire_names() {
        let body = GeminiGenerationAdapter::chat_body(&sample_request());
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "You are an expert."
        );
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn chat_body_appends_message_after_history() {
        let body = GeminiGenerationAdapter::chat_body(&sample_request());
        let value = serde_json::to_value(&body).unwrap();
        let contents = value["contents"].as_array().unwrap();

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "an s3 bucket");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "make it versioned");
    }

    #[test]
    fn single_body_has_no_system_instruction_or_token_cap() {
        let body = GeminiGenerationAdapter::single_body("full prompt text");
        let value = serde_json::to_value(&body).unwrap();

        assert!(value.get("systemInstruction").is_none());
        assert!(value.get("generationConfig").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "full prompt text");
    }

    #[test]
    fn extract_text_concatenates_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "resource " }, { "text": "\"aws_s3_bucket\" \"b\" {}" }]
                }
            }]
        }))
        .unwrap();

        assert_eq!(
            extract_text(response).unwrap(),
            "resource \"aws_s3_bucket\" \"b\" {}"
        );
    }

    #[test]
    fn extract_text_rejects_empty_responses() {
        let no_candidates: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            extract_text(no_candidates),
            Err(PortError::Provider(_))
        ));

        let no_parts: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [] } }]
        }))
        .unwrap();
        assert!(matches!(extract_text(no_parts), Err(PortError::Provider(_))));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let adapter = GeminiGenerationAdapter::new(
            "key".to_string(),
            "gemini-2.5-flash-preview-05-20".to_string(),
            "https://generativelanguage.googleapis.com/".to_string(),
        );

        assert_eq!(
            adapter.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent"
        );
    }
}
