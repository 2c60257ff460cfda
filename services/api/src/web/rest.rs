//! services/api/src/web/rest.rs
//!
//! Contains the Axum handler for the generation endpoint and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use terragen_core::{
    domain::{GenerationMode, InvalidMode, Speaker, Turn},
    prompt::{chat_request, single_prompt, PromptError},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_handler,
    ),
    components(
        schemas(GenerateRequest, TurnPayload, SenderPayload, GenerateResponse, ErrorResponse)
    ),
    tags(
        (name = "Terragen API", description = "API endpoint for conversational Terraform generation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// One conversation turn as sent by the client.
#[derive(Deserialize, ToSchema)]
pub struct TurnPayload {
    pub sender: SenderPayload,
    pub text: String,
}

/// The wire form of a turn's speaker.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SenderPayload {
    User,
    Ai,
}

impl From<SenderPayload> for Speaker {
    fn from(sender: SenderPayload) -> Self {
        match sender {
            SenderPayload::User => Speaker::User,
            SenderPayload::Ai => Speaker::Ai,
        }
    }
}

/// The request payload: a conversation history, or a legacy prompt+mode pair.
///
/// The two shapes are dispatched by field presence; `history` wins when both
/// are supplied.
#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub history: Option<Vec<TurnPayload>>,
    pub prompt: Option<String>,
    pub mode: Option<String>,
}

/// The response payload carrying the cleaned completion text.
#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    pub text: String,
}

/// The response payload for every failure path.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate or update Terraform HCL from a conversation.
///
/// Accepts either a full conversation history or a legacy single prompt with
/// a mode tag, forwards it to the generative-model provider, and returns the
/// completion with markdown code fences stripped.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text returned", body = GenerateResponse),
        (status = 400, description = "Missing or invalid input", body = ErrorResponse),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Provider or configuration failure", body = ErrorResponse)
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let raw = if let Some(history) = request.history {
        let transcript: Vec<Turn> = history
            .into_iter()
            .map(|turn| Turn::new(Speaker::from(turn.sender), turn.text))
            .collect();

        let model_request =
            chat_request(&transcript).map_err(|e| bad_request(e.to_string()))?;

        app_state.llm.send_chat(&model_request).await
    } else if let Some(prompt) = request.prompt {
        if prompt.trim().is_empty() {
            return Err(bad_request(PromptError::EmptyPrompt.to_string()));
        }

        let mode = request
            .mode
            .as_deref()
            .and_then(|m| GenerationMode::from_str(m).ok())
            .ok_or_else(|| bad_request(InvalidMode.to_string()))?;

        let full_prompt = single_prompt(&prompt, mode).map_err(|e| bad_request(e.to_string()))?;

        app_state.llm.generate(&full_prompt).await
    } else {
        return Err(bad_request(PromptError::EmptyTranscript.to_string()));
    };

    match raw {
        Ok(text) => Ok(Json(GenerateResponse {
            text: strip_code_fences(&text),
        })),
        Err(e) => {
            // Provider detail goes to the log only; the caller gets a generic body.
            error!("Failed to generate content: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate content from AI.".to_string(),
                }),
            ))
        }
    }
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Removes markdown code-fence markers from generated text and trims the result.
///
/// Strips every occurrence of ```hcl or ```terraform (with their trailing
/// newline) and any bare triple backtick, leaving the fenced content itself
/// untouched.
pub fn strip_code_fences(text: &str) -> String {
    let fences = Regex::new("```hcl\n|```terraform\n|```").unwrap();
    fences.replace_all(text, "").trim().to_string()
}

//=========================================================================================
// Router Construction
//=========================================================================================

/// Builds the application router; shared by the `api` binary and the tests.
///
/// CORS is wide open on purpose: the UI and this endpoint may be served from
/// different origins during development. `Authorization` is allowed through
/// for deployments that put an auth layer in front; this service never
/// validates the token itself.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/generate", post(generate_handler))
        .layer(cors)
        .with_state(app_state)
}

//=========================================================================================
// Tests
//=========================================================================================
