use async_stream::stream;
use axum::{
    body::{Body, Bytes},
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use colored::Colorize;
use futures_util::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

use personaai_api::TextGenerator;
use personaai_models::{ChatStreamRequest, ErrorBody, GenerateRequest, GenerateResponse};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayState>,
}

/// The relay's provider capability, injected at router construction.
/// `None` when no credential was configured at startup.
pub struct RelayState {
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub verbose: bool,
}

impl RelayState {
    fn generator(&self) -> Result<Arc<dyn TextGenerator>, RelayError> {
        self.generator.clone().ok_or(RelayError::MissingCredential)
    }
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_stream))
        .route("/api/generate", post(generate))
        .route("/", get(serve_index))
        .with_state(state)
}

/// POST /api/chat - relay the conversation to the provider and stream the
/// decoded text chunks back as chunked plain text.
async fn chat_stream(
    State(state): State<AppState>,
    payload: Result<Json<ChatStreamRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(request) = payload.map_err(RelayError::Input)?;
    let generator = state.relay.generator()?;

    let request_id = Uuid::new_v4();
    if state.relay.verbose {
        println!(
            "{}",
            format!(
                "📨 [{}] relaying {} message(s)",
                request_id,
                request.messages.len()
            )
            .bright_black()
        );
    }

    // The provider call completes before any response byte is written, so
    // every failure up to here still becomes the fixed error response.
    let mut upstream = generator
        .stream_reply(&request.messages, &request.full_prompt)
        .await
        .map_err(RelayError::Provider)?;

    let verbose = state.relay.verbose;
    let body_stream = stream! {
        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    if !chunk.delta.is_empty() {
                        yield Ok::<Bytes, Infallible>(Bytes::from(chunk.delta));
                    }
                    if verbose {
                        if let Some(usage) = chunk.usage {
                            println!(
                                "{}",
                                format!(
                                    "📊 [{}] Prompt: {} | Completion: {} | Total: {}",
                                    request_id,
                                    usage.prompt_tokens,
                                    usage.completion_tokens,
                                    usage.total_tokens
                                )
                                .bright_black()
                            );
                        }
                    }
                }
                Err(e) => {
                    // Bytes are already on the wire; a clean error response
                    // is no longer possible. Log and close the stream.
                    eprintln!(
                        "{} [{}] stream failed mid-flight: {}",
                        "❌".bright_red(),
                        request_id,
                        e
                    );
                    break;
                }
            }
        }
    };

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body_stream),
    )
        .into_response())
}

/// POST /api/generate - earlier one-shot variant: the complete reply as a
/// single JSON object.
async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, RelayError> {
    let Json(request) = payload.map_err(RelayError::Input)?;
    let generator = state.relay.generator()?;

    if state.relay.verbose {
        println!(
            "{}",
            format!("📨 Received prompt: {}", request.prompt).bright_black()
        );
    }

    let text = generator
        .generate(&request.prompt)
        .await
        .map_err(RelayError::Provider)?;

    Ok(Json(GenerateResponse { response: text }))
}

/// GET / - Serve the chat page
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

/// Relay failures detected before any response byte is written.
#[derive(Debug)]
pub enum RelayError {
    Input(JsonRejection),
    MissingCredential,
    Provider(anyhow::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Input(e) => eprintln!("{} bad relay request: {}", "❌".bright_red(), e),
            RelayError::MissingCredential => {
                eprintln!("{} GOOGLE_API_KEY is not configured", "❌".bright_red())
            }
            RelayError::Provider(e) => {
                eprintln!("{} error generating response: {}", "❌".bright_red(), e)
            }
        }

        // One generic server error for every pre-stream failure; the
        // client never sees provider detail.
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::generic())).into_response()
    }
}
