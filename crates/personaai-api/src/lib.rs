//! Provider client for PersonaAI.
//!
//! Wraps the hosted generative-language-model API behind the
//! [`TextGenerator`] capability: create a generation call seeded with the
//! conversation history and stream the generated text for the new turn.

pub mod client;
pub mod gemini;
pub mod logging;

pub use client::{StreamChunk, TextGenerator, TextStream, TokenUsage};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL, GEMINI_API_BASE};
pub use logging::{log_request, log_response_error, log_stream_chunk, safe_truncate};
