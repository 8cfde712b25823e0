//! PersonaAI - persona-steered chat over the Gemini API.
//!
//! The binary hosts two surfaces over the same relay core: an axum web
//! server streaming chat responses to the embedded page, and a terminal
//! REPL driving the chat view directly.

pub mod app;
pub mod cli;
pub mod config;
pub mod conversation_logger;
pub mod web;

pub use cli::{Cli, Commands};
pub use config::ClientConfig;
pub use conversation_logger::ConversationLogger;
