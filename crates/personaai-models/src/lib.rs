// Models module - data structures shared by the relay and the chat view
pub mod persona;
pub mod requests;
pub mod responses;
pub mod types;

// Re-export commonly used types
pub use persona::{builtin_personas, Persona};
pub use requests::{ChatStreamRequest, GenerateRequest};
pub use responses::{ErrorBody, GenerateResponse};
pub use types::{Message, Sender};
