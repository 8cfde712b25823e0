use serde::{Deserialize, Serialize};

/// One-shot variant response: the complete generated text as one JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Fixed error body returned for every failure detected before streaming
/// starts. The client never sees provider detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn generic() -> Self {
        Self {
            error: "Error generating response".to_string(),
        }
    }
}
