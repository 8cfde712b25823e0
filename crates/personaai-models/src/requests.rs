use serde::{Deserialize, Serialize};

use super::types::Message;

/// Streaming relay request: the full message history plus the composed
/// persona-prefixed prompt for the new turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(rename = "fullPrompt")]
    pub full_prompt: String,
}

/// Earlier one-shot variant: just the composed prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chat_request_uses_camel_case_prompt_field() {
        let request = ChatStreamRequest {
            messages: vec![Message::user("hi")],
            full_prompt: "Respond concisely and directly. hi".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("fullPrompt").is_some());
        assert!(json.get("full_prompt").is_none());
    }

    #[test]
    fn chat_request_messages_default_to_empty() {
        let request: ChatStreamRequest =
            serde_json::from_str(r#"{"fullPrompt":"hello"}"#).unwrap();
        assert!(request.messages.is_empty());
        assert_eq!(request.full_prompt, "hello");
    }
}
