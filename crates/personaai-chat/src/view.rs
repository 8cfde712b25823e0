use thiserror::Error;

use personaai_models::{Message, Persona};

use crate::scroll::ScrollTracker;

/// Where the view is in one send/receive cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Sending,
    Streaming,
    Error,
}

/// Everything needed to issue one relay call: the history including the
/// just-appended user message, and the persona-composed prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub messages: Vec<Message>,
    pub full_prompt: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("input is empty")]
    EmptyInput,
    #[error("a send is already in flight")]
    Busy,
    #[error("no response stream is in progress")]
    NoStream,
    #[error("chunk for index {0} is outside the pending bot message")]
    NotPending(usize),
}

/// Reducer: a new message sequence with `text` appended to the message at
/// `index`. The input is never mutated; an out-of-range index returns the
/// sequence unchanged.
pub fn append_chunk(messages: &[Message], index: usize, text: &str) -> Vec<Message> {
    let mut updated = messages.to_vec();
    if let Some(message) = updated.get_mut(index) {
        message.text.push_str(text);
    }
    updated
}

/// Conversation state for one chat session.
///
/// Invariant: while a stream is consumed, exactly one pending bot message
/// exists and it is the last list element. It is appended once by
/// [`ChatView::begin_stream`] and then only extended, never duplicated —
/// a second send is refused until the loading flag clears.
pub struct ChatView {
    messages: Vec<Message>,
    persona: Persona,
    input: String,
    state: ViewState,
    error: Option<String>,
    scroll: ScrollTracker,
}

impl ChatView {
    pub fn new(persona: Persona) -> Self {
        Self {
            messages: Vec::new(),
            persona,
            input: String::new(),
            state: ViewState::Idle,
            error: None,
            scroll: ScrollTracker::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// True from submit until the stream finishes or fails. While set, the
    /// send affordance is disabled, serializing sends.
    pub fn loading(&self) -> bool {
        matches!(self.state, ViewState::Sending | ViewState::Streaming)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Record the scroll position observed before a content update.
    pub fn observe_scroll(&mut self, scroll_top: f64, viewport_height: f64, content_height: f64) {
        self.scroll
            .observe(scroll_top, viewport_height, content_height);
    }

    /// Whether the latest update should scroll the newest message into view.
    pub fn should_follow(&self) -> bool {
        self.scroll.should_follow()
    }

    /// Submit the buffered input: appends exactly one user message, clears
    /// the input, and returns the prepared relay request. Whitespace-only
    /// input and submits while a send is in flight are refused without
    /// touching the conversation.
    pub fn submit(&mut self) -> Result<SendRequest, ViewError> {
        if self.loading() {
            return Err(ViewError::Busy);
        }
        if self.input.trim().is_empty() {
            return Err(ViewError::EmptyInput);
        }

        let input = std::mem::take(&mut self.input);
        let full_prompt = self.persona.compose_prompt(&input);

        self.messages.push(Message::user(input));
        self.error = None;
        self.state = ViewState::Sending;

        Ok(SendRequest {
            messages: self.messages.clone(),
            full_prompt,
        })
    }

    /// Response headers arrived: append the single empty placeholder bot
    /// message. Returns its index, which stays the pending index for the
    /// whole stream.
    pub fn begin_stream(&mut self) -> Result<usize, ViewError> {
        if self.state != ViewState::Sending {
            return Err(ViewError::NoStream);
        }
        self.messages.push(Message::bot(""));
        self.state = ViewState::Streaming;
        Ok(self.messages.len() - 1)
    }

    /// Index of the pending bot message, if a stream is being consumed.
    pub fn pending_index(&self) -> Option<usize> {
        match self.state {
            ViewState::Streaming => Some(self.messages.len() - 1),
            _ => None,
        }
    }

    /// Extend the message at `index` with one decoded chunk. Only the
    /// pending bot index is accepted; the list is replaced with the
    /// sequence produced by the [`append_chunk`] reducer.
    pub fn apply_chunk_at(&mut self, index: usize, text: &str) -> Result<(), ViewError> {
        let pending = self.pending_index().ok_or(ViewError::NoStream)?;
        if index != pending {
            return Err(ViewError::NotPending(index));
        }
        self.messages = append_chunk(&self.messages, index, text);
        Ok(())
    }

    /// Extend the pending bot message with one decoded chunk.
    pub fn apply_chunk(&mut self, text: &str) -> Result<(), ViewError> {
        let pending = self.pending_index().ok_or(ViewError::NoStream)?;
        self.apply_chunk_at(pending, text)
    }

    /// The reader reported completion: clear the loading flag.
    pub fn finish_stream(&mut self) -> Result<(), ViewError> {
        if self.state != ViewState::Streaming {
            return Err(ViewError::NoStream);
        }
        self.state = ViewState::Idle;
        Ok(())
    }

    /// A fetch or read failure: surface a user-visible message and clear
    /// the loading flag. Whatever partial bot text already streamed in is
    /// retained.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.state = ViewState::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personaai_models::builtin_personas;
    use pretty_assertions::assert_eq;

    fn concise_view() -> ChatView {
        let persona = builtin_personas()
            .into_iter()
            .find(|p| p.label == "Concise and Direct")
            .unwrap();
        ChatView::new(persona)
    }

    fn submit_text(view: &mut ChatView, text: &str) -> SendRequest {
        view.set_input(text);
        view.submit().unwrap()
    }

    #[test]
    fn submit_appends_one_user_message_and_composes_prompt() {
        let mut view = concise_view();
        let request = submit_text(&mut view, "What is 2+2?");

        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0], Message::user("What is 2+2?"));
        assert_eq!(
            request.full_prompt,
            "Respond concisely and directly. What is 2+2?"
        );
        assert_eq!(request.messages, view.messages());
        assert_eq!(view.input(), "");
        assert!(view.loading());
    }

    #[test]
    fn whitespace_only_submit_is_a_no_op() {
        let mut view = concise_view();
        view.set_input("   \t ");
        assert_eq!(view.submit(), Err(ViewError::EmptyInput));
        assert!(view.messages().is_empty());
        assert!(!view.loading());
    }

    #[test]
    fn submit_while_loading_is_refused() {
        let mut view = concise_view();
        submit_text(&mut view, "first");

        view.set_input("second");
        assert_eq!(view.submit(), Err(ViewError::Busy));
        assert_eq!(view.messages().len(), 1);
    }

    #[test]
    fn one_user_message_then_exactly_one_bot_message() {
        let mut view = concise_view();
        submit_text(&mut view, "What is 2+2?");

        let index = view.begin_stream().unwrap();
        assert_eq!(index, 1);
        assert_eq!(view.messages().len(), 2);
        assert_eq!(view.messages()[1], Message::bot(""));

        // The placeholder is appended once, never duplicated
        assert_eq!(view.begin_stream(), Err(ViewError::NoStream));
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn final_bot_text_is_chunk_concatenation_in_arrival_order() {
        let mut view = concise_view();
        submit_text(&mut view, "What is 2+2?");
        view.begin_stream().unwrap();

        view.apply_chunk("4").unwrap();
        view.apply_chunk(".").unwrap();
        view.finish_stream().unwrap();

        assert_eq!(view.messages().len(), 2);
        assert_eq!(view.messages()[1].text, "4.");
        assert_eq!(view.state(), ViewState::Idle);
        assert!(!view.loading());
    }

    #[test]
    fn chunks_outside_the_pending_index_are_rejected() {
        let mut view = concise_view();
        submit_text(&mut view, "hello");
        let pending = view.begin_stream().unwrap();

        assert_eq!(view.apply_chunk_at(0, "x"), Err(ViewError::NotPending(0)));
        view.apply_chunk_at(pending, "ok").unwrap();
        assert_eq!(view.messages()[pending].text, "ok");
        assert_eq!(view.messages()[0].text, "hello");
    }

    #[test]
    fn chunk_without_a_stream_is_rejected() {
        let mut view = concise_view();
        assert_eq!(view.apply_chunk("x"), Err(ViewError::NoStream));
        submit_text(&mut view, "hello");
        // Sending, but the placeholder has not been appended yet
        assert_eq!(view.apply_chunk("x"), Err(ViewError::NoStream));
    }

    #[test]
    fn failure_keeps_partial_text_and_clears_loading() {
        let mut view = concise_view();
        submit_text(&mut view, "tell me a story");
        view.begin_stream().unwrap();
        view.apply_chunk("Once upon").unwrap();

        view.fail("network error");

        assert_eq!(view.state(), ViewState::Error);
        assert!(!view.loading());
        assert_eq!(view.error(), Some("network error"));
        assert_eq!(view.messages()[1].text, "Once upon");
    }

    #[test]
    fn submit_after_failure_clears_the_error() {
        let mut view = concise_view();
        submit_text(&mut view, "hi");
        view.fail("boom");

        submit_text(&mut view, "try again");
        assert_eq!(view.error(), None);
        assert_eq!(view.state(), ViewState::Sending);
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn reducer_returns_new_sequence_without_mutating_input() {
        let original = vec![Message::user("q"), Message::bot("4")];
        let updated = append_chunk(&original, 1, ".");

        assert_eq!(original[1].text, "4");
        assert_eq!(updated[1].text, "4.");
        assert_eq!(updated[0], original[0]);
    }

    #[test]
    fn reducer_ignores_out_of_range_index() {
        let original = vec![Message::user("q")];
        let updated = append_chunk(&original, 5, "x");
        assert_eq!(updated, original);
    }

    #[test]
    fn switching_persona_changes_composed_prompt() {
        let mut view = concise_view();
        view.set_persona(Persona::new("Formal", "Respond in a formal manner."));
        let request = submit_text(&mut view, "hello");
        assert_eq!(request.full_prompt, "Respond in a formal manner. hello");
    }
}
