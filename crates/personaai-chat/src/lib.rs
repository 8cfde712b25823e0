//! Chat view state machine for PersonaAI.
//!
//! Owns the ordered conversation list and walks one send through
//! Idle → Sending → Streaming → Idle (or Error), extending the single
//! pending bot message as chunks arrive. The auto-scroll tracker decides
//! whether the view should follow new content.

mod scroll;
mod view;

pub use scroll::{ScrollTracker, SCROLL_THRESHOLD_PX};
pub use view::{append_chunk, ChatView, SendRequest, ViewError, ViewState};
