//! Editing session: layer list ownership, processing lifecycle and re-composition policy.

pub mod editor;
pub mod process;

pub use editor::{EditorSession, SessionState};
pub use process::{ProcessOutcome, ProcessStatus, ProcessTicket};
