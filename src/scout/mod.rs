//! The campus-run scout.
//!
//! This module provides the rule-based responder, the chat session and the
//! transcript storage it writes to.

pub mod responder;
pub mod session;
pub mod transcript;

pub use session::{QuickAction, ScoutSession};
pub use transcript::{FileTranscriptStore, MemoryTranscriptStore, TranscriptStore};
