//! Scout chat session.
//!
//! A session owns the current run snapshot and the transcript, routes user
//! input and quick actions to the responder, and persists the transcript
//! after every exchange.

use crate::analysis::describe_low_seat_runs;
use crate::models::{ChatReply, Run};
use crate::scout::responder::{describe_broadcast_ideas, describe_run_insights, respond};
use crate::scout::transcript::{load_or_greet, save_quietly, ChatMessage, TranscriptStore};
use tracing::{debug, info};

/// One-tap actions offered next to the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Insights,
    SeatAlerts,
    Broadcast,
}

impl QuickAction {
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::Insights => "Run Insights",
            QuickAction::SeatAlerts => "Seat Alerts",
            QuickAction::Broadcast => "Broadcast Tips",
        }
    }

    /// Build the reply for this action from the current runs.
    pub fn build_reply(&self, runs: &[Run]) -> ChatReply {
        match self {
            QuickAction::Insights => describe_run_insights(runs),
            QuickAction::SeatAlerts => describe_low_seat_runs(runs),
            QuickAction::Broadcast => describe_broadcast_ideas(runs),
        }
    }
}

/// Chat session over an injected transcript store.
pub struct ScoutSession<'s> {
    store: &'s dyn TranscriptStore,
    runs: Vec<Run>,
    messages: Vec<ChatMessage>,
    history_limit: usize,
}

impl<'s> ScoutSession<'s> {
    /// Open a session, restoring any stored transcript.
    pub fn open(store: &'s dyn TranscriptStore, runs: Vec<Run>, history_limit: usize) -> Self {
        let messages = load_or_greet(store, history_limit);
        debug!("Restored {} transcript messages", messages.len());
        info!("Scout session opened with {} live runs", runs.len());

        Self {
            store,
            runs,
            messages,
            history_limit,
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Answer free-text input. Blank input still gets a reply, but no user
    /// message is recorded for it.
    pub fn ask(&mut self, input: &str) -> ChatReply {
        let trimmed = input.trim();
        let reply = respond(trimmed, &self.runs);

        if !trimmed.is_empty() {
            self.messages.push(ChatMessage::user(trimmed));
        }
        self.messages.push(ChatMessage::ai(reply.clone()));
        self.persist();

        reply
    }

    /// Run a quick action, recording it as a `[Button]` message.
    pub fn quick_action(&mut self, action: QuickAction) -> ChatReply {
        let reply = action.build_reply(&self.runs);

        self.messages
            .push(ChatMessage::user(format!("[Button] {}", action.label())));
        self.messages.push(ChatMessage::ai(reply.clone()));
        self.persist();

        reply
    }

    /// Drop the transcript back to the greeting.
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::greeting()];
        self.persist();
    }

    fn persist(&mut self) {
        // keep the in-memory window in step with what is stored
        if self.messages.len() > self.history_limit {
            let excess = self.messages.len() - self.history_limit;
            self.messages.drain(..excess);
            debug!("Pruned {} old transcript messages", excess);
        }
        save_quietly(self.store, &self.messages, self.history_limit);
    }
}
