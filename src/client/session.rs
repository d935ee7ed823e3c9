//! Client-side conversation state

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::conversation::{ChatRequest, Conversation, Message};

use super::ClientError;

/// Placeholder text shown while a turn is in flight
pub const PENDING_TEXT: &str = "Thinking...";

/// Identifies one submitted turn and its placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(Uuid);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First block is plenty to tell turns apart on screen
        let id = self.0.simple().to_string();
        f.write_str(&id[..8])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Model,
    Pending,
    Failed,
}

/// One line of the visible transcript
#[derive(Debug, Clone)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Entry {
    fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// A submitted turn waiting for the relay
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub id: TurnId,
    /// Snapshot of the conversation including this turn
    pub request: ChatRequest,
}

/// Conversation and transcript for one client session.
///
/// Each in-flight turn owns exactly one placeholder, found through its [`TurnId`].
/// Turns may resolve in any order.
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    transcript: Vec<Entry>,
    pending: HashMap<TurnId, usize>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user turn and open its placeholder.
    ///
    /// Returns `None` for empty or whitespace-only input, leaving the session untouched.
    pub fn submit_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.conversation.push(Message::user(text));
        self.transcript.push(Entry::new(EntryKind::User, text));

        let id = TurnId(Uuid::new_v4());
        self.pending.insert(id, self.transcript.len());
        self.transcript.push(Entry::new(EntryKind::Pending, PENDING_TEXT));

        Some(PendingTurn {
            id,
            request: ChatRequest::new(self.conversation.clone()),
        })
    }

    /// Replace the placeholder of `id` with the outcome.
    ///
    /// A reply is also appended to the conversation. A failure leaves the
    /// conversation as it was, user turn included. Returns the updated entry, or
    /// `None` if `id` is not pending.
    pub fn resolve(&mut self, id: TurnId, outcome: Result<String, ClientError>) -> Option<&Entry> {
        let index = self.pending.remove(&id)?;

        let entry = match outcome {
            Ok(reply) => {
                self.conversation.push(Message::model(reply.as_str()));
                Entry::new(EntryKind::Model, reply)
            }
            Err(e) => Entry::new(EntryKind::Failed, e.notice()),
        };

        self.transcript[index] = entry;
        self.transcript.get(index)
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn transcript(&self) -> &[Entry] {
        &self.transcript
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    fn kinds(session: &ChatSession) -> Vec<EntryKind> {
        session.transcript().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut session = ChatSession::new();

        for text in ["", "   ", "\n\t"] {
            assert!(session.submit_turn(text).is_none());
        }

        assert!(session.conversation().is_empty());
        assert!(session.transcript().is_empty());
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_submit_appends_user_turn_before_resolution() {
        let mut session = ChatSession::new();
        let turn = session.submit_turn("  Who won the 2022 World Cup?  ").unwrap();

        assert_eq!(session.conversation().len(), 1);
        let message = &session.conversation().messages()[0];
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "Who won the 2022 World Cup?");

        assert_eq!(kinds(&session), vec![EntryKind::User, EntryKind::Pending]);
        assert_eq!(session.transcript()[1].text, PENDING_TEXT);

        let sent = turn.request.conversation.unwrap();
        assert_eq!(&sent, session.conversation());
    }

    #[test]
    fn test_reply_replaces_placeholder() {
        let mut session = ChatSession::new();
        let turn = session.submit_turn("Hi").unwrap();

        let entry = session.resolve(turn.id, Ok("Hello!".into())).unwrap();
        assert_eq!(entry.kind, EntryKind::Model);

        assert_eq!(kinds(&session), vec![EntryKind::User, EntryKind::Model]);
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.conversation().messages()[1], Message::model("Hello!"));
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_failure_keeps_user_turn() {
        let mut session = ChatSession::new();
        let turn = session.submit_turn("Hi").unwrap();

        let failure = ClientError::Relay {
            status: 500,
            message: "Internal server error during API communication.".into(),
        };
        let entry = session.resolve(turn.id, Err(failure)).unwrap();
        assert_eq!(entry.kind, EntryKind::Failed);
        assert!(!entry.text.is_empty());

        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].role, Role::User);
    }

    #[test]
    fn test_out_of_order_resolution() {
        let mut session = ChatSession::new();
        let first = session.submit_turn("first").unwrap();
        let second = session.submit_turn("second").unwrap();

        // Second turn's snapshot carries both user messages
        assert_eq!(second.request.conversation.as_ref().unwrap().len(), 2);

        session.resolve(second.id, Ok("reply two".into()));
        session.resolve(first.id, Ok("reply one".into()));

        let texts: Vec<&str> = session.transcript().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "reply one", "second", "reply two"]);
    }

    #[test]
    fn test_identical_replies_resolve_their_own_placeholder() {
        let mut session = ChatSession::new();
        let a = session.submit_turn("same").unwrap();
        let b = session.submit_turn("same").unwrap();

        session.resolve(b.id, Ok("B".into()));
        assert_eq!(session.transcript()[1].kind, EntryKind::Pending);
        assert_eq!(session.transcript()[3].text, "B");

        session.resolve(a.id, Ok("A".into()));
        assert_eq!(session.transcript()[1].text, "A");
    }

    #[test]
    fn test_resolving_twice_is_a_no_op() {
        let mut session = ChatSession::new();
        let turn = session.submit_turn("Hi").unwrap();

        assert!(session.resolve(turn.id, Ok("one".into())).is_some());
        assert!(session.resolve(turn.id, Ok("two".into())).is_none());

        assert_eq!(session.transcript()[1].text, "one");
        assert_eq!(session.conversation().len(), 2);
    }
}
