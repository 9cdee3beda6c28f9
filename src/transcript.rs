//! Conversation transcript: an append-only log of user and bot turns

use crate::error::{Error, Result};
use serde::Serialize;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    User,
    Bot,
}

/// Lifecycle state of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnStatus {
    Pending,
    Resolved,
    Failed,
}

/// A document an answer was grounded on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub doc_id: Option<i64>,
    pub filename: String,
}

/// One message in the conversation
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub sources: Vec<SourceRef>,
    pub status: TurnStatus,
}

/// Append-only ordered transcript.
///
/// Turns are never removed or reordered, and a settled turn is immutable.
/// At most one pending bot turn exists at any time; settling it is the
/// only permitted mutation of an appended turn.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered read-only view of the transcript
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn has_pending(&self) -> bool {
        self.turns
            .iter()
            .any(|turn| turn.status == TurnStatus::Pending)
    }

    /// Seed an already-resolved bot turn (the session greeting)
    pub fn greet(&mut self, text: &str) {
        self.turns.push(Turn {
            role: Role::Bot,
            text: text.to_string(),
            sources: Vec::new(),
            status: TurnStatus::Resolved,
        });
    }

    /// Append a resolved user turn
    pub fn append_user(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.turns.push(Turn {
            role: Role::User,
            text: text.to_string(),
            sources: Vec::new(),
            status: TurnStatus::Resolved,
        });
        Ok(())
    }

    /// Append a pending bot turn awaiting its answer
    pub fn append_pending_bot(&mut self) -> Result<()> {
        if self.has_pending() {
            return Err(Error::ConcurrentPending);
        }
        self.turns.push(Turn {
            role: Role::Bot,
            text: String::new(),
            sources: Vec::new(),
            status: TurnStatus::Pending,
        });
        Ok(())
    }

    /// Settle the pending bot turn with an answer
    pub fn resolve_pending(&mut self, text: String, sources: Vec<SourceRef>) -> Result<()> {
        let turn = self.pending_mut()?;
        turn.text = text;
        turn.sources = sources;
        turn.status = TurnStatus::Resolved;
        Ok(())
    }

    /// Settle the pending bot turn as failed with fallback text
    pub fn fail_pending(&mut self, fallback: &str) -> Result<()> {
        let turn = self.pending_mut()?;
        turn.text = fallback.to_string();
        turn.status = TurnStatus::Failed;
        Ok(())
    }

    fn pending_mut(&mut self) -> Result<&mut Turn> {
        self.turns
            .iter_mut()
            .find(|turn| turn.status == TurnStatus::Pending)
            .ok_or(Error::NoPendingTurn)
    }
}
