use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChatId(pub(crate) u64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TurnId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// A failed turn, shown in place of the assistant's reply.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// One conversation. Threads are independent: each has its own messages
/// and at most one turn in flight.
#[derive(Debug, Clone, Serialize)]
pub struct ChatThread {
    id: ChatId,
    messages: Vec<ChatMessage>,
    pending: Option<TurnId>,
}

impl ChatThread {
    pub(crate) fn new(id: ChatId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            pending: None,
        }
    }

    pub fn id(&self) -> ChatId {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn start(&mut self, turn: TurnId, instruction: &str) {
        self.messages.push(ChatMessage::new(Role::User, instruction));
        self.pending = Some(turn);
    }

    /// Records the outcome of `turn` and clears the pending flag.
    pub(crate) fn settle(&mut self, turn: TurnId, message: ChatMessage) {
        if self.pending == Some(turn) {
            self.pending = None;
        }
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn turn_lifecycle() {
        let mut thread = ChatThread::new(ChatId(1));
        assert!(!thread.is_pending());

        thread.start(TurnId(7), "make it blue");
        assert!(thread.is_pending());

        // A different turn settling does not clear the flag
        thread.settle(TurnId(3), ChatMessage::new(Role::Error, "late"));
        assert!(thread.is_pending());

        thread.settle(TurnId(7), ChatMessage::new(Role::Assistant, "Done."));
        assert!(!thread.is_pending());
        assert_eq!(
            thread.messages(),
            &[
                ChatMessage::new(Role::User, "make it blue"),
                ChatMessage::new(Role::Error, "late"),
                ChatMessage::new(Role::Assistant, "Done."),
            ]
        );
        assert_eq!(thread.id().to_string(), "chat-1");
    }
}
