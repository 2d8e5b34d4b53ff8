use crate::types::{ChatMessage, Role};

/// Running chat history for the etiquette guide, oldest message first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Removes the last message if it was sent by the user.
    pub fn pop_unanswered(&mut self) -> Option<ChatMessage> {
        match self.messages.last() {
            Some(message) if message.role == Role::User => self.messages.pop(),
            _ => None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_unanswered_only_removes_trailing_user_message() {
        let mut conversation = Conversation::new();
        conversation.push_user("Is tipping expected?");
        conversation.push_assistant("Yes, around 10%.");
        assert!(conversation.pop_unanswered().is_none());

        conversation.push_user("What about taxis?");
        let popped = conversation.pop_unanswered().unwrap();
        assert_eq!(popped.content, "What about taxis?");
        assert_eq!(conversation.len(), 2);
    }
}
