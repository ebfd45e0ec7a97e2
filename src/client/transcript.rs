use crate::message::{ChatMessage, Role};

/// Running text of the in-flight assistant reply. Only ever grows.
#[derive(Debug, Default, Clone)]
pub struct AssistantAccumulator {
    text: String,
}

impl AssistantAccumulator {
    pub fn push(&mut self, chunk: &str) -> &str {
        self.text.push_str(chunk);
        &self.text
    }
}

/// Displayed conversation, oldest turn first.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Set the trailing assistant turn to `text`, appending one if the
    /// transcript does not end with an assistant turn.
    pub fn upsert_assistant(&mut self, text: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.clear();
                last.content.push_str(text);
            }
            _ => self.messages.push(ChatMessage::assistant(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_creates_then_replaces_trailing_assistant_turn() {
        let mut transcript = Transcript::new();
        let mut acc = AssistantAccumulator::default();
        transcript.push_user("hi");

        transcript.upsert_assistant(acc.push("Hel"));
        assert_eq!(transcript.len(), 2);

        transcript.upsert_assistant(acc.push("lo"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last(), Some(&ChatMessage::assistant("Hello")));
    }

    #[test]
    fn new_reply_after_user_turn_gets_its_own_assistant_turn() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.upsert_assistant("Hello");
        transcript.push_user("again");
        transcript.upsert_assistant("Hi");
        assert_eq!(
            transcript.messages(),
            &[
                ChatMessage::user("hi"),
                ChatMessage::assistant("Hello"),
                ChatMessage::user("again"),
                ChatMessage::assistant("Hi"),
            ]
        );
    }
}
