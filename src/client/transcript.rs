// src/client/transcript.rs

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Messages in the order they were appended.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    // Append a message and return the new length.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) -> usize {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self.messages.len()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn count(&self, role: MessageRole) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_append_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.append(MessageRole::User, "hello"), 1);
        assert_eq!(transcript.append(MessageRole::Bot, "hi"), 2);

        assert_eq!(transcript.messages()[0].content, "hello");
        assert_eq!(transcript.last().unwrap().role, MessageRole::Bot);
        assert_eq!(transcript.count(MessageRole::User), 1);
    }
}
