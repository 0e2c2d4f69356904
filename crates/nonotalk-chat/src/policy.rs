//! Main-conversation policy.
//!
//! The chat screen works on a single conversation. On mount it adopts the
//! first conversation the backend lists (most recently updated first), and
//! creates one with the companion's default title only when the user has none.
//! The backend does not enforce this; it is a client-side rule.

use nonotalk_core::Conversation;

/// Which conversation the screen uses, and what to call it when creating one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainConversationPolicy {
    title: String,
}

impl MainConversationPolicy {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Title used when the main conversation has to be created.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Pick the main conversation out of the listed ones.
    pub fn choose<'a>(&self, conversations: &'a [Conversation]) -> Option<&'a Conversation> {
        conversations.first()
    }
}
