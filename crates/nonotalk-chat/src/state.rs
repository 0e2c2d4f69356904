//! View state held by the chat screen for its lifetime.

use nonotalk_core::{Conversation, Exchange, Message};

/// In-memory view state of the chat screen.
///
/// Read access is public; mutation goes through the controller so that the
/// crisis alert and quota warning can only be cleared by their own actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub(crate) conversations: Vec<Conversation>,
    pub(crate) current_conversation: Option<Conversation>,
    pub(crate) messages: Vec<Message>,
    pub(crate) loading: bool,
    pub(crate) sidebar_open: bool,
    pub(crate) crisis_alert: Option<String>,
    pub(crate) quota_warning: bool,
}

impl ChatState {
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.current_conversation.as_ref()
    }

    pub fn current_conversation_id(&self) -> Option<i64> {
        self.current_conversation.as_ref().map(|c| c.id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn crisis_alert(&self) -> Option<&str> {
        self.crisis_alert.as_deref()
    }

    pub fn quota_warning(&self) -> bool {
        self.quota_warning
    }

    /// Whether the send, upload and record controls accept input.
    pub fn controls_enabled(&self) -> bool {
        !self.loading && self.current_conversation.is_some()
    }

    /// Append an exchange in order: the user's side first, then the reply.
    pub(crate) fn append_exchange(&mut self, exchange: &Exchange) {
        self.messages.push(exchange.prompt.clone());
        self.messages.push(exchange.reply.clone());
    }

    /// Make `conversation` the only known conversation and start it empty.
    pub(crate) fn adopt_new_conversation(&mut self, conversation: Conversation) {
        self.conversations = vec![conversation.clone()];
        self.current_conversation = Some(conversation);
        self.messages.clear();
    }
}
