//! JSON envelopes exchanged with the companion backend.
//!
//! Response envelopes are decoded leniently (every field optional where the
//! backend omits it on some paths) and then converted into the typed replies
//! the rest of the workspace works with.

use nonotalk_core::{Conversation, Exchange, Invitation, Message, User};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateConversationRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub message: &'a str,
    pub emotion: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub pin: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct InviteRequest<'a> {
    pub email: &'a str,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationsEnvelope {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationEnvelope {
    pub conversation: Conversation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesEnvelope {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

/// Body of any non-2xx response. The backend uses `error`, and adds a longer
/// `message` on quota denials.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Human-readable text for a failed response body.
    pub fn describe(body: &str) -> String {
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
        envelope
            .message
            .or(envelope.error)
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendEnvelope {
    #[serde(default)]
    pub crisis_detected: bool,
    #[serde(default)]
    pub emergency_message: Option<String>,
    #[serde(default)]
    pub user_message: Option<Message>,
    #[serde(default)]
    pub ai_message: Option<Message>,
    #[serde(default)]
    pub quota_remaining: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadEnvelope {
    #[serde(default)]
    pub image_message: Option<Message>,
    #[serde(default)]
    pub ai_message: Option<Message>,
    #[serde(default)]
    pub quota_remaining: Option<u32>,
}

/// Successful answer to a send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendReply {
    /// The backend classified the message as a crisis; no exchange was stored.
    Crisis { emergency_message: String },
    /// Normal exchange: the echoed user message and the companion's reply.
    Exchange(Exchange),
}

impl TryFrom<SendEnvelope> for SendReply {
    type Error = GatewayError;

    fn try_from(envelope: SendEnvelope) -> Result<Self, Self::Error> {
        if envelope.crisis_detected {
            return Ok(SendReply::Crisis {
                emergency_message: envelope.emergency_message.unwrap_or_default(),
            });
        }
        match (envelope.user_message, envelope.ai_message) {
            (Some(prompt), Some(reply)) => Ok(SendReply::Exchange(Exchange {
                prompt,
                reply,
                quota_remaining: envelope.quota_remaining,
            })),
            _ => Err(GatewayError::Decode(
                "send response is missing user_message or ai_message".to_string(),
            )),
        }
    }
}

impl TryFrom<UploadEnvelope> for Exchange {
    type Error = GatewayError;

    fn try_from(envelope: UploadEnvelope) -> Result<Self, Self::Error> {
        match (envelope.image_message, envelope.ai_message) {
            (Some(prompt), Some(reply)) => Ok(Exchange {
                prompt,
                reply,
                quota_remaining: envelope.quota_remaining,
            }),
            _ => Err(GatewayError::Decode(
                "upload response is missing image_message or ai_message".to_string(),
            )),
        }
    }
}

/// Result of a referral invitation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InviteReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub invitation: Invitation,
    #[serde(default)]
    pub email_sent: bool,
}
