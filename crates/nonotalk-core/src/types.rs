use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Conversations and messages
// =============================================================================

/// A named thread of messages between the user and the companion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub message_count: Option<u32>,
}

/// One message in a conversation, authored either by the user or the companion.
///
/// Timestamps are naive UTC as emitted by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(default)]
    pub conversation_id: Option<i64>,
    pub content: String,
    pub is_user: bool,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub emotion_detected: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
}

impl Message {
    /// Whether the message carries an uploaded image.
    pub fn has_image(&self) -> bool {
        self.image_path.is_some()
    }
}

/// A user message paired with the companion's reply, as returned by a
/// successful send or image upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    /// The echoed user message (text or image placeholder).
    pub prompt: Message,
    /// The companion's reply.
    pub reply: Message,
    /// Remaining exchanges after this one, when the backend reports it.
    pub quota_remaining: Option<u32>,
}

// =============================================================================
// Users and quota
// =============================================================================

/// The signed-in user, owned by the auth collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub quota_remaining: u32,
    #[serde(default)]
    pub total_quota: Option<u32>,
    #[serde(default)]
    pub filleuls_count: Option<u32>,
}

impl User {
    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(ref username) = patch.username {
            self.username = username.clone();
        }
        if let Some(quota) = patch.quota_remaining {
            self.quota_remaining = quota;
        }
    }
}

/// Partial user update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub quota_remaining: Option<u32>,
}

impl UserPatch {
    /// Patch that only updates the remaining quota.
    pub fn quota(quota_remaining: u32) -> Self {
        Self {
            quota_remaining: Some(quota_remaining),
            ..Self::default()
        }
    }
}

/// Quota snapshot returned by the check-quota endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub quota_remaining: u32,
    #[serde(default)]
    pub total_quota: Option<u32>,
    #[serde(default)]
    pub can_chat: Option<bool>,
}

impl QuotaStatus {
    /// Whether the remaining quota is at or below `threshold`.
    pub fn is_low(&self, threshold: u32) -> bool {
        self.quota_remaining <= threshold
    }
}

/// A referral invitation sent to a friend's email address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub inviter_id: Option<i64>,
    #[serde(default)]
    pub accepted: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub accepted_at: Option<NaiveDateTime>,
}
