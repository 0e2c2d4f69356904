//! Backend gateway trait.
//!
//! One method per REST call. Each is a single request/response round trip:
//! no retry, no queueing, no caching. Implementations map HTTP 403 to
//! [`GatewayError::QuotaExhausted`] and every other non-2xx status to
//! [`GatewayError::Status`].

use async_trait::async_trait;
use nonotalk_core::{Conversation, Exchange, Message, QuotaStatus, User};

use crate::error::GatewayError;
use crate::upload::ImageUpload;
use crate::wire::{InviteReceipt, SendReply};

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /api/auth/check-quota`
    async fn check_quota(&self) -> Result<QuotaStatus, GatewayError>;

    /// `GET /api/chat/conversations`
    async fn list_conversations(&self) -> Result<Vec<Conversation>, GatewayError>;

    /// `POST /api/chat/conversations`
    async fn create_conversation(&self, title: &str) -> Result<Conversation, GatewayError>;

    /// `GET /api/chat/conversations/{id}/messages`, optionally capped to the
    /// `limit` most recent messages (still returned oldest first).
    async fn fetch_messages(
        &self,
        conversation_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, GatewayError>;

    /// `POST /api/chat/conversations/{id}/send`
    async fn send_message(
        &self,
        conversation_id: i64,
        message: &str,
        emotion: Option<&str>,
    ) -> Result<SendReply, GatewayError>;

    /// `POST /api/chat/conversations/{id}/upload-image` as multipart form data.
    async fn upload_image(
        &self,
        conversation_id: i64,
        image: ImageUpload,
    ) -> Result<Exchange, GatewayError>;

    /// `POST /api/chat/crisis/acknowledge`
    async fn acknowledge_crisis(&self) -> Result<(), GatewayError>;

    /// `POST /api/auth/login`
    async fn login(&self, username: &str, pin: &str) -> Result<User, GatewayError>;

    /// `POST /api/auth/logout`
    async fn logout(&self) -> Result<(), GatewayError>;

    /// `GET /api/auth/me`
    async fn current_user(&self) -> Result<User, GatewayError>;

    /// `POST /api/invite`
    async fn invite(&self, email: &str) -> Result<InviteReceipt, GatewayError>;
}
