//! reqwest-backed implementation of [`ChatBackend`].

use std::time::Duration;

use async_trait::async_trait;
use nonotalk_core::config::BackendConfig;
use nonotalk_core::{Conversation, Exchange, Message, QuotaStatus, User};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::backend::ChatBackend;
use crate::error::GatewayError;
use crate::upload::ImageUpload;
use crate::wire::{
    ConversationEnvelope, ConversationsEnvelope, CreateConversationRequest, ErrorEnvelope,
    InviteReceipt, InviteRequest, LoginRequest, MessagesEnvelope, SendEnvelope,
    SendMessageRequest, SendReply, UploadEnvelope, UserEnvelope,
};

/// HTTP gateway to the companion backend.
///
/// The underlying client keeps a cookie store, so the session cookie set by
/// login is sent with every later call.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a gateway from the backend section of the configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone());
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build()?;

        tracing::debug!(base_url = %base_url, "Backend gateway created");
        Ok(Self { client, base_url })
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a 2xx body as `T`, or turn the status into a gateway error.
    async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, GatewayError> {
        let resp = Self::check(resp).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Pass 2xx responses through; map everything else to an error.
    async fn check(resp: Response) -> Result<Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = ErrorEnvelope::describe(&body);
        if status == StatusCode::FORBIDDEN {
            Err(GatewayError::QuotaExhausted(message))
        } else {
            Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn check_quota(&self) -> Result<QuotaStatus, GatewayError> {
        let resp = self
            .client
            .get(self.url("/api/auth/check-quota"))
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        let resp = self
            .client
            .get(self.url("/api/chat/conversations"))
            .send()
            .await?;
        let envelope: ConversationsEnvelope = Self::read(resp).await?;
        Ok(envelope.conversations)
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, GatewayError> {
        let resp = self
            .client
            .post(self.url("/api/chat/conversations"))
            .json(&CreateConversationRequest { title })
            .send()
            .await?;
        let envelope: ConversationEnvelope = Self::read(resp).await?;
        Ok(envelope.conversation)
    }

    async fn fetch_messages(
        &self,
        conversation_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, GatewayError> {
        let mut path = format!("/api/chat/conversations/{}/messages", conversation_id);
        if let Some(limit) = limit {
            path.push_str(&format!("?limit={}", limit));
        }
        let resp = self.client.get(self.url(&path)).send().await?;
        let envelope: MessagesEnvelope = Self::read(resp).await?;
        Ok(envelope.messages)
    }

    async fn send_message(
        &self,
        conversation_id: i64,
        message: &str,
        emotion: Option<&str>,
    ) -> Result<SendReply, GatewayError> {
        let resp = self
            .client
            .post(self.url(&format!(
                "/api/chat/conversations/{}/send",
                conversation_id
            )))
            .json(&SendMessageRequest { message, emotion })
            .send()
            .await?;
        let envelope: SendEnvelope = Self::read(resp).await?;
        SendReply::try_from(envelope)
    }

    async fn upload_image(
        &self,
        conversation_id: i64,
        image: ImageUpload,
    ) -> Result<Exchange, GatewayError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("image", part);
        let resp = self
            .client
            .post(self.url(&format!(
                "/api/chat/conversations/{}/upload-image",
                conversation_id
            )))
            .multipart(form)
            .send()
            .await?;
        let envelope: UploadEnvelope = Self::read(resp).await?;
        Exchange::try_from(envelope)
    }

    async fn acknowledge_crisis(&self) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(self.url("/api/chat/crisis/acknowledge"))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn login(&self, username: &str, pin: &str) -> Result<User, GatewayError> {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { username, pin })
            .send()
            .await?;
        let envelope: UserEnvelope = Self::read(resp).await?;
        Ok(envelope.user)
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(self.url("/api/auth/logout"))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User, GatewayError> {
        let resp = self.client.get(self.url("/api/auth/me")).send().await?;
        let envelope: UserEnvelope = Self::read(resp).await?;
        Ok(envelope.user)
    }

    async fn invite(&self, email: &str) -> Result<InviteReceipt, GatewayError> {
        let resp = self
            .client
            .post(self.url("/api/invite"))
            .json(&InviteRequest { email })
            .send()
            .await?;
        Self::read(resp).await
    }
}
