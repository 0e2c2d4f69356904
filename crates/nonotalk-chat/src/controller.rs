//! Chat screen controller: runs user flows against the gateway and reflects
//! the results into [`ChatState`].
//!
//! Every flow is a single gateway round trip (bootstrap chains a few). Flows
//! take `&mut self`, so calls through one controller never overlap. Failures
//! are logged and returned as [`ChatError`]; in that case the view state is
//! left as it was apart from the loading flag, which is always cleared.

use std::path::Path;
use std::sync::Arc;

use nonotalk_client::{ChatBackend, GatewayError, ImageUpload, InviteReceipt, SendReply};
use nonotalk_core::config::NonotalkConfig;
use nonotalk_core::{Conversation, Exchange, QuotaStatus, UserPatch};

use crate::collaborators::{AuthProvider, VoiceProvider};
use crate::error::ChatError;
use crate::policy::MainConversationPolicy;
use crate::render::{self, ChatView, RenderContext};
use crate::state::ChatState;

// =============================================================================
// Outcomes
// =============================================================================

/// How the screen ended up with its main conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// An existing conversation was selected and its history loaded.
    Selected(Conversation),
    /// No conversation existed; one was created.
    Created(Conversation),
}

/// Result of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty text or no active conversation; nothing was sent.
    Skipped,
    /// The exchange was appended.
    Sent(Exchange),
    /// The backend flagged a crisis; the alert is now showing.
    Crisis { emergency_message: String },
    /// The backend refused for lack of quota; the quota warning is now showing.
    QuotaExceeded,
}

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No file or no active conversation; nothing was sent.
    Skipped,
    /// The image message and the reply were appended.
    Uploaded(Exchange),
}

/// Result of toggling voice capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// Recording started.
    Started,
    /// Recording stopped; `reply` is what sending the transcript produced.
    Stopped { reply: SendOutcome },
}

// =============================================================================
// Controller
// =============================================================================

/// Screen-level settings taken from the configuration.
#[derive(Debug, Clone)]
struct Settings {
    quota_warning_threshold: u32,
    history_fetch_limit: Option<u32>,
    render: RenderContext,
}

/// Chat screen controller.
pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    auth: Arc<dyn AuthProvider>,
    voice: Arc<dyn VoiceProvider>,
    policy: MainConversationPolicy,
    settings: Settings,
    state: ChatState,
}

impl ChatController {
    pub fn new(
        config: &NonotalkConfig,
        backend: Arc<dyn ChatBackend>,
        auth: Arc<dyn AuthProvider>,
        voice: Arc<dyn VoiceProvider>,
    ) -> Self {
        let companion = &config.companion;
        Self {
            backend,
            auth,
            voice,
            policy: MainConversationPolicy::new(companion.main_thread_title.clone()),
            settings: Settings {
                quota_warning_threshold: companion.quota_warning_threshold,
                history_fetch_limit: companion.history_fetch_limit,
                render: RenderContext::from_config(config),
            },
            state: ChatState::default(),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn policy(&self) -> &MainConversationPolicy {
        &self.policy
    }

    /// Build the view model for the current state.
    pub fn view(&self) -> ChatView {
        render::render(
            &self.state,
            &self.settings.render,
            self.auth.user().as_ref(),
            self.voice.is_recording(),
            self.voice.is_playing(),
        )
    }

    // -------------------------------------------------------------------------
    // Bootstrap
    // -------------------------------------------------------------------------

    /// Mount the screen: check quota, then settle on the main conversation.
    ///
    /// A failed quota check is logged and does not stop the bootstrap.
    pub async fn bootstrap(&mut self) -> Result<BootstrapOutcome, ChatError> {
        if let Err(e) = self.check_quota().await {
            tracing::debug!(error = %e, "Continuing bootstrap without quota status");
        }
        self.load_conversations().await
    }

    /// Fetch the remaining quota and raise the warning when it is low.
    pub async fn check_quota(&mut self) -> Result<QuotaStatus, ChatError> {
        let status = self.backend.check_quota().await.map_err(|e| {
            tracing::warn!(error = %e, "Quota check failed");
            ChatError::from(e)
        })?;
        if status.is_low(self.settings.quota_warning_threshold) {
            tracing::info!(
                quota_remaining = status.quota_remaining,
                "Quota running low"
            );
            self.state.quota_warning = true;
        }
        Ok(status)
    }

    /// List conversations and select the main one, creating it when absent.
    pub async fn load_conversations(&mut self) -> Result<BootstrapOutcome, ChatError> {
        let conversations = self.backend.list_conversations().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to list conversations");
            ChatError::from(e)
        })?;
        self.state.conversations = conversations;

        let chosen = self.policy.choose(&self.state.conversations).cloned();
        match chosen {
            Some(conversation) => {
                self.select_conversation(conversation.clone()).await?;
                Ok(BootstrapOutcome::Selected(conversation))
            }
            None => {
                let created = self.create_main_conversation().await?;
                Ok(BootstrapOutcome::Created(created))
            }
        }
    }

    /// Create the main conversation and make it the only one on screen.
    pub async fn create_main_conversation(&mut self) -> Result<Conversation, ChatError> {
        let conversation = self
            .backend
            .create_conversation(self.policy.title())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to create conversation");
                ChatError::from(e)
            })?;
        tracing::info!(conversation_id = conversation.id, "Main conversation created");
        self.state.adopt_new_conversation(conversation.clone());
        Ok(conversation)
    }

    /// Make `conversation` active and replace the message list with its history.
    pub async fn select_conversation(&mut self, conversation: Conversation) -> Result<(), ChatError> {
        let conversation_id = conversation.id;
        self.state.current_conversation = Some(conversation);

        let messages = self
            .backend
            .fetch_messages(conversation_id, self.settings.history_fetch_limit)
            .await
            .map_err(|e| {
                tracing::warn!(conversation_id, error = %e, "Failed to load messages");
                ChatError::from(e)
            })?;
        tracing::debug!(conversation_id, count = messages.len(), "History loaded");
        self.state.messages = messages;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Send
    // -------------------------------------------------------------------------

    pub async fn send_message(&mut self, text: &str) -> Result<SendOutcome, ChatError> {
        self.send_message_with_emotion(text, None).await
    }

    /// Send `text`, optionally tagged with a detected emotion.
    pub async fn send_message_with_emotion(
        &mut self,
        text: &str,
        emotion: Option<&str>,
    ) -> Result<SendOutcome, ChatError> {
        let conversation_id = match self.state.current_conversation_id() {
            Some(id) if !text.trim().is_empty() => id,
            _ => return Ok(SendOutcome::Skipped),
        };

        self.state.loading = true;
        let result = self
            .backend
            .send_message(conversation_id, text, emotion)
            .await;
        self.state.loading = false;

        match result {
            Ok(SendReply::Exchange(exchange)) => {
                self.state.append_exchange(&exchange);
                self.push_quota(&exchange);
                Ok(SendOutcome::Sent(exchange))
            }
            Ok(SendReply::Crisis { emergency_message }) => {
                tracing::warn!(conversation_id, "Crisis detected by backend");
                self.state.crisis_alert = Some(emergency_message.clone());
                Ok(SendOutcome::Crisis { emergency_message })
            }
            Err(GatewayError::QuotaExhausted(message)) => {
                tracing::info!(conversation_id, message = %message, "Send refused: quota exhausted");
                self.state.quota_warning = true;
                Ok(SendOutcome::QuotaExceeded)
            }
            Err(e) => {
                tracing::warn!(conversation_id, error = %e, "Failed to send message");
                Err(e.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Voice
    // -------------------------------------------------------------------------

    /// Start recording, or stop it and send whatever was transcribed.
    pub async fn toggle_recording(&mut self) -> Result<VoiceOutcome, ChatError> {
        if self.voice.is_recording() {
            let transcript = self.voice.stop_recording().await?;
            let reply = match transcript {
                Some(text) => self.handle_transcript(&text).await?,
                None => SendOutcome::Skipped,
            };
            return Ok(VoiceOutcome::Stopped { reply });
        }

        if self.state.current_conversation.is_none() {
            self.create_main_conversation().await?;
        }
        self.voice.start_recording().await?;
        tracing::debug!("Recording started");
        Ok(VoiceOutcome::Started)
    }

    /// Send a completed transcript and speak the companion's reply.
    pub async fn handle_transcript(&mut self, transcript: &str) -> Result<SendOutcome, ChatError> {
        if transcript.trim().is_empty() {
            return Ok(SendOutcome::Skipped);
        }
        let outcome = self.send_message(transcript).await?;
        if let SendOutcome::Sent(ref exchange) = outcome {
            self.speak(&exchange.reply.content).await;
        }
        Ok(outcome)
    }

    pub fn stop_audio(&self) {
        self.voice.stop_audio();
    }

    // -------------------------------------------------------------------------
    // Image upload
    // -------------------------------------------------------------------------

    /// Upload the picked image, if any, into the active conversation.
    pub async fn upload_image(
        &mut self,
        image: Option<ImageUpload>,
    ) -> Result<UploadOutcome, ChatError> {
        let (conversation_id, image) = match (self.state.current_conversation_id(), image) {
            (Some(id), Some(image)) => (id, image),
            _ => return Ok(UploadOutcome::Skipped),
        };

        self.state.loading = true;
        let result = self.backend.upload_image(conversation_id, image).await;
        self.state.loading = false;

        match result {
            Ok(exchange) => {
                self.state.append_exchange(&exchange);
                self.push_quota(&exchange);
                self.speak(&exchange.reply.content).await;
                Ok(UploadOutcome::Uploaded(exchange))
            }
            Err(e) => {
                tracing::warn!(conversation_id, error = %e, "Failed to upload image");
                Err(e.into())
            }
        }
    }

    /// Read an image from disk and upload it.
    pub async fn upload_image_file(&mut self, path: &Path) -> Result<UploadOutcome, ChatError> {
        if self.state.current_conversation.is_none() {
            return Ok(UploadOutcome::Skipped);
        }
        let image = ImageUpload::from_path(path).await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
            ChatError::from(e)
        })?;
        self.upload_image(Some(image)).await
    }

    // -------------------------------------------------------------------------
    // Dialogs and chrome
    // -------------------------------------------------------------------------

    /// Acknowledge the showing crisis alert.
    ///
    /// The alert is cleared whatever the backend answers. Returns `Ok(false)`
    /// without calling the backend when no alert is showing.
    pub async fn acknowledge_crisis(&mut self) -> Result<bool, ChatError> {
        if self.state.crisis_alert.is_none() {
            return Ok(false);
        }
        let result = self.backend.acknowledge_crisis().await;
        self.state.crisis_alert = None;
        match result {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Crisis acknowledgement failed");
                Err(e.into())
            }
        }
    }

    pub fn dismiss_quota_warning(&mut self) {
        self.state.quota_warning = false;
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.state.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) {
        self.state.sidebar_open = !self.state.sidebar_open;
    }

    /// Invite a friend to unlock bonus exchanges for both accounts.
    pub async fn invite_friend(&mut self, email: &str) -> Result<InviteReceipt, ChatError> {
        let receipt = self.backend.invite(email.trim()).await.map_err(|e| {
            tracing::warn!(error = %e, "Invitation failed");
            ChatError::from(e)
        })?;
        tracing::info!(email_sent = receipt.email_sent, "Invitation created");
        Ok(receipt)
    }

    /// End the session and drop all view state.
    pub async fn logout(&mut self) -> Result<(), ChatError> {
        self.voice.stop_audio();
        let result = self.auth.logout().await;
        self.state = ChatState::default();
        result
    }

    // -- Private helpers --

    fn push_quota(&self, exchange: &Exchange) {
        if let Some(quota) = exchange.quota_remaining {
            self.auth.update_user(UserPatch::quota(quota));
        }
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.voice.play_audio(text).await {
            tracing::warn!(error = %e, "Playback failed");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
