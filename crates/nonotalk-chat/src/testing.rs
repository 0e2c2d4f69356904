//! In-memory fakes for the gateway and the collaborators.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use nonotalk_client::{ChatBackend, GatewayError, ImageUpload, InviteReceipt, SendReply};
use nonotalk_core::{Conversation, Exchange, Invitation, Message, QuotaStatus, User, UserPatch};

use crate::collaborators::{AuthProvider, VoiceProvider};
use crate::error::ChatError;

pub fn conversation(id: i64) -> Conversation {
    Conversation {
        id,
        title: Some("Conversation avec Nono".to_string()),
        user_id: Some(1),
        created_at: None,
        updated_at: None,
        message_count: Some(0),
    }
}

fn user(username: &str, quota_remaining: u32) -> User {
    User {
        id: Some(1),
        username: username.to_string(),
        email: None,
        quota_remaining,
        total_quota: Some(10),
        filleuls_count: Some(0),
    }
}

// =============================================================================
// Backend
// =============================================================================

/// A scripted reply for the next send.
#[derive(Debug, Clone)]
pub enum ScriptedSend {
    Exchange { quota_remaining: Option<u32> },
    Crisis(String),
    QuotaExhausted,
    Status(u16),
}

#[derive(Default)]
struct BackendState {
    calls: Vec<&'static str>,
    quota: u32,
    conversations: Vec<Conversation>,
    history: HashMap<i64, Vec<Message>>,
    next_id: i64,
    created_titles: Vec<String>,
    last_fetch_limit: Option<u32>,
    sends: VecDeque<ScriptedSend>,
    sent: Vec<(String, Option<String>)>,
    uploaded: Vec<(String, usize)>,
    acknowledgements: usize,
    fail_quota: bool,
    fail_list: bool,
    fail_ack: bool,
    fail_upload_quota: bool,
    fail_login: bool,
}

impl BackendState {
    fn message(&mut self, conversation_id: i64, content: &str, is_user: bool) -> Message {
        self.next_id += 1;
        Message {
            id: self.next_id,
            conversation_id: Some(conversation_id),
            content: content.to_string(),
            is_user,
            timestamp: None,
            emotion_detected: None,
            image_path: None,
            audio_path: None,
        }
    }

    fn exchange(
        &mut self,
        conversation_id: i64,
        prompt: &str,
        quota_remaining: Option<u32>,
    ) -> Exchange {
        let prompt = self.message(conversation_id, prompt, true);
        let reply = self.message(conversation_id, "Je suis là pour toi.", false);
        Exchange {
            prompt,
            reply,
            quota_remaining,
        }
    }

    fn spend_quota(&mut self) -> u32 {
        self.quota = self.quota.saturating_sub(1);
        self.quota
    }
}

/// Scriptable [`ChatBackend`] recording every call it receives.
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BackendState {
                quota: 8,
                next_id: 100,
                ..BackendState::default()
            }),
        }
    }

    pub fn with_conversations(self, conversations: Vec<Conversation>) -> Self {
        self.state.lock().unwrap().conversations = conversations;
        self
    }

    /// Seed `count` alternating user/companion messages for a conversation.
    pub fn with_history(self, conversation_id: i64, count: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let messages = (0..count)
                .map(|i| state.message(conversation_id, &format!("message {}", i), i % 2 == 0))
                .collect();
            state.history.insert(conversation_id, messages);
        }
        self
    }

    pub fn with_quota(self, quota: u32) -> Self {
        self.set_quota(quota);
        self
    }

    pub fn failing_quota(self) -> Self {
        self.state.lock().unwrap().fail_quota = true;
        self
    }

    pub fn failing_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    pub fn set_quota(&self, quota: u32) {
        self.state.lock().unwrap().quota = quota;
    }

    pub fn script_send(&self, reply: ScriptedSend) {
        self.state.lock().unwrap().sends.push_back(reply);
    }

    pub fn fail_acknowledgement(&self) {
        self.state.lock().unwrap().fail_ack = true;
    }

    pub fn fail_upload_with_quota(&self) {
        self.state.lock().unwrap().fail_upload_quota = true;
    }

    pub fn fail_next_login(&self) {
        self.state.lock().unwrap().fail_login = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.state.lock().unwrap().created_titles.clone()
    }

    pub fn last_fetch_limit(&self) -> Option<u32> {
        self.state.lock().unwrap().last_fetch_limit
    }

    pub fn sent(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn uploaded(&self) -> Vec<(String, usize)> {
        self.state.lock().unwrap().uploaded.clone()
    }

    pub fn acknowledgements(&self) -> usize {
        self.state.lock().unwrap().acknowledgements
    }

    fn record(&self, call: &'static str) -> std::sync::MutexGuard<'_, BackendState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

fn server_error(status: u16) -> GatewayError {
    GatewayError::Status {
        status,
        message: "Erreur serveur".to_string(),
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn check_quota(&self) -> Result<QuotaStatus, GatewayError> {
        let state = self.record("check_quota");
        if state.fail_quota {
            return Err(server_error(500));
        }
        Ok(QuotaStatus {
            quota_remaining: state.quota,
            total_quota: Some(10),
            can_chat: Some(state.quota > 0),
        })
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, GatewayError> {
        let state = self.record("list_conversations");
        if state.fail_list {
            return Err(server_error(500));
        }
        Ok(state.conversations.clone())
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, GatewayError> {
        let mut state = self.record("create_conversation");
        state.next_id += 1;
        let created = Conversation {
            title: Some(title.to_string()),
            ..conversation(state.next_id)
        };
        state.created_titles.push(title.to_string());
        state.conversations.insert(0, created.clone());
        Ok(created)
    }

    async fn fetch_messages(
        &self,
        conversation_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, GatewayError> {
        let mut state = self.record("fetch_messages");
        state.last_fetch_limit = limit;
        Ok(state.history.get(&conversation_id).cloned().unwrap_or_default())
    }

    async fn send_message(
        &self,
        conversation_id: i64,
        message: &str,
        emotion: Option<&str>,
    ) -> Result<SendReply, GatewayError> {
        let mut state = self.record("send_message");
        state
            .sent
            .push((message.to_string(), emotion.map(str::to_string)));
        let scripted = state.sends.pop_front();
        match scripted {
            Some(ScriptedSend::Exchange { quota_remaining }) => Ok(SendReply::Exchange(
                state.exchange(conversation_id, message, quota_remaining),
            )),
            Some(ScriptedSend::Crisis(emergency_message)) => {
                Ok(SendReply::Crisis { emergency_message })
            }
            Some(ScriptedSend::QuotaExhausted) => Err(GatewayError::QuotaExhausted(
                "Quota épuisé".to_string(),
            )),
            Some(ScriptedSend::Status(status)) => Err(server_error(status)),
            None => {
                let quota = state.spend_quota();
                Ok(SendReply::Exchange(
                    state.exchange(conversation_id, message, Some(quota)),
                ))
            }
        }
    }

    async fn upload_image(
        &self,
        conversation_id: i64,
        image: ImageUpload,
    ) -> Result<Exchange, GatewayError> {
        let mut state = self.record("upload_image");
        if state.fail_upload_quota {
            return Err(GatewayError::QuotaExhausted("Quota épuisé".to_string()));
        }
        state
            .uploaded
            .push((image.file_name.clone(), image.bytes.len()));
        let quota = state.spend_quota();
        let mut exchange = state.exchange(conversation_id, "[Image partagée]", Some(quota));
        exchange.prompt.image_path = Some(format!("uploads/{}", image.file_name));
        Ok(exchange)
    }

    async fn acknowledge_crisis(&self) -> Result<(), GatewayError> {
        let mut state = self.record("acknowledge_crisis");
        state.acknowledgements += 1;
        if state.fail_ack {
            return Err(server_error(500));
        }
        Ok(())
    }

    async fn login(&self, username: &str, _pin: &str) -> Result<User, GatewayError> {
        let mut state = self.record("login");
        if std::mem::take(&mut state.fail_login) {
            return Err(server_error(401));
        }
        Ok(user(username, state.quota))
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.record("logout");
        Ok(())
    }

    async fn current_user(&self) -> Result<User, GatewayError> {
        let state = self.record("current_user");
        Ok(user("alice", state.quota))
    }

    async fn invite(&self, email: &str) -> Result<InviteReceipt, GatewayError> {
        let mut state = self.record("invite");
        state.next_id += 1;
        Ok(InviteReceipt {
            message: Some("Invitation envoyée".to_string()),
            invitation: Invitation {
                id: state.next_id,
                email: email.to_string(),
                inviter_id: Some(1),
                accepted: false,
                created_at: None,
                accepted_at: None,
            },
            email_sent: true,
        })
    }
}

// =============================================================================
// Collaborators
// =============================================================================

/// [`AuthProvider`] holding a user in memory.
#[derive(Default)]
pub struct FakeAuth {
    user: Mutex<Option<User>>,
}

impl FakeAuth {
    pub fn signed_in(username: &str, quota_remaining: u32) -> Self {
        Self {
            user: Mutex::new(Some(user(username, quota_remaining))),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    fn user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    fn update_user(&self, patch: UserPatch) {
        if let Some(user) = self.user.lock().unwrap().as_mut() {
            user.apply(&patch);
        }
    }

    async fn logout(&self) -> Result<(), ChatError> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

/// [`VoiceProvider`] whose transcript is set by the test.
#[derive(Default)]
pub struct FakeVoice {
    recording: AtomicBool,
    playing: AtomicBool,
    fail_playback: AtomicBool,
    transcript: Mutex<Option<String>>,
    spoken: Mutex<Vec<String>>,
}

impl FakeVoice {
    pub fn set_transcript(&self, transcript: Option<&str>) {
        *self.transcript.lock().unwrap() = transcript.map(str::to_string);
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }

    pub fn fail_playback(&self) {
        self.fail_playback.store(true, Ordering::SeqCst);
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceProvider for FakeVoice {
    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    async fn start_recording(&self) -> Result<(), ChatError> {
        self.recording.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_recording(&self) -> Result<Option<String>, ChatError> {
        self.recording.store(false, Ordering::SeqCst);
        Ok(self.transcript.lock().unwrap().take())
    }

    async fn play_audio(&self, text: &str) -> Result<(), ChatError> {
        if self.fail_playback.load(Ordering::SeqCst) {
            return Err(ChatError::Voice("speaker unavailable".to_string()));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn stop_audio(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }
}
