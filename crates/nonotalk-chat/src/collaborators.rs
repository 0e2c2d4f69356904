//! Collaborator traits injected into the chat screen.
//!
//! Authentication and voice capture/playback live outside this crate. The
//! controller only sees them through these traits, which keeps every flow
//! testable with substitutable fakes.

use async_trait::async_trait;
use nonotalk_core::{User, UserPatch};

use crate::error::ChatError;

/// Session/auth provider owning the signed-in user.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Snapshot of the signed-in user, if any.
    fn user(&self) -> Option<User>;

    /// Merge a partial update into the signed-in user. No-op when signed out.
    fn update_user(&self, patch: UserPatch);

    /// End the session.
    async fn logout(&self) -> Result<(), ChatError>;
}

/// Voice capture and playback provider.
///
/// Capture is modelled as start/stop: `stop_recording` hands back whatever
/// transcript the provider produced, or `None` when nothing usable was heard.
#[async_trait]
pub trait VoiceProvider: Send + Sync {
    fn is_recording(&self) -> bool;

    fn is_playing(&self) -> bool;

    async fn start_recording(&self) -> Result<(), ChatError>;

    async fn stop_recording(&self) -> Result<Option<String>, ChatError>;

    /// Speak `text` aloud.
    async fn play_audio(&self, text: &str) -> Result<(), ChatError>;

    fn stop_audio(&self);
}
