//! Terminal stand-in for voice capture and playback.
//!
//! While recording, the next line typed at the prompt is taken as the
//! transcript. Playback prints the text instead of speaking it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use nonotalk_chat::{ChatError, VoiceProvider};

#[derive(Default)]
pub struct ConsoleVoice {
    recording: AtomicBool,
    playing: AtomicBool,
    pending: Mutex<Option<String>>,
}

impl ConsoleVoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `text` as what was heard. Ignored when not recording.
    pub fn capture(&self, text: &str) -> Result<(), ChatError> {
        if !self.is_recording() {
            return Ok(());
        }
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| ChatError::Voice(format!("transcript lock poisoned: {}", e)))?;
        *pending = Some(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl VoiceProvider for ConsoleVoice {
    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    async fn start_recording(&self) -> Result<(), ChatError> {
        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(ChatError::Voice("already recording".to_string()));
        }
        Ok(())
    }

    async fn stop_recording(&self) -> Result<Option<String>, ChatError> {
        if !self.recording.swap(false, Ordering::SeqCst) {
            return Err(ChatError::Voice("not recording".to_string()));
        }
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| ChatError::Voice(format!("transcript lock poisoned: {}", e)))?;
        Ok(pending.take())
    }

    async fn play_audio(&self, text: &str) -> Result<(), ChatError> {
        self.playing.store(true, Ordering::SeqCst);
        println!("🔊 {}", text);
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop_audio(&self) {
        if self.playing.swap(false, Ordering::SeqCst) {
            tracing::debug!("Playback stopped");
        }
    }
}
