//! Chat screen for the NonoTalk companion.
//!
//! Owns the screen's view state and runs the user flows (bootstrap, send,
//! voice, image upload, crisis acknowledgement) against a [`ChatBackend`]
//! gateway. Authentication and voice I/O are injected through the
//! [`AuthProvider`] and [`VoiceProvider`] traits.
//!
//! [`ChatBackend`]: nonotalk_client::ChatBackend

pub mod collaborators;
pub mod controller;
pub mod error;
pub mod policy;
pub mod render;
pub mod session_auth;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use collaborators::{AuthProvider, VoiceProvider};
pub use controller::{BootstrapOutcome, ChatController, SendOutcome, UploadOutcome, VoiceOutcome};
pub use error::ChatError;
pub use policy::MainConversationPolicy;
pub use render::{render, render_text, ChatView, RenderContext};
pub use session_auth::SessionAuth;
pub use state::ChatState;
