//! Backend gateway for the NonoTalk companion service.
//!
//! Exposes the [`ChatBackend`] trait, one async method per REST call, and
//! [`HttpBackend`], its reqwest implementation with a session cookie store.

pub mod backend;
pub mod error;
pub mod http;
pub mod upload;
pub mod wire;

pub use backend::ChatBackend;
pub use error::GatewayError;
pub use http::HttpBackend;
pub use upload::ImageUpload;
pub use wire::{InviteReceipt, SendReply};
