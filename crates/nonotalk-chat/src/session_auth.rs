//! Cookie-session auth provider backed by the gateway.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nonotalk_client::ChatBackend;
use nonotalk_core::{User, UserPatch};

use crate::collaborators::AuthProvider;
use crate::error::ChatError;

/// [`AuthProvider`] that signs in with username and PIN and keeps the
/// resulting user in memory for the lifetime of the session.
pub struct SessionAuth {
    backend: Arc<dyn ChatBackend>,
    user: Mutex<Option<User>>,
}

impl SessionAuth {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            user: Mutex::new(None),
        }
    }

    /// Sign in and remember the returned user.
    pub async fn login(&self, username: &str, pin: &str) -> Result<User, ChatError> {
        let user = self.backend.login(username, pin).await.map_err(|e| {
            tracing::warn!(username = %username, error = %e, "Login failed");
            ChatError::from(e)
        })?;
        tracing::info!(username = %user.username, quota_remaining = user.quota_remaining, "Signed in");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Re-read the signed-in user from the backend.
    pub async fn refresh(&self) -> Result<User, ChatError> {
        let user = self.backend.current_user().await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    fn set_user(&self, user: Option<User>) {
        match self.user.lock() {
            Ok(mut guard) => *guard = user,
            Err(e) => tracing::error!("User lock poisoned: {}", e),
        }
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    fn user(&self) -> Option<User> {
        self.user.lock().ok().and_then(|u| u.clone())
    }

    fn update_user(&self, patch: UserPatch) {
        match self.user.lock() {
            Ok(mut guard) => {
                if let Some(user) = guard.as_mut() {
                    user.apply(&patch);
                }
            }
            Err(e) => tracing::error!("User lock poisoned: {}", e),
        }
    }

    async fn logout(&self) -> Result<(), ChatError> {
        let result = self.backend.logout().await;
        // The local session ends even if the backend call failed.
        self.set_user(None);
        result.map_err(|e| {
            tracing::warn!(error = %e, "Logout request failed");
            ChatError::from(e)
        })
    }
}
