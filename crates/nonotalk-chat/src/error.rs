//! Error types for the chat screen.

use nonotalk_client::GatewayError;

/// Errors surfaced by chat-screen flows.
///
/// Quota denials and crisis detections are not errors; they come back as
/// flow outcomes. What remains here is transport or backend failure and
/// collaborator failure.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("voice error: {0}")]
    Voice(String),
    #[error("auth error: {0}")]
    Auth(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::Voice("microphone unavailable".to_string());
        assert_eq!(err.to_string(), "voice error: microphone unavailable");

        let err = ChatError::Auth("not signed in".to_string());
        assert_eq!(err.to_string(), "auth error: not signed in");
    }

    #[test]
    fn test_chat_error_from_gateway_error() {
        let gateway = GatewayError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        let err: ChatError = gateway.into();
        assert!(matches!(
            err,
            ChatError::Gateway(GatewayError::Status { status: 502, .. })
        ));
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
