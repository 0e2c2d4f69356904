//! Error types for the backend gateway.

/// Errors from a single gateway round trip.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    /// HTTP status carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::QuotaExhausted(_) => Some(403),
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::QuotaExhausted("Quota épuisé".to_string());
        assert_eq!(err.to_string(), "quota exhausted: Quota épuisé");

        let err = GatewayError::Status {
            status: 404,
            message: "Conversation non trouvée".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned 404: Conversation non trouvée"
        );

        let err = GatewayError::Decode("missing field `ai_message`".to_string());
        assert_eq!(
            err.to_string(),
            "unexpected response body: missing field `ai_message`"
        );

        let err = GatewayError::InvalidBaseUrl("ftp://x".to_string());
        assert_eq!(err.to_string(), "invalid backend URL: ftp://x");
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(
            GatewayError::QuotaExhausted(String::new()).status(),
            Some(403)
        );
        assert_eq!(
            GatewayError::Status {
                status: 500,
                message: String::new()
            }
            .status(),
            Some(500)
        );
        assert_eq!(GatewayError::Decode(String::new()).status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such image");
        let err: GatewayError = io_err.into();
        assert!(matches!(err, GatewayError::Io(_)));
        assert!(err.to_string().contains("no such image"));
    }
}
