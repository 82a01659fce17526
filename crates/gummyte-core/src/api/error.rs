use thiserror::Error;

/// Message used when a rejected login carries no reason from the server
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// Credential rejected, or the login request never reached the server
    #[error("{0}")]
    Auth(String),

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Server Error: {0}")]
    ServerError(u16),

    #[error("Received invalid data format: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Transport(String),

    /// Rejected locally before any request was sent
    #[error("{0}")]
    Validation(String),
}

/// Maximum length for response bodies quoted in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AdminError {
    /// Map a non-success status from an authenticated read.
    /// 401 and 403 both mean the token is no longer accepted.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => AdminError::SessionExpired,
            other => AdminError::ServerError(other),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, AdminError::SessionExpired)
    }

    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdminError::Transport("request timed out".to_string())
        } else {
            AdminError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(AdminError::from_status(401), AdminError::SessionExpired);
        assert_eq!(AdminError::from_status(403), AdminError::SessionExpired);
        assert_eq!(AdminError::from_status(404), AdminError::ServerError(404));
        assert_eq!(AdminError::from_status(500), AdminError::ServerError(500));
        assert!(AdminError::from_status(403).is_session_expired());
        assert!(!AdminError::from_status(500).is_session_expired());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(AdminError::ServerError(502).to_string(), "Server Error: 502");
        assert_eq!(
            AdminError::SessionExpired.to_string(),
            "Session expired. Please login again."
        );
        assert_eq!(AdminError::Auth("bad password".into()).to_string(), "bad password");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(AdminError::truncate_body("short"), "short");

        // 3-byte chars so the cut point lands inside one
        let long = "€".repeat(200);
        let truncated = AdminError::truncate_body(&long);
        assert!(truncated.starts_with(&"€".repeat(166)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }
}
