//! API client for the Gummyte backend.
//!
//! Wraps a `Transport` and maps raw HTTP exchanges onto typed results.
//! The client itself is stateless; the bearer token is passed in by
//! `auth::AdminSession`, which owns it.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::SessionToken;
use crate::models::{ContactForm, NotifyRequest, Record, RecordKind};

use super::error::LOGIN_FAILED_MESSAGE;
use super::{AdminError, ApiRequest, ApiResponse, Transport};

// ============================================================================
// Constants
// ============================================================================

const LOGIN_PATH: &str = "/admin/login";
const NOTIFY_PATH: &str = "/notify";
const CONTACT_PATH: &str = "/contact";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Exchange the admin password for a bearer token.
    ///
    /// Every failure, including an unreachable server, is reported as
    /// `AdminError::Auth` carrying a message fit to show the operator.
    pub async fn authenticate(&self, password: &str) -> Result<SessionToken, AdminError> {
        let request = ApiRequest::post(LOGIN_PATH, json!({ "password": password }));

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AdminError::Auth(e.to_string()))?;

        if !response.is_success() {
            warn!(status = response.status, "Login rejected by server");
            return Err(AdminError::Auth(Self::login_error_message(&response)));
        }

        let parsed: LoginResponse = serde_json::from_str(&response.body).map_err(|e| {
            warn!(error = %e, "Failed to parse login response");
            AdminError::Auth(LOGIN_FAILED_MESSAGE.to_string())
        })?;

        match parsed.token {
            Some(token) if !token.is_empty() => Ok(SessionToken::new(token)),
            _ => {
                warn!("Login response did not contain a token");
                Err(AdminError::Auth(LOGIN_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Server-provided `error` field, or the generic fallback
    fn login_error_message(response: &ApiResponse) -> String {
        serde_json::from_str::<ErrorResponse>(&response.body)
            .ok()
            .and_then(|e| e.error)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string())
    }

    /// Fetch one admin collection, in server order.
    pub async fn fetch_records(
        &self,
        token: &SessionToken,
        kind: RecordKind,
    ) -> Result<Vec<Record>, AdminError> {
        let request = ApiRequest::get(kind.path()).with_bearer(token.as_str());
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            debug!(
                status = response.status,
                body = %AdminError::truncate_body(&response.body),
                "Record fetch failed"
            );
            return Err(AdminError::from_status(response.status));
        }

        let records = kind.decode(&response.body)?;
        debug!(kind = %kind, count = records.len(), "Records decoded");
        Ok(records)
    }

    // ===== Public Forms =====

    /// Register an email for launch notifications
    pub async fn submit_notify(&self, email: &str) -> Result<(), AdminError> {
        let body = NotifyRequest::new(email)?;
        let request = ApiRequest::post(NOTIFY_PATH, json!(body));
        Self::expect_success(self.transport.send(request).await?)
    }

    /// Send a contact message
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<(), AdminError> {
        form.validate()?;
        let request = ApiRequest::post(CONTACT_PATH, json!(form));
        Self::expect_success(self.transport.send(request).await?)
    }

    fn expect_success(response: ApiResponse) -> Result<(), AdminError> {
        if response.is_success() {
            Ok(())
        } else {
            warn!(status = response.status, "Form submission rejected");
            Err(AdminError::ServerError(response.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;

    #[tokio::test]
    async fn test_authenticate_sends_password() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"token": "T1"}));
        let client = ApiClient::new(mock.clone());

        let token = client.authenticate("abc123").await.unwrap();
        assert_eq!(token.as_str(), "T1");

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/admin/login");
        assert_eq!(requests[0].body, Some(json!({"password": "abc123"})));
        assert!(requests[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_error_messages() {
        let mock = MockTransport::new();
        mock.respond(401, json!({"error": "bad password"}))
            .respond(500, json!({}))
            .respond_raw(502, "<html>Bad Gateway</html>")
            .respond(200, json!({"message": "ok"}))
            .fail("connection refused");
        let client = ApiClient::new(mock);

        let err = |r: Result<SessionToken, AdminError>| r.unwrap_err();
        assert_eq!(
            err(client.authenticate("x").await),
            AdminError::Auth("bad password".into())
        );
        assert_eq!(
            err(client.authenticate("x").await),
            AdminError::Auth("Login failed".into())
        );
        assert_eq!(
            err(client.authenticate("x").await),
            AdminError::Auth("Login failed".into())
        );
        // 200 without a token is not a usable login
        assert_eq!(
            err(client.authenticate("x").await),
            AdminError::Auth("Login failed".into())
        );
        assert_eq!(
            err(client.authenticate("x").await),
            AdminError::Auth("Network error: connection refused".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_records_status_mapping() {
        let mock = MockTransport::new();
        mock.respond(401, json!({}))
            .respond(403, json!({}))
            .respond(500, json!({"error": "db down"}));
        let client = ApiClient::new(mock);
        let token = SessionToken::new("T1");

        for expected in [
            AdminError::SessionExpired,
            AdminError::SessionExpired,
            AdminError::ServerError(500),
        ] {
            let err = client
                .fetch_records(&token, RecordKind::Messages)
                .await
                .unwrap_err();
            assert_eq!(err, expected);
        }
    }

    #[tokio::test]
    async fn test_submit_notify() {
        let mock = MockTransport::new();
        mock.respond(201, json!({"ok": true})).respond(500, json!({}));
        let client = ApiClient::new(mock.clone());

        client.submit_notify("fan@example.com").await.unwrap();
        assert_eq!(
            client.submit_notify("fan@example.com").await,
            Err(AdminError::ServerError(500))
        );

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/notify");
        assert_eq!(requests[0].body, Some(json!({"email": "fan@example.com"})));
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_forms_without_request() {
        let mock = MockTransport::new();
        let client = ApiClient::new(mock.clone());

        assert!(matches!(
            client.submit_notify("  ").await,
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            client.submit_contact(&ContactForm::new("Asha", "a@b.co", "")).await,
            Err(AdminError::Validation(_))
        ));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_contact() {
        let mock = MockTransport::new();
        mock.respond(200, json!({})).fail("dns error");
        let client = ApiClient::new(mock.clone());
        let form = ContactForm::new("Asha", "asha@example.com", "Where can I buy?");

        client.submit_contact(&form).await.unwrap();
        assert_eq!(
            client.submit_contact(&form).await,
            Err(AdminError::Transport("dns error".into()))
        );

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/contact");
        assert_eq!(
            requests[0].body,
            Some(json!({"name": "Asha", "email": "asha@example.com", "message": "Where can I buy?"}))
        );
    }
}
