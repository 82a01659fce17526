use std::fmt;

use tracing::{debug, info, warn};

use crate::api::{AdminError, ApiClient, Transport};
use crate::models::{sort_newest_first, Record, RecordKind};

use super::{MemoryTokenStore, TokenStore};

/// Opaque bearer token issued by `POST /admin/login`.
/// The Debug output is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Admin session: holds the bearer token (through its store) and the most
/// recently fetched record set.
///
/// Methods take `&mut self`, so one session never has two requests in
/// flight. Sessions sharing a store observe each other's login and logout;
/// between them the last response applied wins.
pub struct AdminSession<T, S = MemoryTokenStore> {
    api: ApiClient<T>,
    store: S,
    records: Vec<Record>,
    records_kind: Option<RecordKind>,
}

impl<T: Transport, S: TokenStore> AdminSession<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self {
            api: ApiClient::new(transport),
            store,
            records: Vec::new(),
            records_kind: None,
        }
    }

    /// The underlying client, for the unauthenticated public forms
    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn state(&self) -> SessionState {
        if self.store.get().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Check the store for a token left by an earlier login in this process.
    /// Returns true when the session can skip the login prompt.
    pub fn restore(&self) -> bool {
        let restored = self.store.get().is_some();
        debug!(restored, "Checked token store for existing session");
        restored
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.store.get()
    }

    /// Current record set, newest first. Empty whenever no token is held,
    /// including after another session sharing the store logged out.
    pub fn records(&self) -> &[Record] {
        if self.is_authenticated() {
            &self.records
        } else {
            &[]
        }
    }

    /// Kind of the current record set, if one has been fetched
    pub fn records_kind(&self) -> Option<RecordKind> {
        if self.is_authenticated() {
            self.records_kind
        } else {
            None
        }
    }

    /// Exchange the credential for a token and store it.
    ///
    /// The credential is not validated locally and is not kept after this
    /// returns. On failure any previously stored token is left in place.
    pub async fn login(&mut self, credential: &str) -> Result<SessionToken, AdminError> {
        info!("Attempting admin login");
        match self.api.authenticate(credential).await {
            Ok(token) => {
                self.store.set(&token);
                info!("Admin login successful");
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Admin login failed");
                Err(e)
            }
        }
    }

    /// Fetch one collection with the held token.
    ///
    /// Without a token this is a no-op that drops any stale record set,
    /// returns it empty and makes no request. A 401/403 invalidates the session.
    /// Any other failure leaves the previous record set in place.
    pub async fn fetch_records(&mut self, kind: RecordKind) -> Result<&[Record], AdminError> {
        let Some(token) = self.store.get() else {
            debug!(kind = %kind, "No token held, skipping fetch");
            self.records.clear();
            self.records_kind = None;
            return Ok(&self.records);
        };

        match self.api.fetch_records(&token, kind).await {
            Ok(mut records) => {
                sort_newest_first(&mut records);
                info!(kind = %kind, count = records.len(), "Records fetched");
                self.records = records;
                self.records_kind = Some(kind);
                Ok(&self.records)
            }
            Err(AdminError::SessionExpired) => {
                warn!(kind = %kind, "Token rejected by server, ending session");
                self.invalidate();
                Err(AdminError::SessionExpired)
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Record fetch failed");
                Err(e)
            }
        }
    }

    /// Drop the token and the record set. Safe to call at any time.
    pub fn logout(&mut self) {
        if self.is_authenticated() {
            info!("Admin logout");
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.store.clear();
        self.records.clear();
        self.records_kind = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
