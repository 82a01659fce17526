//! Application state management for the Gummyte dashboard.
//!
//! This module contains the core `App` struct that owns the admin session
//! and all UI state: active tab, selection, login form and status line.

use anyhow::Result;
use chrono::{DateTime, Local};
use gummyte_core::{
    AdminError, AdminSession, HttpTransport, MemoryTokenStore, Record, RecordKind, Transport,
};
use tracing::{debug, info, warn};

use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

const PASSWORD_REQUIRED_MESSAGE: &str = "Password required";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Password,
    Button,
}

/// Network work requested by input handling.
///
/// Input only queues an action; the main loop redraws (so the loading state
/// is visible) and then runs it. A single slot means a second login or
/// refresh cannot be queued while one is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Login,
    Refresh,
}

pub type DashboardSession = AdminSession<Box<dyn Transport>, MemoryTokenStore>;

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: DashboardSession,

    // UI State
    pub state: AppState,
    pub current_tab: RecordKind,
    pub selection: usize,

    // Login form state
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Status
    pub status_message: Option<String>,
    /// Error from the last fetch, shown in place of an empty table
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,

    pending: Option<PendingAction>,
}

impl App {
    /// Create the application against the configured API URL
    pub fn new(config: Config, store: MemoryTokenStore) -> Result<Self> {
        let api_url = config.api_url();
        debug!(api_url = %api_url, "Creating HTTP transport");
        let transport: Box<dyn Transport> = Box::new(HttpTransport::new(&api_url)?);
        Ok(Self::with_session(config, AdminSession::new(transport, store)))
    }

    pub fn with_session(config: Config, session: DashboardSession) -> Self {
        let current_tab = config.initial_tab();
        Self {
            config,
            session,

            state: AppState::Normal,
            current_tab,
            selection: 0,

            login_password: String::new(),
            login_focus: LoginFocus::Password,
            login_error: None,

            status_message: None,
            last_error: None,
            last_updated: None,

            pending: None,
        }
    }

    // =========================================================================
    // Pending actions
    // =========================================================================

    /// Queue network work for the main loop. Ignored while another action waits.
    pub fn queue(&mut self, action: PendingAction) {
        if self.pending.is_none() {
            self.pending = Some(action);
        }
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the queued action, if any
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending else {
            return;
        };
        match action {
            PendingAction::Login => {
                let _ = self.attempt_login().await;
            }
            PendingAction::Refresh => self.refresh_current_tab().await,
        }
        self.pending = None;
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = LoginFocus::Password;
        self.login_error = None;
    }

    /// Submit the login form. Empty passwords are refused without a request.
    pub async fn attempt_login(&mut self) -> Result<()> {
        if self.login_password.is_empty() {
            self.login_error = Some(PASSWORD_REQUIRED_MESSAGE.to_string());
            return Err(anyhow::anyhow!(PASSWORD_REQUIRED_MESSAGE));
        }

        self.login_error = None;
        let password = std::mem::take(&mut self.login_password);

        match self.session.login(&password).await {
            Ok(_) => {
                self.state = AppState::Normal;
                self.status_message = None;
                info!("Login successful");
                self.refresh_current_tab().await;
                Ok(())
            }
            Err(e) => {
                // Keep what was typed so the operator can correct it
                self.login_password = password;
                self.login_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Log out and return to the login overlay
    pub fn logout(&mut self) {
        self.session.logout();
        self.login_password.clear();
        self.selection = 0;
        self.last_error = None;
        self.last_updated = None;
        self.status_message = Some("Logged out".to_string());
        self.start_login();
    }

    fn handle_session_expired(&mut self) {
        let message = AdminError::SessionExpired.to_string();
        self.login_password.clear();
        self.selection = 0;
        self.last_updated = None;
        self.start_login();
        self.login_error = Some(message.clone());
        self.last_error = Some(message);
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Fetch the current tab's records
    pub async fn refresh_current_tab(&mut self) {
        let kind = self.current_tab;
        match self.session.fetch_records(kind).await {
            Ok(records) => {
                let count = records.len();
                if !self.session.is_authenticated() {
                    // Nothing was fetched
                    return;
                }
                self.selection = self.selection.min(count.saturating_sub(1));
                self.last_error = None;
                self.last_updated = Some(Local::now());
                self.status_message = Some(format!("Loaded {} {}", count, kind.slug()));
            }
            Err(AdminError::SessionExpired) => self.handle_session_expired(),
            Err(e) => {
                let message = user_message(&e);
                warn!(error = %e, kind = %kind, "Refresh failed");
                self.status_message = Some(message.clone());
                self.last_error = Some(message);
            }
        }
    }

    /// Switch to a tab and queue a fetch for it
    pub fn switch_tab(&mut self, kind: RecordKind) {
        if self.current_tab == kind {
            return;
        }
        self.current_tab = kind;
        self.selection = 0;
        self.last_error = None;
        self.config.last_tab = Some(kind);
        self.queue(PendingAction::Refresh);
    }

    /// Records for the active tab. Empty while the session holds another tab's set.
    pub fn records(&self) -> &[Record] {
        if self.session.records_kind() == Some(self.current_tab) {
            self.session.records()
        } else {
            &[]
        }
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.records().get(self.selection)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn max_index(&self) -> usize {
        self.records().len().saturating_sub(1)
    }

    pub fn select_next(&mut self, step: usize) {
        self.selection = (self.selection + step).min(self.max_index());
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.max_index();
    }
}

/// Short operator-facing text for a fetch failure
fn user_message(err: &AdminError) -> String {
    match err {
        AdminError::MalformedResponse(_) => "Received invalid data format".to_string(),
        AdminError::Transport(_) => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        other => other.to_string(),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================
