//! Gummyte - a terminal dashboard for the Gummyte site's admin API.
//!
//! Lists email signups and contact messages behind the admin password,
//! and offers one-shot commands for the public notify/contact forms and
//! for exporting records as JSON.

mod app;
mod config;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gummyte_core::{
    AdminSession, ContactForm, HttpTransport, MemoryTokenStore, Record, RecordKind, SessionToken,
    TokenStore, Transport,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState, PendingAction};
use config::{Config, ADMIN_TOKEN_ENV};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const USAGE: &str = "\
Usage:
  gummyte                                   Open the admin dashboard
  gummyte --notify <email>                  Sign up for launch notifications
  gummyte --contact <name> <email> <msg>    Send a contact message
  gummyte --export <signups|messages>       Print admin records as JSON";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logging for one-shot commands goes to stderr
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// The dashboard owns the terminal, so its logs go to a daily file.
/// The returned guard must live until shutdown to flush buffered lines.
fn init_file_tracing() -> Option<WorkerGuard> {
    let log_dir = match Config::log_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, "gummyte.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Some(guard)
}

fn load_config() -> Config {
    match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

/// Process-scoped token store, optionally seeded from the environment
fn token_store() -> MemoryTokenStore {
    let store = MemoryTokenStore::new();
    if let Ok(token) = std::env::var(ADMIN_TOKEN_ENV) {
        if !token.trim().is_empty() {
            store.set(&SessionToken::new(token.trim()));
        }
    }
    store
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {}
        Some("--notify") => {
            init_stderr_tracing();
            return notify(&args[1..]).await;
        }
        Some("--contact") => {
            init_stderr_tracing();
            return contact(&args[1..]).await;
        }
        Some("--export") => {
            init_stderr_tracing();
            return export(&args[1..]).await;
        }
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(other) => bail!("Unknown argument '{}'\n\n{}", other, USAGE),
    }

    let _log_guard = init_file_tracing();
    info!("Gummyte dashboard starting");

    let config = load_config();
    let mut app = App::new(config, token_store())?;

    if app.session.restore() {
        app.state = AppState::Normal;
        app.queue(PendingAction::Refresh);
    } else {
        app.start_login();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = app.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Gummyte dashboard shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Queued network work runs after the frame showing its loading state
        if app.is_busy() {
            app.run_pending().await;
            continue;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// One-shot commands
// ============================================================================

fn session(config: &Config) -> Result<AdminSession<HttpTransport>> {
    let transport = HttpTransport::new(&config.api_url())?;
    Ok(AdminSession::new(transport, token_store()))
}

/// Sign up an email for launch notifications
async fn notify(args: &[String]) -> Result<()> {
    let [email] = args else {
        bail!("--notify takes exactly one email\n\n{}", USAGE);
    };

    let session = session(&load_config())?;
    session
        .api()
        .submit_notify(email)
        .await
        .context("Failed to submit notify signup")?;

    eprintln!("Thanks! {} will be notified at launch.", email);
    Ok(())
}

/// Send a contact message
async fn contact(args: &[String]) -> Result<()> {
    let [name, email, message] = args else {
        bail!("--contact takes <name> <email> <message>\n\n{}", USAGE);
    };

    let form = ContactForm::new(name.as_str(), email.as_str(), message.as_str());
    let session = session(&load_config())?;
    session
        .api()
        .submit_contact(&form)
        .await
        .context("Failed to send contact message")?;

    eprintln!("Message sent.");
    Ok(())
}

/// Log in and print one admin collection to stdout as JSON, newest first
async fn export(args: &[String]) -> Result<()> {
    let [kind] = args else {
        bail!("--export takes signups or messages\n\n{}", USAGE);
    };
    let kind: RecordKind = kind.parse()?;

    let mut session = session(&load_config())?;
    let records = fetch_for_export(&mut session, kind, prompt_password).await?;

    eprintln!("Fetched {} {}", records.len(), kind);
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Admin password: ")?;
    if password.is_empty() {
        bail!("Password required");
    }
    Ok(password)
}

/// Fetch with the restored token if there is one. A token the server no
/// longer accepts gets one password prompt and a retry.
async fn fetch_for_export<T, S, F>(
    session: &mut AdminSession<T, S>,
    kind: RecordKind,
    mut prompt: F,
) -> Result<Vec<Record>>
where
    T: Transport,
    S: TokenStore,
    F: FnMut() -> Result<String>,
{
    if session.restore() {
        match session.fetch_records(kind).await {
            Ok(records) => return Ok(records.to_vec()),
            Err(e) if e.is_session_expired() => {
                warn!("Stored admin token was rejected, asking for the password");
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to fetch {}", kind)),
        }
    }

    let password = prompt()?;
    session.login(&password).await.context("Login failed")?;

    let records = session
        .fetch_records(kind)
        .await
        .with_context(|| format!("Failed to fetch {}", kind))?;
    Ok(records.to_vec())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use gummyte_core::{AdminError, ApiRequest, ApiResponse};

    use super::*;

    #[derive(Clone, Default)]
    struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<ApiResponse>>>,
        requests: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl ScriptedTransport {
        fn push(&self, status: u16, body: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(ApiResponse::new(status, body));
        }

        fn bearers(&self) -> Vec<Option<String>> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.bearer.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AdminError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AdminError::Transport("no response scripted".into()))
        }
    }

    const ONE_SIGNUP: &str =
        r#"[{"_id": "a", "email": "fan@example.com", "timestamp": "2025-03-01T10:00:00Z"}]"#;

    #[tokio::test]
    async fn test_export_with_valid_stored_token_skips_prompt() {
        let transport = ScriptedTransport::default();
        transport.push(200, ONE_SIGNUP);
        let store = MemoryTokenStore::with_token(SessionToken::new("T1"));
        let mut session = AdminSession::new(transport.clone(), store);

        let records = fetch_for_export(&mut session, RecordKind::Signups, || {
            panic!("should not prompt")
        })
        .await
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(transport.bearers(), vec![Some("T1".to_string())]);
    }

    #[tokio::test]
    async fn test_export_expired_token_prompts_once_and_retries() {
        let transport = ScriptedTransport::default();
        transport.push(401, "{}");
        transport.push(200, r#"{"token": "T2"}"#);
        transport.push(200, ONE_SIGNUP);
        let store = MemoryTokenStore::with_token(SessionToken::new("stale"));
        let mut session = AdminSession::new(transport.clone(), store);

        let mut prompts = 0;
        let records = fetch_for_export(&mut session, RecordKind::Signups, || {
            prompts += 1;
            Ok("abc123".to_string())
        })
        .await
        .unwrap();

        assert_eq!(prompts, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(
            transport.bearers(),
            vec![Some("stale".to_string()), None, Some("T2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_export_server_error_does_not_prompt() {
        let transport = ScriptedTransport::default();
        transport.push(500, "{}");
        let store = MemoryTokenStore::with_token(SessionToken::new("T1"));
        let mut session = AdminSession::new(transport.clone(), store);

        let result = fetch_for_export(&mut session, RecordKind::Messages, || {
            panic!("should not prompt")
        })
        .await;

        assert!(result.is_err());
        assert_eq!(transport.bearers().len(), 1);
    }
}
