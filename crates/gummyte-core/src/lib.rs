//! Core library for the Gummyte admin dashboard.
//!
//! Provides the pieces the terminal front-end is built on:
//!
//! - `api`: HTTP transport, the `ApiClient` and the `AdminError` taxonomy
//! - `auth`: the `AdminSession` state machine and its injected `TokenStore`
//! - `models`: signup and contact-message records, public form payloads
//! - `utils`: display formatting helpers

pub mod api;
pub mod auth;
pub mod models;
pub mod utils;

pub use api::{AdminError, ApiClient, ApiRequest, ApiResponse, HttpTransport, Transport};
pub use auth::{AdminSession, MemoryTokenStore, SessionState, SessionToken, TokenStore};
pub use models::{ContactForm, MessageRecord, Record, RecordKind, SignupRecord};
