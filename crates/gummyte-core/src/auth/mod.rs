//! Authentication module for the admin dashboard.
//!
//! This module provides:
//! - `AdminSession`: login, authenticated record reads, logout, and
//!   reaction to server-side token invalidation
//! - `TokenStore`: the injected storage capability for the bearer token,
//!   with `MemoryTokenStore` as the process-scoped implementation
//!
//! Tokens carry no client-side expiry. A token is trusted until the
//! server answers 401 or 403.

pub mod session;
pub mod store;

pub use session::{AdminSession, SessionState, SessionToken};
pub use store::{MemoryTokenStore, TokenStore};
