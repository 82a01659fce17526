//! REST API client module for the Gummyte backend.
//!
//! This module provides the `ApiClient` for the admin endpoints
//! (login, signups, messages) and the public form endpoints
//! (notify, contact).
//!
//! Admin reads use bearer token authentication. The token is obtained
//! from `POST /admin/login` and managed by `auth::AdminSession`.

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod transport;

pub use client::ApiClient;
pub use error::AdminError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
