//! HTTP client for the dashboard's backend API.
//!
//! This module provides the `ApiClient` and its interceptor chains:
//! - `BearerAuth` attaches the stored credential to every outgoing request
//! - `SessionExpiry` ends the session when the server answers 401
//!
//! The base API origin comes from configuration.

pub mod client;
pub mod error;
pub mod interceptor;

pub use client::ApiClient;
pub use error::ApiError;
pub use interceptor::{BearerAuth, RequestInterceptor, ResponseInterceptor, SessionExpiry};
