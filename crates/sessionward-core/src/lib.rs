//! Session lifecycle and request authorization for an admin dashboard client.
//!
//! This crate provides:
//! - `storage`: the two storage tiers (durable and ephemeral) a session lives in
//! - `auth`: `TokenStore`, `SessionState` and the `AuthService` facade (login/logout)
//! - `api`: an HTTP client with bearer injection and forced logout on 401
//! - `navigation`: the route table, `RouteGuard` and `Router`
//! - `events`: the session event bus that connects them
//! - `notify`: user-facing notifications
//! - `config`: application configuration
//! - `app`: the components wired together

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod events;
pub mod navigation;
pub mod notify;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use app::SessionApp;
pub use auth::{AuthService, SessionState, TokenStore, UserProfile};
pub use config::Config;
pub use events::{SessionEvent, SessionEvents};
pub use navigation::{GuardPolicy, NavigationOutcome, Navigator, RouteGuard, RouteTable, Router};
pub use notify::{NotificationKind, Notifier, NotifyOptions, ToastQueue, TracingNotifier};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, Storage, StorageError};
