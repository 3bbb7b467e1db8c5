//! Client core for the contest-sync backend.
//!
//! This crate holds everything except the terminal front end:
//! - `SessionSyncController`, the session/sync state machine
//! - `AuthState` / `SyncState` records and the `View` derived from them
//! - the `Backend` seam and its reqwest implementation, `HttpBackend`
//! - configuration and session cookie persistence

pub mod backend;
pub mod client;
pub mod config;
pub mod controller;
pub mod cookies;
pub mod error;
pub mod protocol;
pub mod state;
pub mod view;

pub use backend::Backend;
pub use client::HttpBackend;
pub use config::ClientConfig;
pub use controller::SessionSyncController;
pub use error::{SessionError, SessionResult};
pub use protocol::{Contest, Reply, SyncStats};
pub use state::{AuthState, SyncState};
pub use view::View;
