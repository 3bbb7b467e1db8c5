//! Session state records.
//!
//! [`AuthState`] and [`SyncState`] are plain values. The controller owns the
//! live copies and hands out clones, so anything rendering them works on a
//! consistent snapshot.

use crate::protocol::{Contest, SyncStats};

/// Whether the backend session is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The startup auth check has not finished yet.
    #[default]
    Loading,
    LoggedIn {
        email: String,
        user_id: Option<String>,
    },
    /// `notice` explains why, when the auth check could not reach the backend at all.
    LoggedOut { notice: Option<String> },
}

impl AuthState {
    pub fn logged_out() -> Self {
        AuthState::LoggedOut { notice: None }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn { .. })
    }

    pub fn user_email(&self) -> Option<&str> {
        match self {
            AuthState::LoggedIn { email, .. } => Some(email),
            _ => None,
        }
    }
}

/// Outcome of the most recent sync request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    InFlight,
    Complete {
        message: String,
        new_contests: Vec<Contest>,
        stats: SyncStats,
    },
    Failed { message: String },
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncState::InFlight)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SyncState::Complete { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncState::Failed { .. })
    }

    /// Outcome or error text; empty while idle or in flight.
    pub fn message(&self) -> &str {
        match self {
            SyncState::Complete { message, .. } | SyncState::Failed { message } => message,
            SyncState::Idle | SyncState::InFlight => "",
        }
    }

    /// Contests added by the last successful sync; empty in every other state.
    pub fn new_contests(&self) -> &[Contest] {
        match self {
            SyncState::Complete { new_contests, .. } => new_contests,
            _ => &[],
        }
    }
}
