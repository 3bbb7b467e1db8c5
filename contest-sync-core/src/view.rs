//! What to show for a given pair of state records.

use url::Url;

use crate::protocol::{Contest, SyncStats};
use crate::state::{AuthState, SyncState};

/// The screen to present. Computed from the state records alone; a view
/// carries no state of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    AuthLoading,
    LoginPrompt {
        login_url: Url,
        notice: Option<String>,
    },
    Ready {
        email: String,
    },
    Syncing {
        email: String,
    },
    SyncComplete {
        email: String,
        message: String,
        contests: Vec<Contest>,
        stats: SyncStats,
    },
    SyncFailed {
        email: String,
        message: String,
    },
}

impl View {
    pub fn from_states(auth: &AuthState, sync: &SyncState, login_url: &Url) -> Self {
        let email = match auth {
            AuthState::Loading => return View::AuthLoading,
            AuthState::LoggedOut { notice } => {
                return View::LoginPrompt {
                    login_url: login_url.clone(),
                    notice: notice.clone(),
                };
            }
            AuthState::LoggedIn { email, .. } => email.clone(),
        };

        match sync {
            SyncState::Idle => View::Ready { email },
            SyncState::InFlight => View::Syncing { email },
            SyncState::Complete {
                message,
                new_contests,
                stats,
            } => View::SyncComplete {
                email,
                message: message.clone(),
                contests: new_contests.clone(),
                stats: *stats,
            },
            SyncState::Failed { message } => View::SyncFailed {
                email,
                message: message.clone(),
            },
        }
    }
}
