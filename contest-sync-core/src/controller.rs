//! Session/sync state machine.
//!
//! [`SessionSyncController`] owns the [`AuthState`] and [`SyncState`] records
//! and is the only thing that talks to the [`Backend`]. Records are updated
//! before a request is dispatched and after it completes, never while it is
//! outstanding; the lock guarding them is never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use crate::backend::Backend;
use crate::error::{SessionError, SessionResult};
use crate::protocol::{CheckAuthResponse, SyncResponse};
use crate::state::{AuthState, SyncState};
use crate::view::View;

/// Appended to sync failures that look like an expired or missing session.
pub const REAUTH_GUIDANCE: &str = "Try logging out and logging in again.";

const AUTH_HINTS: &[&str] = &[
    "auth",
    "token",
    "login",
    "log in",
    "logging in",
    "session",
    "credential",
    "expired",
    "unauthorized",
    "forbidden",
];

#[derive(Default)]
struct Records {
    auth: AuthState,
    sync: SyncState,
    /// Bumped by logout. Responses to requests sent under an older epoch are dropped.
    epoch: u64,
}

pub struct SessionSyncController<B> {
    backend: B,
    records: Mutex<Records>,
}

impl<B: Backend> SessionSyncController<B> {
    pub fn new(backend: B) -> Self {
        SessionSyncController {
            backend,
            records: Mutex::new(Records::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn auth(&self) -> AuthState {
        self.records().auth.clone()
    }

    pub fn sync_state(&self) -> SyncState {
        self.records().sync.clone()
    }

    pub fn login_url(&self) -> Url {
        self.backend.login_url()
    }

    pub fn view(&self) -> View {
        let records = self.records();
        View::from_states(&records.auth, &records.sync, &self.backend.login_url())
    }

    /// Ask the backend whether the current cookie carries a session.
    ///
    /// Every failure ends logged out. A transport failure additionally leaves
    /// a notice on the logged-out state so it can be told apart from a plain
    /// "no session".
    pub async fn check_auth(&self) -> AuthState {
        let epoch = {
            let mut records = self.records();
            records.auth = AuthState::Loading;
            records.epoch
        };

        let outcome = self
            .backend
            .check_auth()
            .await
            .and_then(|reply| reply.decode::<CheckAuthResponse>())
            .and_then(CheckAuthResponse::into_user);

        let next = match outcome {
            Ok(user) => {
                info!(email = %user.email, "session is authenticated");
                AuthState::LoggedIn {
                    email: user.email,
                    user_id: user.id,
                }
            }
            Err(SessionError::Transport(e)) => {
                warn!(error = %e, "could not reach backend for auth check");
                AuthState::LoggedOut {
                    notice: Some(format!("Could not reach the backend: {e}")),
                }
            }
            Err(e) => {
                info!(reason = %e, "no active session");
                AuthState::logged_out()
            }
        };

        let mut records = self.records();
        if records.epoch == epoch {
            records.auth = next;
        } else {
            debug!("discarding auth check that straddled a logout");
        }
        records.auth.clone()
    }

    /// Ask the backend to sync contests into the user's calendar.
    ///
    /// Returns [`SessionError::SyncInProgress`] without dispatching anything
    /// if a previous sync has not completed. Every other failure is folded
    /// into [`SyncState::Failed`].
    pub async fn sync(&self) -> SessionResult<SyncState> {
        let epoch = {
            let mut records = self.records();
            if records.sync.is_loading() {
                return Err(SessionError::SyncInProgress);
            }
            records.sync = SyncState::InFlight;
            records.epoch
        };

        let outcome = self
            .backend
            .sync()
            .await
            .and_then(|reply| reply.decode::<SyncResponse>());

        let next = match outcome {
            Ok(resp) => {
                let new_contests = resp.new_contests.unwrap_or_default();
                info!(
                    added = new_contests.len(),
                    message = %resp.message,
                    "sync complete"
                );
                SyncState::Complete {
                    message: resp.message,
                    new_contests,
                    stats: resp.stats,
                }
            }
            Err(e) => {
                warn!(error = %e, "sync failed");
                SyncState::Failed {
                    message: failure_message(&e),
                }
            }
        };

        let mut records = self.records();
        if records.epoch != epoch {
            debug!("discarding sync response from a previous session");
            return Ok(records.sync.clone());
        }
        records.sync = next;
        Ok(records.sync.clone())
    }

    /// End the session.
    ///
    /// The backend call is fire-and-forget: backend logout is assumed to be
    /// idempotent, so its outcome is only logged. Local state is reset either
    /// way, both before the request goes out and again once it settles, so
    /// anything started while it was outstanding is dropped too.
    pub async fn logout(&self) {
        self.reset();

        match self.backend.logout().await {
            Ok(reply) if reply.status.is_success() => debug!("backend session ended"),
            Ok(reply) => warn!(status = %reply.status, "backend rejected logout"),
            Err(e) => warn!(error = %e, "logout request failed"),
        }

        self.reset();
        info!("logged out");
    }

    fn reset(&self) {
        let mut records = self.records();
        records.epoch += 1;
        records.auth = AuthState::logged_out();
        records.sync = SyncState::Idle;
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// User-facing text for a failed sync.
pub fn failure_message(err: &SessionError) -> String {
    match err {
        SessionError::Status { status, error } => {
            let text = error
                .clone()
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            let auth_status = matches!(*status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
            if auth_status || looks_auth_related(&text) {
                with_guidance(&text)
            } else {
                text
            }
        }
        SessionError::Transport(e) if e.is_timeout() => {
            format!("The backend did not respond in time ({e})")
        }
        SessionError::Transport(e) => {
            format!("Failed to connect to the backend. Is it running? ({e})")
        }
        SessionError::Reported(text) if looks_auth_related(text) => with_guidance(text),
        SessionError::Reported(text) => text.clone(),
        SessionError::MalformedBody(_) => "Received an unexpected response from the backend".into(),
        other => other.to_string(),
    }
}

fn looks_auth_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    AUTH_HINTS.iter().any(|hint| lower.contains(hint))
}

fn with_guidance(text: &str) -> String {
    let text = text.trim_end();
    if text.ends_with(['.', '!', '?']) {
        format!("{text} {REAUTH_GUIDANCE}")
    } else {
        format!("{text}. {REAUTH_GUIDANCE}")
    }
}
