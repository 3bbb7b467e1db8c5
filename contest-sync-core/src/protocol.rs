//! Backend wire protocol.
//!
//! JSON bodies exchanged with the contest-sync backend, and the decoding
//! rules that turn a raw [`Reply`] into typed data or a [`SessionError`].

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// A completed HTTP exchange: status plus the raw body text.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Reply {
            status,
            body: body.into(),
        }
    }

    /// Decode a 2xx body as `T`; anything else becomes an error.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> SessionResult<T> {
        if !self.status.is_success() {
            return Err(SessionError::Status {
                status: self.status,
                error: self.error_text(),
            });
        }

        serde_json::from_str(&self.body).map_err(|e| match self.error_text() {
            Some(text) => SessionError::Reported(text),
            None => SessionError::MalformedBody(e.to_string()),
        })
    }

    /// The `error` field of a body, when the body is JSON and has one.
    ///
    /// Also looks inside a `[{"error": ...}, status]` pair, which is how the
    /// backend serializes some failures under a 200.
    fn error_text(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        let body = match &value {
            serde_json::Value::Array(items) => items.first()?,
            other => other,
        };

        let ErrorResponse { error } = serde_json::from_value(body.clone()).ok()?;
        error
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
    }
}

/// Failure body: `{ "error": "..." }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// GET /check-auth
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_logged_in: Option<bool>,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl CheckAuthResponse {
    /// The signed-in user, rejecting bodies that claim a session without an email.
    pub fn into_user(self) -> SessionResult<SessionUser> {
        if self.is_logged_in == Some(false) {
            return Err(SessionError::MalformedBody(
                "check-auth succeeded but reported is_logged_in = false".into(),
            ));
        }
        if self.user.email.trim().is_empty() {
            return Err(SessionError::MalformedBody("check-auth returned an empty email".into()));
        }
        Ok(self.user)
    }
}

// ============================================================================
// POST /
// ============================================================================

/// A contest the backend added to the user's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    pub platform: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
}

impl Contest {
    pub fn new(platform: impl Into<String>, title: impl Into<String>) -> Self {
        Contest {
            platform: platform.into(),
            title: title.into(),
            url: None,
            start: None,
        }
    }
}

/// Counters reported next to the sync message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_contests_added: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_contests_checked: Option<u32>,
}

impl SyncStats {
    pub fn is_empty(&self) -> bool {
        self.new_contests_added.is_none() && self.total_contests_checked.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    #[serde(default)]
    pub new_contests: Option<Vec<Contest>>,
    #[serde(flatten)]
    pub stats: SyncStats,
}
