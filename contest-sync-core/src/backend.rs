//! The seam between the controller and the contest-sync backend.

use std::future::Future;

use url::Url;

use crate::error::SessionResult;
use crate::protocol::Reply;

/// The three credentialed calls the backend exposes, plus where its login
/// redirect lives.
///
/// Implementations return `Err` only when no HTTP exchange completed
/// (connection refused, DNS, timeout). Any status code, including non-2xx,
/// comes back as a [`Reply`] for the controller to interpret.
pub trait Backend: Send + Sync {
    /// GET /check-auth
    fn check_auth(&self) -> impl Future<Output = SessionResult<Reply>> + Send;

    /// POST /
    fn sync(&self) -> impl Future<Output = SessionResult<Reply>> + Send;

    /// POST /logout
    fn logout(&self) -> impl Future<Output = SessionResult<Reply>> + Send;

    /// GET /login, opened as a full-page browser navigation rather than fetched.
    fn login_url(&self) -> Url;
}
