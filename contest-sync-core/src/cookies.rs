//! Session cookie persistence.
//!
//! The backend keeps the login in a cookie. Saving the jar between runs lets
//! separate CLI invocations share one backend session. The file holds a single
//! `Cookie` header line (`name=value; name2=value2`).

use std::fs;
use std::path::Path;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use tracing::debug;
use url::Url;

use crate::error::SessionResult;

/// Cookie name the backend uses when a bare value is imported.
pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Load the jar stored at `path`. A missing file yields an empty jar.
pub fn load_jar(origin: &Url, path: &Path) -> SessionResult<Arc<Jar>> {
    let jar = Arc::new(Jar::default());

    if !path.exists() {
        debug!(path = %path.display(), "no saved session");
        return Ok(jar);
    }

    let contents = fs::read_to_string(path)?;
    for entry in contents.split(';') {
        let cookie = entry.trim();
        if !cookie.is_empty() {
            jar.add_cookie_str(cookie, origin);
        }
    }

    Ok(jar)
}

/// Write the cookies `jar` would send to `origin`. An empty jar removes the file.
pub fn save_jar(jar: &Jar, origin: &Url, path: &Path) -> SessionResult<()> {
    let Some(header) = jar.cookies(origin) else {
        return remove(path);
    };
    let line = header.to_str().unwrap_or_default();
    if line.trim().is_empty() {
        return remove(path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, line.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    debug!(path = %path.display(), "saved session");
    Ok(())
}

/// Add a cookie pasted by the user. A bare value is stored under
/// [`DEFAULT_COOKIE_NAME`].
pub fn import_cookie(jar: &Jar, origin: &Url, raw: &str) -> bool {
    let raw = raw.trim().trim_start_matches("Cookie:").trim();
    if raw.is_empty() {
        return false;
    }

    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        if entry.contains('=') {
            jar.add_cookie_str(entry, origin);
        } else {
            jar.add_cookie_str(&format!("{DEFAULT_COOKIE_NAME}={entry}"), origin);
        }
    }
    true
}

/// Delete the saved session, if there is one.
pub fn remove(path: &Path) -> SessionResult<()> {
    if path.exists() {
        fs::remove_file(path)?;
        debug!(path = %path.display(), "removed saved session");
    }
    Ok(())
}
