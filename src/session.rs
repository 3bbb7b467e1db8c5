//! A controller wired to the saved session cookie.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use contest_sync_core::{ClientConfig, HttpBackend, SessionSyncController, cookies};

pub struct Session {
    controller: SessionSyncController<HttpBackend>,
    path: PathBuf,
}

impl Session {
    /// Build a controller whose cookie jar starts from the saved session, if any.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let origin = config.base_url()?;
        let path = config.session_path()?;

        let jar = cookies::load_jar(&origin, &path)
            .with_context(|| format!("Failed to read saved session from {}", path.display()))?;
        let backend = HttpBackend::with_jar(config, jar)?;

        Ok(Session {
            controller: SessionSyncController::new(backend),
            path,
        })
    }

    pub fn controller(&self) -> &SessionSyncController<HttpBackend> {
        &self.controller
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a cookie the user copied from their browser. Returns false if it was empty.
    pub fn import_cookie(&self, raw: &str) -> bool {
        let backend = self.controller.backend();
        cookies::import_cookie(backend.jar(), backend.base_url(), raw)
    }

    /// Persist the jar so the next invocation reuses this session.
    pub fn save(&self) -> Result<()> {
        let backend = self.controller.backend();
        cookies::save_jar(backend.jar(), backend.base_url(), &self.path)
            .with_context(|| format!("Failed to save session to {}", self.path.display()))
    }

    pub fn forget(&self) -> Result<()> {
        cookies::remove(&self.path)
            .with_context(|| format!("Failed to remove session at {}", self.path.display()))
    }
}
