//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SessionError, SessionResult};

static DEFAULT_BASE_URL: &str = "http://localhost:5000";
static ENV_PREFIX: &str = "CONTEST_SYNC";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn is_default_base_url(s: &String) -> bool {
    s == DEFAULT_BASE_URL
}

/// Configuration at ~/.config/contest-sync/config.toml
///
/// Every key can be overridden with a `CONTEST_SYNC_`-prefixed environment
/// variable, e.g. `CONTEST_SYNC_BASE_URL`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    /// Where the contest-sync backend lives.
    #[serde(default = "default_base_url", skip_serializing_if = "is_default_base_url")]
    pub base_url: String,

    /// Per-request timeout in humantime form ("30s", "2m"). Unset means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,

    /// Where the backend session cookie is kept between invocations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: default_base_url(),
            request_timeout: None,
            session_file: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        }
    }

    pub fn config_dir() -> SessionResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| SessionError::Config("Could not determine config directory".into()))?
            .join("contest-sync"))
    }

    pub fn config_path() -> SessionResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default config path, writing a commented template on first run.
    pub fn load() -> SessionResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) layered with environment overrides.
    pub fn load_from(path: &Path) -> SessionResult<Self> {
        let config: ClientConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| SessionError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SessionError::Config(e.to_string()))?;

        // Surface bad values at load time rather than on first request.
        config.base_url()?;
        config.request_timeout()?;

        Ok(config)
    }

    /// The backend base URL, always with a trailing slash so endpoint joins
    /// keep any path prefix.
    pub fn base_url(&self) -> SessionResult<Url> {
        let mut url = Url::parse(self.base_url.trim())?;
        if url.cannot_be_a_base() {
            return Err(SessionError::Config(format!(
                "base_url '{}' cannot be used as a base URL",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> SessionResult<Option<Duration>> {
        self.request_timeout
            .as_deref()
            .map(|s| {
                humantime::parse_duration(s.trim()).map_err(|e| {
                    SessionError::Config(format!("Invalid request_timeout '{s}': {e}"))
                })
            })
            .transpose()
    }

    pub fn session_path(&self) -> SessionResult<PathBuf> {
        match &self.session_file {
            Some(path) => {
                let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => Ok(Self::config_dir()?.join("session.cookies")),
        }
    }

    pub fn to_toml(&self) -> SessionResult<String> {
        toml::to_string_pretty(self).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SessionResult<()> {
        let contents = format!(
            "\
# contest-sync configuration

# Where the contest-sync backend is running:
# base_url = \"{}\"

# Give up on a request after this long (unset = wait forever):
# request_timeout = \"30s\"

# Where the session cookie is stored:
# session_file = \"~/.config/contest-sync/session.cookies\"
",
            DEFAULT_BASE_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SessionError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
