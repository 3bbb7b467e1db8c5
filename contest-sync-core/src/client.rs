//! HTTP client for communicating with the contest-sync backend

use std::sync::Arc;

use reqwest::RequestBuilder;
use reqwest::cookie::{CookieStore, Jar};
use tracing::debug;
use url::Url;

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::SessionResult;
use crate::protocol::Reply;

const USER_AGENT: &str = concat!("contest-sync/", env!("CARGO_PKG_VERSION"));

/// [`Backend`] over reqwest. Every request carries the cookies in `jar`, and
/// any `Set-Cookie` the backend answers with lands back in it.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl HttpBackend {
    /// Client with an empty cookie jar.
    pub fn new(config: &ClientConfig) -> SessionResult<Self> {
        Self::with_jar(config, Arc::new(Jar::default()))
    }

    pub fn with_jar(config: &ClientConfig, jar: Arc<Jar>) -> SessionResult<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(USER_AGENT);

        if let Some(timeout) = config.request_timeout()? {
            builder = builder.timeout(timeout);
        }

        Ok(HttpBackend {
            http: builder.build()?,
            base_url: config.base_url()?,
            jar,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// The `Cookie` header value the next request would send, if any.
    pub fn session_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().ok().map(str::to_string))
    }

    fn endpoint(&self, path: &str) -> SessionResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, request: RequestBuilder) -> SessionResult<Reply> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        debug!(%status, bytes = body.len(), "backend replied");

        Ok(Reply { status, body })
    }
}

impl Backend for HttpBackend {
    async fn check_auth(&self) -> SessionResult<Reply> {
        let url = self.endpoint("check-auth")?;
        debug!(%url, "probing session");
        self.send(self.http.get(url)).await
    }

    async fn sync(&self) -> SessionResult<Reply> {
        let url = self.base_url.clone();
        debug!(%url, "requesting sync");
        self.send(self.http.post(url)).await
    }

    async fn logout(&self) -> SessionResult<Reply> {
        let url = self.endpoint("logout")?;
        debug!(%url, "ending session");
        self.send(self.http.post(url)).await
    }

    fn login_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}login", url.path());
        url.set_path(&path);
        url
    }
}
