use anyhow::{Context, Result};
use contest_sync_core::{AuthState, ClientConfig};
use owo_colors::OwoColorize;

use crate::render::ViewRender;
use crate::session::Session;

pub async fn run(config: &ClientConfig, cookie: Option<String>, no_browser: bool) -> Result<()> {
    let session = Session::open(config)?;
    let controller = session.controller();

    let auth = controller.check_auth().await;
    if auth.is_logged_in() {
        println!("{}", controller.view().render(false));
        return Ok(());
    }
    ensure_reachable(&auth)?;

    let cookie = match cookie {
        Some(cookie) => cookie,
        None => {
            let login_url = controller.login_url();

            println!("Open this URL in your browser to log in with Google:\n");
            println!("{}\n", login_url);

            if no_browser || open::that(login_url.as_str()).is_err() {
                println!("(Open the URL above manually)");
            }

            println!(
                "After logging in, copy the value of the {} cookie for {}.",
                "session".bold(),
                login_url.host_str().unwrap_or("the backend")
            );
            prompt_cookie()?
        }
    };

    if !session.import_cookie(&cookie) {
        anyhow::bail!("No session cookie given");
    }

    let auth = controller.check_auth().await;
    if !auth.is_logged_in() {
        anyhow::bail!("The backend did not accept that session cookie");
    }

    session.save()?;

    println!("{}", controller.view().render(false));
    println!("{}", format!("Session saved to {}", session.path().display()).dimmed());

    Ok(())
}

/// Refuse to start a login when the auth check never reached the backend.
fn ensure_reachable(auth: &AuthState) -> Result<()> {
    if let AuthState::LoggedOut {
        notice: Some(notice),
    } = auth
    {
        println!("{}", notice.yellow());
        anyhow::bail!("Backend unreachable; not starting login");
    }
    Ok(())
}

fn prompt_cookie() -> Result<String> {
    rpassword::prompt_password("Session cookie: ").context("Failed to read session cookie")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_backend_stops_login() {
        let auth = AuthState::LoggedOut {
            notice: Some("Could not reach the backend: connection refused".into()),
        };
        let err = ensure_reachable(&auth).unwrap_err();
        assert!(err.to_string().contains("Backend unreachable"));
    }

    #[test]
    fn test_plain_logged_out_continues_login() {
        assert!(ensure_reachable(&AuthState::logged_out()).is_ok());
    }
}
