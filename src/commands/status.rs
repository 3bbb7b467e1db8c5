use anyhow::Result;
use contest_sync_core::ClientConfig;

use crate::render::ViewRender;
use crate::session::Session;
use crate::utils::tui;

pub async fn run(config: &ClientConfig) -> Result<()> {
    let session = Session::open(config)?;

    let spinner = tui::create_spinner("Checking session".into());
    session.controller().check_auth().await;
    spinner.finish_and_clear();

    // The backend may have refreshed the cookie.
    session.save()?;

    println!("{}", session.controller().view().render(false));

    Ok(())
}
