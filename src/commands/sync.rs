use anyhow::Result;
use contest_sync_core::{ClientConfig, SyncState};

use crate::render::ViewRender;
use crate::session::Session;
use crate::utils::tui;

pub async fn run(config: &ClientConfig, verbose: bool) -> Result<()> {
    let session = Session::open(config)?;
    let controller = session.controller();

    let spinner = tui::create_spinner("Checking session".into());
    let auth = controller.check_auth().await;
    spinner.finish_and_clear();

    if !auth.is_logged_in() {
        println!("{}", controller.view().render(verbose));
        anyhow::bail!("Not logged in");
    }

    let spinner = tui::create_spinner("Syncing contests, fetching from all platforms".into());
    let result = controller.sync().await;
    spinner.finish_and_clear();

    session.save()?;

    let state = result?;
    println!("{}", controller.view().render(verbose));

    if let SyncState::Failed { .. } = state {
        anyhow::bail!("Sync failed");
    }

    Ok(())
}
