use anyhow::Result;
use contest_sync_core::ClientConfig;

use crate::session::Session;

pub async fn run(config: &ClientConfig) -> Result<()> {
    let session = Session::open(config)?;

    session.controller().logout().await;
    session.forget()?;

    println!("Logged out.");

    Ok(())
}
