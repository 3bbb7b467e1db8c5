use anyhow::Result;
use contest_sync_core::ClientConfig;
use owo_colors::OwoColorize;

pub fn run(config: &ClientConfig) -> Result<()> {
    let config_path = ClientConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!("  Session:  {}", config.session_path()?.display());

    println!("\n{}", "Backend".bold());
    println!("  Base URL: {}", config.base_url()?);
    match config.request_timeout()? {
        Some(timeout) => println!("  Timeout:  {:?}", timeout),
        None => println!("  Timeout:  {}", "none".dimmed()),
    }

    let overrides = config.to_toml()?;
    if !overrides.trim().is_empty() {
        println!("\n{}", "Effective overrides".bold());
        for line in overrides.lines() {
            println!("  {line}");
        }
    }

    Ok(())
}
