mod commands;
mod render;
mod session;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use contest_sync_core::ClientConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contest-sync")]
#[command(about = "Log in to your contest-sync backend and sync upcoming coding contests into your calendar")]
struct Cli {
    /// Log more (-v for info, -vv for debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use this backend instead of the configured base_url
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether you are logged in
    Status,
    /// Log in through the backend's Google login page
    Login {
        /// Session cookie to use instead of prompting for one
        #[arg(long)]
        cookie: Option<String>,

        /// Print the login URL without opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Add newly announced contests to your calendar
    Sync {
        /// List every new contest instead of per-platform counts
        #[arg(short, long)]
        all: bool,
    },
    /// End the session and forget the saved cookie
    Logout,
    /// Show configuration paths and values
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = ClientConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.base_url()?;
    }
    tracing::debug!(base_url = %config.base_url, "loaded configuration");

    match cli.command {
        Commands::Status => commands::status::run(&config).await,
        Commands::Login { cookie, no_browser } => {
            commands::login::run(&config, cookie, no_browser).await
        }
        Commands::Sync { all } => commands::sync::run(&config, all).await,
        Commands::Logout => commands::logout::run(&config).await,
        Commands::Config => commands::config::run(&config),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_with_flags() {
        let cli = Cli::try_parse_from([
            "contest-sync",
            "-vv",
            "sync",
            "--all",
            "--base-url",
            "https://sync.example.com",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("https://sync.example.com"));
        assert!(matches!(cli.command, Commands::Sync { all: true }));
    }

    #[test]
    fn test_parse_login_cookie() {
        let cli = Cli::try_parse_from(["contest-sync", "login", "--cookie", "abc", "--no-browser"])
            .unwrap();
        match cli.command {
            Commands::Login { cookie, no_browser } => {
                assert_eq!(cookie.as_deref(), Some("abc"));
                assert!(no_browser);
            }
            _ => panic!("expected login"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["contest-sync"]).is_err());
    }
}
