use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use unibot_application::AppBootstrap;
use unibot_core::config::ClientConfig;
use unibot_infrastructure::ConfigService;

mod commands;
mod console;
mod helper;
mod logging;

use console::{ConsoleNavigator, ConsoleNotifier};

#[derive(Parser)]
#[command(name = "unibot")]
#[command(about = "Unibot - chat with the university assistant and manage its knowledge base", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.toml and UNIBOT_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (no timeout unless set)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Log in to the admin panel
    Login {
        /// Username or email; prompted when omitted
        #[arg(long)]
        username: Option<String>,
    },
    /// Log out and forget the stored session
    Logout,
    /// Upload a JSON knowledge-base file
    Upload {
        file: PathBuf,
    },
    /// Show the upload history
    History,
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new().context("Failed to locate config.toml")?,
    };
    let mut config = service
        .load()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = Some(secs);
    }
    config
        .normalized_base_url()
        .context("Invalid --base-url")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config = load_config(&cli)?;
    let navigator = Arc::new(ConsoleNavigator::new());
    let notifier = Arc::new(ConsoleNotifier);
    let app = AppBootstrap::new(config, navigator.clone(), notifier)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(&app, navigator).await?,
        Commands::Login { username } => commands::auth::login(&app, username).await?,
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Upload { file } => commands::admin::upload(&app, file).await?,
        Commands::History => commands::admin::history(&app).await?,
    }

    Ok(())
}
