// src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_client::config::{self, ClientConfig};
use chat_client::input::forward_lines;
use chat_client::{TerminalView, View, run_session};

#[derive(Parser)]
#[command(name = "chat-client")]
#[command(author, version, about = "Terminal client for the JSON websocket chat protocol")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat server host and port (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Send a logout when `login` is typed while logged in, like the legacy client
    #[arg(long)]
    login_fallthrough: bool,

    /// Disable bold user names
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    // Logs go to stderr so they never interleave with the chat on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = load_client_config(cli.config.as_ref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if cli.login_fallthrough {
        config.login_fallthrough = true;
    }
    if cli.no_color {
        config.color = false;
    }

    let mut view = TerminalView::stdout(config.color);
    view.render_help_text();

    let (query_tx, query_rx) = mpsc::channel::<String>(32);

    // Stdin is read on a plain thread so a blocked read never holds up shutdown.
    std::thread::spawn(move || forward_lines(std::io::stdin().lock(), &query_tx));

    let session = run_session(&config, view, query_rx)
        .await
        .with_context(|| format!("Chat session with {} failed", config.endpoint()))?;

    tracing::info!(
        "Session ended (user: {:?}, logged in: {})",
        session.user_name(),
        session.is_logged_in()
    );
    Ok(())
}

/// Loads the config file named on the command line, else the default one if
/// it exists, else the built-in defaults.
fn load_client_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    if let Some(path) = path {
        return config::load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(config::load_config(&default_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
            ClientConfig::default()
        }))
    } else {
        tracing::info!("Using default configuration");
        Ok(ClientConfig::default())
    }
}
