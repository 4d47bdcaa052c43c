mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newsrelay")]
#[command(about = "Relay crypto news headlines to a social feed on a schedule")]
struct Cli {
    /// YAML bot configuration; overrides `NEWSRELAY_CONFIG_PATH`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log posts instead of publishing them.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Post on the configured schedule until interrupted (default).
    Run,
    /// Post immediately, ignoring the minimum spacing between posts.
    PostNow {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=10))]
        count: u32,
    },
    /// Print persisted posting statistics.
    Stats,
    /// Fetch and compose posts without publishing anything.
    Preview {
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app = newsrelay_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(app.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config_path = cli.config.unwrap_or_else(|| app.config_path.clone());
    let bot = newsrelay_core::load_bot_config(&config_path)?;
    tracing::info!(
        env = %app.env,
        config = %config_path.display(),
        sources = bot.enabled_sources().count(),
        "configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run(&app, &bot, cli.dry_run, shutdown_signal()).await,
        Commands::PostNow { count } => commands::post_now(&app, &bot, cli.dry_run, count).await,
        Commands::Stats => commands::stats(&app).await,
        Commands::Preview { count } => commands::preview(&app, &bot, count).await,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
