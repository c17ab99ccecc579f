// src/main.rs — folio entry point

use clap::Parser;

use folio::cli::{self, Cli, Commands};
use folio::infra::config::Config;
use folio::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no folio.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Respects RUST_LOG when set
    logger::init_logging(&config.server.log_level);

    match cli.command {
        None | Some(Commands::Serve) => cli::serve::run_serve(&config).await,
        Some(Commands::Ask { question }) => cli::ask::run_ask(&config, &question).await,
        Some(Commands::Tools) => {
            cli::tools::run_tools();
            Ok(())
        }
        Some(Commands::Inbox { unread, mark_read }) => {
            cli::inbox::run_inbox(&config.store, unread, mark_read)
        }
        Some(Commands::Migrate { status, rollback }) => {
            cli::migrate::run_migrate(&config.store, status, rollback)
        }
    }
}
