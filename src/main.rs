//! Product API - Application entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use product_api::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    AppResult,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command).await {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> AppResult<()> {
    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
    }
}

/// `--verbose` forces debug; otherwise `RUST_LOG`, falling back to info.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
