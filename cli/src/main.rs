use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use client::error::ApiError;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    // Keep the terminal output clean; raise with RUST_LOG when debugging.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = cli::Cli::parse();

    if let Err(err) = commands::run(cli).await {
        eprintln!("{}", err);
        if err.requires_login() {
            eprintln!("Run `shortvid login <username>` to start a session.");
        }
        let code = match err {
            ApiError::Validation(_) => 2,
            _ => 3,
        };
        std::process::exit(code);
    }
}
