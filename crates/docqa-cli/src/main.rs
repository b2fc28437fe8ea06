use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docqa_application::SessionGate;
use docqa_client::ApiClient;
use docqa_infrastructure::FileTokenStore;

mod commands;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "docqa CLI - chat with your documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account (the server emails a verification code)
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and persist the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the persisted session token
    Logout,
    /// Interactive question/answer session
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let client = Arc::new(ApiClient::from_env());
    let token_store = Arc::new(FileTokenStore::new().await?);
    let gate = SessionGate::new(client.clone(), client, token_store);

    match cli.command {
        Commands::Register { email, password } => commands::auth::register(&gate, &email, &password).await?,
        Commands::Login { email, password } => commands::auth::login(&gate, &email, &password).await?,
        Commands::Logout => commands::auth::logout(&gate).await?,
        Commands::Chat => commands::chat::run(&gate).await?,
    }

    Ok(())
}
