//! Clinic Chat - terminal client for the clinic assistant
//!
//! Talks to the clinic API's chat endpoints through a session that expires
//! after a period of inactivity.

mod api;
mod config;
mod events;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use clinic_chat_core::ChatSession;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::auth::AuthToken;
use api::ClinicApiClient;
use config::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "clinic-chat")]
#[command(about = "Chat with the clinic's virtual assistant")]
#[command(version)]
struct Cli {
    /// Base URL of the clinic API
    #[arg(long)]
    api_url: Option<String>,
    /// Bearer token (a JWT carrying the user id)
    #[arg(long)]
    token: Option<String>,
    /// User id, for tokens that do not carry one
    #[arg(long)]
    user_id: Option<String>,
    /// Inactivity timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            user_id: self.user_id.clone(),
            timeout_secs: self.timeout_secs,
            config_path: self.config.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the conversation.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.overrides())?;

    let token = match &settings.user_id {
        Some(user_id) => AuthToken::with_user_id(&settings.token, user_id),
        None => AuthToken::parse(&settings.token)?,
    };
    let client = ClinicApiClient::new(&settings.api_url, token, settings.request_timeout)?;
    tracing::info!(
        "Starting clinic chat against {} as user {}",
        client.base_url(),
        client.user_id()
    );

    let session = ChatSession::new(Arc::new(client), settings.chat.clone());
    let renderer = events::spawn_renderer(session.clone());
    session.initialize();
    println!("{}", repl::HELP_TEXT);

    repl::run(&session).await?;

    renderer.abort();
    tracing::info!("Clinic chat closed");
    Ok(())
}
