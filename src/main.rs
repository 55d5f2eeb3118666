mod bot;
mod cli;
mod config;
mod error;
mod mistral_client;
mod server;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::bot::{ConversationSession, FailedTurnPolicy};
use crate::cli::chat::ChatContext;
use crate::config::{BotConfig, CredentialChain, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::error::BotError;
use crate::server::SharedState;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Mistral API key (takes precedence over MISTRAL_API_KEY and secrets.toml)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Secret file to read MISTRAL_API_KEY from
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    /// Base URL of the Mistral API
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model identifier every request is sent to
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Drop the user's message from history when the model call fails
    #[arg(long, global = true)]
    rollback_failed_turns: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Question to ask once, without starting the interactive chat
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Serve the JSON chat API
    Serve {
        /// Interface to listen on
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
}

impl Cli {
    fn build_session(&self) -> Result<ConversationSession, BotError> {
        let chain = CredentialChain::standard(self.api_key.clone(), self.secrets.clone());
        let config = BotConfig::resolve(&chain)?
            .with_model(self.model.clone())
            .with_endpoint(&self.endpoint)?;
        let policy = if self.rollback_failed_turns {
            FailedTurnPolicy::RollBack
        } else {
            FailedTurnPolicy::Keep
        };

        let session = ConversationSession::from_config(&config)?.with_failed_turn_policy(policy);
        info!("Bot initialized with {:?}", config);
        Ok(session)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Banking Assistant");

    let session = cli.build_session();
    if let Err(e) = &session {
        warn!("Bot failed to initialize: {}", e);
    }

    match cli.command {
        Some(Commands::Serve { ref host, port }) => {
            let state = Arc::new(SharedState::from_init(session));
            print_server_banner(&state, host, port);
            server::serve(state, host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Chat { ref input }) => run_chat(input.clone(), session).await,
        // Default to an interactive chat if no subcommand is provided
        None => run_chat(None, session).await,
    }
}

async fn run_chat(
    input: Option<String>,
    session: Result<ConversationSession, BotError>,
) -> Result<ExitCode> {
    let interactive = input.is_none();
    let mut chat_context = ChatContext::new(Box::new(io::stdout()), input, interactive, session);
    chat_context.run().await
}

fn print_server_banner(state: &SharedState, host: &str, port: u16) {
    println!("{}", "=".repeat(60));
    println!("Professional AI Banking Assistant - Web API");
    println!("{}", "=".repeat(60));
    if state.is_initialized() {
        println!("\nBot Status: ✓ Ready (model: {})", state.model());
    } else {
        println!("\nBot Status: ✗ Failed to initialize");
        if let Some(reason) = state.init_error() {
            println!("Error: {}", reason);
        }
    }
    println!("\nThe API is available at:");
    println!("   http://{}:{}/api/status", host, port);
    println!("\n{}\n", "=".repeat(60));
}
