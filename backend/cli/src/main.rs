mod api;
mod ask_cmd;
mod config;
mod markdown;
mod page;
mod personas_cmd;
mod status_cmd;
mod terminal_output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use expertdesk_core::Persona;
use expertdesk_dispatch::providers::OpenAiProvider;
use expertdesk_dispatch::Dispatcher;

use api::AppState;
use config::Config;

#[derive(Parser)]
#[command(name = "expertdesk")]
#[command(about = "Expert Desk — ask an AI expert persona")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Ask a single question and print the answer
    Ask {
        /// Persona key (medical, engineer, consultant, educator, counselor)
        #[arg(short, long, default_value_t = Persona::default())]
        persona: Persona,
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// List the available personas
    Personas,
    /// Show whether a server is running
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::from_env();

    expertdesk_logging::init_logger(&config.log_level, config.log_dir.as_deref());

    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
            true
        }
        Commands::Ask { persona, question } => {
            let dispatcher = build_dispatcher(&config);
            ask_cmd::run(dispatcher.as_ref(), persona, &question.join(" ")).await
        }
        Commands::Personas => {
            personas_cmd::run();
            true
        }
        Commands::Status => status_cmd::run(config.port).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Resolve the credential once; `None` disables dispatching everywhere.
fn build_dispatcher(config: &Config) -> Option<Dispatcher> {
    let credential = expertdesk_config::load_credential()?;
    let provider = OpenAiProvider::new(credential).with_base_url(&config.openai_base_url);
    Some(Dispatcher::new(Arc::new(provider)))
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        "Starting Expert Desk"
    );

    let dispatcher = build_dispatcher(&config);
    match &dispatcher {
        Some(d) => info!(provider = %d.provider_name(), base_url = %config.openai_base_url, "Completion provider ready"),
        None => warn!("No API key configured; serving setup instructions only"),
    }

    let app_state = Arc::new(AppState { dispatcher });

    let app = api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());
    let addr = format!("{}:{}", config.bind_address, config.port);

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
