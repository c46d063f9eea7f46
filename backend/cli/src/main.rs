mod config;

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mentor_client::{consume, CancelToken, StreamHandler, TurnRequest};
use mentor_core::{AttachedFile, MentorError, Persona, Role, TurnMessage};
use mentor_gateway::{start_server, GatewayState};

use config::Config;

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "CodeMentor — simulated AI code-review chat service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the CodeMentor gateway server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Send one message and stream the reply to stdout
    Chat {
        /// Agent persona: debugger, optimizer, or evaluator
        #[arg(short, long)]
        mode: String,
        /// The message (usually a code snippet) to send
        message: String,
        /// Files to attach; the server only echoes their names back
        #[arg(short, long)]
        file: Vec<PathBuf>,
    },
    /// Show gateway health
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let addr = format!("{}:{}", config.bind_address, port).parse()?;
            info!(port, "Starting CodeMentor gateway");
            start_server(addr, GatewayState::default()).await?;
        }
        Commands::Chat {
            mode,
            message,
            file,
        } => {
            let persona: Persona = mode.parse()?;
            run_chat(&config, persona, message, file).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("{}/health", config.server_url))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("CodeMentor gateway is not running at {}", config.server_url);
                }
            }
        }
    }

    Ok(())
}

/// Prints chunks as they arrive, the terminal version of the typing effect.
#[derive(Default)]
struct PrintHandler {
    failed: Option<MentorError>,
}

impl StreamHandler for PrintHandler {
    fn on_chunk(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn on_complete(&mut self) {
        println!();
    }

    fn on_error(&mut self, error: MentorError) {
        self.failed = Some(error);
    }
}

async fn run_chat(
    config: &Config,
    persona: Persona,
    message: String,
    file_paths: Vec<PathBuf>,
) -> Result<()> {
    let mut files = Vec::new();
    for path in file_paths {
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read attachment: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        files.push(AttachedFile::new(name, data));
    }

    let turn = TurnRequest {
        persona,
        messages: vec![TurnMessage {
            role: Role::User,
            content: message,
        }],
        files,
    };

    let client = reqwest::Client::new();
    let mut handler = PrintHandler::default();
    consume(
        &client,
        &config.server_url,
        &turn,
        CancelToken::never(),
        &mut handler,
    )
    .await;

    if let Some(error) = handler.failed {
        bail!("chat turn failed: {error}");
    }
    Ok(())
}
