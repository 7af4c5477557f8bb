//! Command-line shell around the client.

use crate::config::Config;
use crate::conversation::Conversation;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

/// Chat with the ChatGPT web app using browser session cookies
#[derive(Parser, Debug)]
#[command(name = "chatgpt-web", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/chatgpt-web/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Model to request
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Write debug logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message and print the reply
    Ask(AskArgs),
    /// Interactive conversation on stdin
    Chat(ChatArgs),
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The message to send (use "-" to read from stdin)
    #[arg(required = true)]
    pub prompt: String,

    #[command(flatten)]
    pub thread: ThreadArgs,

    /// Output format
    #[arg(short = 'o', long, default_value = "text", value_enum)]
    pub output_format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub thread: ThreadArgs,
}

/// Continue an existing conversation.
#[derive(Parser, Debug, Default)]
pub struct ThreadArgs {
    /// Conversation to continue
    #[arg(long)]
    pub conversation_id: Option<String>,

    /// Message to reply to
    #[arg(long)]
    pub parent_message_id: Option<String>,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON output of `ask`.
#[derive(Serialize)]
struct AskOutput<'a> {
    reply: &'a str,
    conversation_id: Option<&'a str>,
    parent_message_id: Option<&'a str>,
}

impl Cli {
    /// Resolve the effective config: file first, then command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };

        if let Some(timeout) = self.timeout {
            anyhow::ensure!(timeout > 0, "--timeout must be positive");
            config.timeout_secs = timeout;
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        Ok(config)
    }
}

/// Install the tracing subscriber.
///
/// With a log file everything from this crate at debug level goes there;
/// otherwise `RUST_LOG` controls stderr output.
pub fn init_logging(log_file: Option<&Path>) {
    if let Some(path) = log_file {
        use tracing_subscriber::prelude::*;
        match std::fs::File::create(path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false);
                let filter = tracing_subscriber::EnvFilter::new("chatgpt_web=debug");
                let _ = tracing_subscriber::registry()
                    .with(file_layer.with_filter(filter))
                    .try_init();
            }
            Err(err) => {
                eprintln!("Failed to create log file: {err}");
            }
        }
    } else if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> ExitCode {
    init_logging(cli.log_file.as_deref());

    let result = match &cli.command {
        Commands::Ask(args) => ask(&cli, args).await,
        Commands::Chat(args) => chat(&cli, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn open_conversation(cli: &Cli, thread: &ThreadArgs) -> Result<Conversation> {
    let config = cli.resolve_config()?;
    let client = config.connect().context("Failed to create client")?;
    Ok(client.conversation(
        thread.conversation_id.clone(),
        thread.parent_message_id.clone(),
    ))
}

async fn ask(cli: &Cli, args: &AskArgs) -> Result<()> {
    let prompt = read_prompt(&args.prompt)?;
    anyhow::ensure!(!prompt.is_empty(), "Empty prompt");

    let mut conversation = open_conversation(cli, &args.thread)?;
    let reply = conversation.send_message(&prompt).await?;

    match args.output_format {
        OutputFormat::Text => println!("{reply}"),
        OutputFormat::Json => {
            let output = AskOutput {
                reply: &reply,
                conversation_id: conversation.conversation_id(),
                parent_message_id: conversation.parent_message_id(),
            };
            println!("{}", serde_json::to_string(&output)?);
        }
    }
    Ok(())
}

async fn chat(cli: &Cli, args: &ChatArgs) -> Result<()> {
    let mut conversation = open_conversation(cli, &args.thread)?;
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/exit" {
            break;
        }

        let (tx, rx) = mpsc::channel(32);
        let printer = tokio::spawn(print_partials(rx));
        let result = conversation.stream_message(line, &tx).await;
        drop(tx);
        let printed = printer.await.unwrap_or_default();

        match result {
            Ok(reply) => {
                if let Some(rest) = reply.strip_prefix(printed.as_str()) {
                    print!("{rest}");
                } else {
                    print!("\n{reply}");
                }
                println!();
            }
            Err(e) => {
                println!();
                eprintln!("Error: {e}");
            }
        }
    }

    if let Some(conversation_id) = conversation.conversation_id() {
        eprintln!(
            "Resume with --conversation-id {conversation_id} --parent-message-id {}",
            conversation.parent_message_id().unwrap_or_default()
        );
    }
    Ok(())
}

/// Print the growing reply as it streams. Returns what was printed.
async fn print_partials(mut rx: mpsc::Receiver<String>) -> String {
    let mut printed = String::new();
    while let Some(partial) = rx.recv().await {
        if let Some(delta) = partial.strip_prefix(printed.as_str()) {
            print!("{delta}");
            let _ = io::stdout().flush();
            printed = partial;
        }
    }
    printed
}

fn read_prompt(prompt: &str) -> Result<String> {
    if prompt == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer.trim().to_string())
    } else {
        Ok(prompt.to_string())
    }
}
