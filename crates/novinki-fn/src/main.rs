use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use novinki_core::config::{AppConfig, ProviderKind};
use novinki_core::http::HttpEvent;
use novinki_fn::{cards, lambda, server, Handler, KeySource};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// New film, series and cartoon releases as a serverless function.
#[derive(Debug, Parser)]
#[command(name = "novinki", version)]
struct Cli {
    /// Config file (defaults to $NOVINKI_CONFIG, then the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured provider: openai, tmdb or openrouter.
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run under the serverless runtime.
    Lambda,
    /// Serve the function over local HTTP.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Answer a single event read from a file or stdin.
    Invoke {
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Fetch releases and print them as cards.
    List,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok())?;
            config
        }
        None => AppConfig::load()?,
    };
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    tracing::debug!(provider = %config.provider, "config loaded");

    let handler = Arc::new(Handler::new(config, KeySource::Env)?);

    match cli.command {
        Command::Lambda => lambda::run(handler).await?,
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| handler.config().server.host.clone());
            let port = port.unwrap_or(handler.config().server.port);
            server::serve(handler, &host, port).await?;
        }
        Command::Invoke { event } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let event: HttpEvent = if raw.trim().is_empty() {
                HttpEvent::default()
            } else {
                serde_json::from_str(&raw)?
            };
            let resp = handler.respond(&event).await;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::List => {
            let today = chrono::Local::now().date_naive();
            let items = handler.fetch(today).await?;
            print!("{}", cards::render_list(&items, today.year()));
        }
    }

    Ok(())
}

/// Logs go to stderr so `invoke` can print the response on stdout.
fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("novinki=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
