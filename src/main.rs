use clap::{Parser, Subcommand};
use property_desk::app::{console, PropertyClient};
use property_desk::client::types::DEFAULT_API_URL;
use property_desk::client::{ApiSettings, HttpPropertyApi};
use property_desk::server::{self, PropertyStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "property-desk")]
#[command(about = "Manage property listings against a REST API")]
#[command(version)]
struct Cli {
    /// Collection endpoint of the property API
    #[arg(long, env = "PROPERTY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Seconds before a status message clears
    #[arg(long, default_value_t = 3)]
    message_ttl_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive console (default)
    Console,
    /// Run the in-memory property API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Console) {
        Command::Serve { bind } => {
            info!("🏠 Property Desk - API server");
            server::bind_and_serve(&bind, Arc::new(PropertyStore::default())).await
        }
        Command::Console => {
            info!("🏠 Property Desk - {}", cli.api_url);

            let api = HttpPropertyApi::with_settings(ApiSettings {
                base_url: cli.api_url,
                timeout: Duration::from_secs(cli.timeout_secs),
                ..ApiSettings::default()
            })?;
            let mut client =
                PropertyClient::new(Arc::new(api), Duration::from_secs(cli.message_ttl_secs));

            println!("Type 'help' for commands.");
            console::run(&mut client, BufReader::new(tokio::io::stdin())).await
        }
    }
}
