use anyhow::Context;
use clap::{Parser, Subcommand};
use hpe_provider::{HpeProvider, ProviderServer};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "terraform-provider-hpe")]
#[command(about = "Terraform provider for HPE services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider, resource and data source schemas as JSON
    Schema,
    /// Validate and configure a provider configuration
    Validate {
        /// Provider configuration file (JSON)
        #[arg(short, long, env = "HPE_PROVIDER_CONFIG")]
        config: PathBuf,
    },
    /// Show version information
    Version,
}

fn server() -> anyhow::Result<ProviderServer> {
    ProviderServer::new(HpeProvider::new(env!("CARGO_PKG_VERSION")))
        .map_err(|diags| anyhow::anyhow!("invalid provider registrations:\n{}", diags))
}

fn schema() -> anyhow::Result<()> {
    let schema = server()?.schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut server = server()?;
    let diags = server.configure(&config);
    if !diags.is_empty() {
        eprintln!("{}", diags);
    }
    if diags.has_error() {
        anyhow::bail!("{} is not a valid provider configuration", path.display());
    }

    tracing::info!("{} is valid", path.display());
    println!("configuration is valid");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Schema => schema(),
        Commands::Validate { config } => validate(&config),
        Commands::Version => {
            println!("terraform-provider-hpe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
