//! mcprobe - MCP session client and diagnostics
//!
#![doc = "mcprobe - MCP session client and diagnostics"]
#![doc = "Main entry point for the mcprobe command-line tool."]

use anyhow::Result;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mcprobe::cli::{Cli, Commands};
use mcprobe::commands;
use mcprobe::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Sequence { tool, args } => {
            tracing::info!("Running session sequence");
            commands::sequence::run_sequence(&config, &tool, &args).await?;
        }
        Commands::Tools { json } => {
            commands::tools::list_tools(&config, json).await?;
        }
        Commands::Call { name, args } => {
            commands::tools::call_tool(&config, &name, &args).await?;
        }
        Commands::Probe { name, args } => {
            tracing::info!("Probing tools/call parameter shapes for {}", name);
            commands::probe::probe_tool(&config, &name, &args).await?;
        }
        Commands::Inspect => {
            commands::inspect::inspect_endpoint(&config).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "mcprobe=debug" } else { "mcprobe=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
