//! `sequence` command: the full session walk-through
//!
//! Runs `initialize` -> `initialized` -> `tools/list` -> `tools/call` over
//! one client and reports each step. Stops at the first failing step.

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;

use super::parse_tool_args;
use super::tools::print_tool_result;

const STEPS: usize = 3;

fn step(n: usize, label: &str) {
    println!("{} {}", format!("[{}/{}]", n, STEPS).bold(), label);
}

/// Run the sequence, calling `tool` with `args` at the end.
///
/// # Errors
///
/// Returns the first step's error; later steps are not attempted.
pub async fn run_sequence(config: &Config, tool: &str, args: &str) -> Result<()> {
    let arguments = parse_tool_args(args)?;
    let mut client = config.client_builder().build()?;

    println!("\nMCP endpoint: {}\n", client.endpoint().cyan());

    step(1, "initialize + initialized");
    if let Err(e) = client.initialize_connection().await {
        println!("      {}", format!("failed: {}", e).red());
        return Err(e.into());
    }
    match client.session_id() {
        Some(id) => println!("      session id: {}", id.green()),
        None => println!("      {}", "server did not issue a session id".yellow()),
    }
    if let Some(server) = client.server_info().and_then(|info| info.server_info) {
        println!("      server: {} {}", server.name, server.version);
    }

    step(2, "tools/list");
    let listing = match client.list_tools().await {
        Ok(listing) => listing,
        Err(e) => {
            println!("      {}", format!("failed: {}", e).red());
            return Err(e.into());
        }
    };
    println!("      {} tools available", listing.tools.len());
    if !listing.tools.iter().any(|t| t.name == tool) {
        tracing::warn!(tool, "Tool not advertised by tools/list; calling anyway");
        println!("      {}", format!("{} is not in the tool list", tool).yellow());
    }

    step(3, &format!("tools/call {}", tool));
    match client.call_tool(tool, arguments).await {
        Ok(result) => {
            println!("      {}", "ok".green());
            print_tool_result(&result)?;
        }
        Err(e) => {
            println!("      {}", format!("failed: {}", e).red());
            return Err(e.into());
        }
    }

    println!("\n{}", "Sequence completed".green().bold());
    Ok(())
}
