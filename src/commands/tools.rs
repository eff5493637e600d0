//! `tools` and `call` commands

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::config::Config;
use crate::error::Result;
use crate::mcp::types::{McpTool, ToolListing};

use super::{connect, content_texts, parse_tool_args, to_pretty_json, truncate};

/// List the server's tools as a table, or as JSON when `json` is set.
///
/// # Examples
///
/// ```no_run
/// use mcprobe::config::Config;
/// use mcprobe::commands::tools::list_tools;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// list_tools(&config, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list_tools(config: &Config, json: bool) -> Result<()> {
    let mut client = connect(config).await?;
    let listing = client.list_tools().await?;
    tracing::info!(count = listing.tools.len(), "Listed tools");

    if json {
        println!("{}", to_pretty_json(&listing)?);
        return Ok(());
    }

    if listing.tools.is_empty() {
        println!("{}", "Server exposes no tools.".yellow());
        return Ok(());
    }

    println!("\nTools at {}:\n", client.endpoint().cyan());
    tools_table(&listing).printstd();
    if let Some(cursor) = &listing.next_cursor {
        println!("More tools available (cursor {})", cursor.cyan());
    }
    println!();
    Ok(())
}

/// Call one tool and print its result.
///
/// # Errors
///
/// Returns an error for malformed `args`, a failed handshake, or a rejected
/// call. The caller turns that into a non-zero exit status.
pub async fn call_tool(config: &Config, name: &str, args: &str) -> Result<()> {
    let arguments = parse_tool_args(args)?;
    let mut client = connect(config).await?;

    tracing::info!(tool = name, "Calling tool");
    let result = client.call_tool(name, arguments).await?;

    println!("{}", format!("{} succeeded", name).green());
    println!("{}", to_pretty_json(&result)?);
    Ok(())
}

/// Build the tool table printed by `tools`.
pub(crate) fn tools_table(listing: &ToolListing) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Name".bold(), "Description".bold(), "Parameters".bold()]);

    for tool in &listing.tools {
        table.add_row(row![
            tool.name.cyan(),
            truncate(tool.description.as_deref().unwrap_or("-"), 60),
            parameter_names(tool)
        ]);
    }
    table
}

/// Comma-separated property names from a tool's input schema.
fn parameter_names(tool: &McpTool) -> String {
    let names: Vec<&str> = tool
        .input_schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|props| props.keys().map(String::as_str).collect())
        .unwrap_or_default();

    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Print the text blocks of a tool result, falling back to pretty JSON.
pub(crate) fn print_tool_result(result: &serde_json::Value) -> Result<()> {
    let texts = content_texts(result);
    if texts.is_empty() {
        println!("{}", to_pretty_json(result)?);
    } else {
        for text in texts {
            println!("{}", text);
        }
    }
    Ok(())
}
