//! `inspect` command: show what the server sends back for `initialize`
//!
//! Useful for finding out which session header a server emits and which
//! framing it uses. The handshake is not completed.

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::config::Config;
use crate::error::Result;
use crate::mcp::decode::decode_response;
use crate::mcp::transport::InboundResponse;
use crate::mcp::types::METHOD_INITIALIZE;

use super::to_pretty_json;

/// Send `initialize` once and print the raw reply.
pub async fn inspect_endpoint(config: &Config) -> Result<()> {
    let mut client = config.client_builder().build()?;
    let params = serde_json::to_value(client.initialize_params())?;

    let reply = client.send_raw(METHOD_INITIALIZE, params, true).await?;

    println!("\n{} {}", "Endpoint:".bold(), client.endpoint().cyan());
    println!("{} {}", "Status:".bold(), status_label(&reply));
    println!(
        "{} {}",
        "Content-Type:".bold(),
        if reply.content_type().is_empty() {
            "<none>"
        } else {
            reply.content_type()
        }
    );
    match client.session_id() {
        Some(id) => println!("{} {}", "Session id:".bold(), id.green()),
        None => println!("{} {}", "Session id:".bold(), "<none>".yellow()),
    }

    println!("\nResponse headers:");
    headers_table(&reply, &config.session.inbound_headers).printstd();

    println!("\nDecoded reply:");
    match decode_response(&reply) {
        Ok(response) => println!("{}", to_pretty_json(&response)?),
        Err(e) => {
            println!("{}", e.to_string().red());
            println!("\nRaw body:\n{}", reply.body);
        }
    }
    println!();
    Ok(())
}

fn status_label(reply: &InboundResponse) -> String {
    if reply.is_success() {
        reply.status.to_string().green().to_string()
    } else {
        reply.status.to_string().red().to_string()
    }
}

/// Headers table with session-id candidates flagged.
pub(crate) fn headers_table(reply: &InboundResponse, session_headers: &[String]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Header".bold(), "Value".bold(), "Session".bold()]);

    let mut headers: Vec<&(String, String)> = reply.headers.iter().collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in headers {
        let marker = if session_headers.iter().any(|c| c.eq_ignore_ascii_case(name)) {
            "yes".green().to_string()
        } else {
            String::new()
        };
        table.add_row(row![name, value, marker]);
    }
    table
}
