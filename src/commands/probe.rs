//! `probe` command: report which `tools/call` parameter shapes a server accepts

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::config::Config;
use crate::error::Result;
use crate::mcp::probe::{run_probe, ProbeOutcome, ProbeReport};

use super::{connect, parse_tool_args, truncate};

/// Probe `tool` with every argument shape and print a summary table.
pub async fn probe_tool(config: &Config, tool: &str, args: &str) -> Result<()> {
    let arguments = parse_tool_args(args)?;
    let mut client = connect(config).await?;

    let reports = run_probe(&mut client, tool, &arguments).await?;

    println!("\nParameter shapes for {}:\n", tool.cyan());
    reports_table(&reports).printstd();

    let accepted = reports.iter().filter(|r| r.outcome.is_accepted()).count();
    let summary = format!("{}/{} shapes accepted", accepted, reports.len());
    if accepted == 0 {
        println!("\n{}\n", summary.red());
    } else {
        println!("\n{}\n", summary.green());
    }
    Ok(())
}

fn outcome_cells(outcome: &ProbeOutcome) -> (String, String) {
    match outcome {
        ProbeOutcome::Accepted(result) => (
            "accepted".green().to_string(),
            truncate(&result.to_string(), 60),
        ),
        ProbeOutcome::Rejected(e) => (
            "rejected".yellow().to_string(),
            format!("{}: {}", e.code, truncate(&e.message, 50)),
        ),
        ProbeOutcome::Failed(reason) => ("failed".red().to_string(), truncate(reason, 60)),
    }
}

pub(crate) fn reports_table(reports: &[ProbeReport]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Shape".bold(), "Outcome".bold(), "Detail".bold()]);
    for report in reports {
        let (status, detail) = outcome_cells(&report.outcome);
        table.add_row(row![report.shape.describe(), status, detail]);
    }
    table
}
