//! Terminal rendering of verdicts and listings.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::commands::Verdict;
use crate::config::OutputFormat;

/// Prints a success line on stdout.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error line on stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning line on stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints rows as a rounded table or as a pretty JSON array.
pub fn print_rows<T: Tabled + serde::Serialize>(rows: &[T], format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table if rows.is_empty() => println!("{}", "(none)".dimmed()),
        OutputFormat::Table => println!("{}", Table::new(rows).with(Style::rounded())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}

/// Prints the verdict of one check.
///
/// In table mode an accepted response gets a single line; a rejected one
/// gets the diagnostic plus the anomaly, if the IdP reported one. Responses
/// that could not be evaluated print nothing here, their error is reported
/// by the caller.
pub fn print_verdict(verdict: &Verdict, format: OutputFormat) -> crate::CliResult<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
        return Ok(());
    }

    match verdict.verdict.as_str() {
        Verdict::ACCEPTED => success(&format!(
            "SAML response {} is SPID compliant",
            verdict.response_id
        )),
        Verdict::REJECTED => {
            error(&format!("[{}] {}", verdict.rule, verdict.detail));
            if !verdict.anomaly.is_empty() {
                warning(&format!("user anomaly {}", verdict.anomaly));
            }
        }
        _ => {}
    }
    Ok(())
}
