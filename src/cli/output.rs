use crate::{Change, ChangeKind, ChangeStats, Conversion};
use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    stats: &'a ChangeStats,
    changes: &'a [Change],
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    files_processed: usize,
    files_changed: usize,
    totals: &'a ChangeStats,
}

/// Report the changes made to one input.
///
/// JSON reports carry the converted text only when `include_text` is set.
pub fn print_report(
    name: &str,
    conversion: &Conversion,
    colored_output: bool,
    format: OutputFormat,
    include_text: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_text_report(name, conversion, colored_output);
            Ok(())
        }
        OutputFormat::Json => {
            let report = JsonReport {
                file: name,
                stats: &conversion.stats,
                changes: &conversion.changes,
                text: include_text.then_some(conversion.text.as_str()),
            };
            let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Spelling => "spelling",
        ChangeKind::Contextual => "contextual",
        ChangeKind::Unit => "unit",
        ChangeKind::Quote => "quote",
    }
}

fn print_text_report(name: &str, conversion: &Conversion, colored_output: bool) {
    if conversion.changes.is_empty() {
        return;
    }

    if colored_output {
        println!("\n{}", name.bold().underline());
    } else {
        println!("\n{}", name);
    }

    for change in &conversion.changes {
        let label = format!("{:<10}", kind_label(change.kind));
        if colored_output {
            println!(
                "  {} {} {} {}",
                label.blue(),
                change.original.red(),
                "→".dimmed(),
                change.replacement.green().bold()
            );
        } else {
            println!("  {} {} → {}", label, change.original, change.replacement);
        }
    }
}

pub fn print_summary(
    totals: &ChangeStats,
    files_processed: usize,
    files_changed: usize,
    written: bool,
    colored: bool,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        let summary = JsonSummary {
            files_processed,
            files_changed,
            totals,
        };
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{}", json);
        return Ok(());
    }

    println!();
    let file_word = if files_processed == 1 { "file" } else { "files" };
    let total = totals.total_changes();

    if total == 0 {
        let message = "✓ Already British English!";
        if colored {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
        return Ok(());
    }

    let change_word = if total == 1 { "change" } else { "changes" };
    let verb = if written { "applied to" } else { "needed in" };
    let breakdown = format!(
        "({} spelling, {} units, {} quotes; {} words)",
        totals.spelling_changes, totals.unit_conversions, totals.quote_changes, totals.total_words
    );

    if colored {
        println!(
            "{} {} {} {} {} of {} {} {}",
            "✓".green().bold(),
            total.to_string().green().bold(),
            change_word,
            verb,
            files_changed,
            files_processed,
            file_word,
            breakdown.dimmed()
        );
    } else {
        println!(
            "✓ {} {} {} {} of {} {} {}",
            total, change_word, verb, files_changed, files_processed, file_word, breakdown
        );
    }

    Ok(())
}

/// Ask before overwriting a file
pub fn confirm_write(name: &str, changes: usize) -> Result<bool> {
    let change_word = if changes == 1 { "change" } else { "changes" };
    Confirm::new()
        .with_prompt(format!("Write {} {} to {}?", changes, change_word, name))
        .default(true)
        .interact()
        .context("Failed to read confirmation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_json_report_shape() {
        let conversion = Conversion {
            text: "colour".to_string(),
            stats: ChangeStats {
                total_words: 1,
                spelling_changes: 1,
                ..Default::default()
            },
            changes: vec![Change {
                kind: ChangeKind::Spelling,
                original: "color".to_string(),
                replacement: "colour".to_string(),
            }],
        };
        let report = JsonReport {
            file: "-",
            stats: &conversion.stats,
            changes: &conversion.changes,
            text: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["changes"][0]["kind"], "spelling");
        assert_eq!(value["stats"]["spelling_changes"], 1);
        assert!(value.get("text").is_none());
    }
}
