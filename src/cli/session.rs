//! Interactive classification session.
//!
//! Each input line is classified on its own. Results are kept in an
//! append-only history for the lifetime of the session; `:history` shows it
//! most recent first and `:quit` ends the session.

use std::io::{BufRead, IsTerminal, Write};

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::classifier::Classifier;
use crate::cli::report;
use crate::cli::OutputFormat;
use crate::config::{ClassifierArgs, Settings};
use crate::core::result::MatchResult;
use crate::duty::DutyEstimate;
use crate::utils::validation::{validate_description, validate_invoice_value};

/// Invoice value used when none is given
pub const DEFAULT_INVOICE_VALUE: f64 = 1000.0;

#[derive(Args)]
pub struct SessionArgs {
    /// Invoice value to estimate duty on for every match
    #[arg(short, long, default_value_t = DEFAULT_INVOICE_VALUE)]
    pub invoice_value: f64,

    #[command(flatten)]
    pub classifier: ClassifierArgs,
}

/// One classified query
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub query: String,
    pub result: MatchResult,
    pub estimate: Option<DutyEstimate>,
    pub at: DateTime<Utc>,
}

/// Results of a session, oldest first
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest first
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}

enum Command<'a> {
    Quit,
    History,
    Classify(&'a str),
    Skip,
}

fn parse_line(line: &str) -> Command<'_> {
    match line.trim() {
        "" => Command::Skip,
        ":quit" | ":q" | ":exit" => Command::Quit,
        ":history" | ":h" => Command::History,
        query => Command::Classify(query),
    }
}

/// Execute session subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the catalog cannot be
/// loaded, or stdin/stdout fail.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SessionArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let invoice_value = validate_invoice_value(args.invoice_value)?;
    let settings = Settings::from_args(&args.classifier)?;
    let classifier = settings.build_classifier()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        eprintln!("Describe a shipment per line (:history to review, :quit to exit)");
    }

    let stdout = std::io::stdout();
    let mut history = History::default();
    run_session(
        &classifier,
        &runtime,
        invoice_value,
        format,
        interactive,
        stdin.lock(),
        stdout.lock(),
        &mut history,
    )?;

    if verbose {
        eprintln!("Classified {} descriptions", history.len());
    }
    Ok(())
}

/// Classify each line of `input` until it ends or `:quit` is read
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
#[allow(clippy::too_many_arguments)]
pub fn run_session<R: BufRead, W: Write>(
    classifier: &Classifier<'_>,
    runtime: &Runtime,
    invoice_value: f64,
    format: OutputFormat,
    interactive: bool,
    input: R,
    mut output: W,
    history: &mut History,
) -> anyhow::Result<()> {
    if matches!(format, OutputFormat::Tsv) {
        writeln!(output, "{}", report::TSV_HEADER)?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            eprint!("> ");
            std::io::stderr().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_line(&line) {
            Command::Skip => {}
            Command::Quit => break,
            Command::History => write_history(&mut output, history)?,
            Command::Classify(query) => {
                if let Err(e) = validate_description(query) {
                    writeln!(output, "Error: {e}")?;
                    continue;
                }
                let result = runtime.block_on(classifier.classify(query));
                let estimate = match result.as_match() {
                    Some(matched) => Some(classifier.estimate_duty(matched, invoice_value)?),
                    None => None,
                };
                write_result(&mut output, format, query, &result, estimate.as_ref())?;
                history.push(HistoryEntry {
                    query: query.to_string(),
                    result,
                    estimate,
                    at: Utc::now(),
                });
            }
        }
        output.flush()?;
    }

    Ok(())
}

fn write_result<W: Write>(
    output: &mut W,
    format: OutputFormat,
    query: &str,
    result: &MatchResult,
    estimate: Option<&DutyEstimate>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            report::write_text(output, query, result, estimate)?;
            writeln!(output)?;
        }
        OutputFormat::Json => {
            let json = report::to_json(query, result, estimate, &[]);
            writeln!(output, "{}", serde_json::to_string(&json)?)?;
        }
        OutputFormat::Tsv => report::write_tsv_row(output, query, result, estimate)?,
    }
    Ok(())
}

fn write_history<W: Write>(output: &mut W, history: &History) -> std::io::Result<()> {
    if history.is_empty() {
        return writeln!(output, "No previous queries");
    }
    writeln!(output, "History ({} queries, most recent first):", history.len())?;
    for entry in history.recent() {
        let outcome = match (&entry.result, &entry.estimate) {
            (MatchResult::Match(m), Some(est)) => {
                format!("{} ({}%) ${:.2}", m.classification_code, m.duty_percent, est.estimated_duty)
            }
            (MatchResult::Match(m), None) => {
                format!("{} ({}%)", m.classification_code, m.duty_percent)
            }
            (MatchResult::NoMatch, _) => "no match".to_string(),
        };
        writeln!(
            output,
            "  [{}] {} -> {}",
            entry.at.format("%H:%M:%S"),
            entry.query,
            outcome
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::catalog::store::ProductCatalog;
    use crate::core::types::ReferenceField;
    use crate::matching::engine::MatchingConfig;

    fn session(input: &str, format: OutputFormat) -> (String, History) {
        let catalog = ProductCatalog::load_embedded(ReferenceField::Product).unwrap();
        let classifier = Classifier::new(&catalog, MatchingConfig::default());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let mut output = Vec::new();
        let mut history = History::default();
        run_session(
            &classifier,
            &runtime,
            DEFAULT_INVOICE_VALUE,
            format,
            false,
            Cursor::new(input.to_string()),
            &mut output,
            &mut history,
        )
        .unwrap();
        (String::from_utf8(output).unwrap(), history)
    }

    #[test]
    fn test_session_classifies_each_line() {
        let (out, history) = session(
            "Shipping solar panels from Vietnam to US\n\nxyzzy quantum widget\n",
            OutputFormat::Text,
        );

        assert_eq!(history.len(), 2);
        assert!(out.contains("HS Code:     8541.40"));
        assert!(out.contains("Duty on $1000.00 invoice: $50.00"));
        assert!(out.contains(report::NO_MATCH_MESSAGE));
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let (out, history) = session("bicycles\nred wine\n:history\n", OutputFormat::Text);

        let recent: Vec<&str> = history.recent().map(|e| e.query.as_str()).collect();
        assert_eq!(recent, vec!["red wine", "bicycles"]);

        let listing = out.split("History (2 queries").nth(1).unwrap();
        let wine = listing.find("red wine -> 2204.21").unwrap();
        let bikes = listing.find("bicycles -> 8712.00").unwrap();
        assert!(wine < bikes);
    }

    #[test]
    fn test_quit_stops_reading() {
        let (_, history) = session("bicycles\n:quit\nred wine\n", OutputFormat::Text);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_empty_history_and_json_lines() {
        let (out, _) = session(":history\n", OutputFormat::Text);
        assert!(out.contains("No previous queries"));

        let (out, _) = session("bicycles\n", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["result"]["classification_code"], "8712.00");
        assert_eq!(value["estimate"]["estimated_duty"], 110.0);
    }

    #[test]
    fn test_tsv_header_written_once() {
        let (out, _) = session("bicycles\nred wine\n", OutputFormat::Tsv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], report::TSV_HEADER);
    }
}
