//! Rendering of classification results for the terminal.

use std::io::{self, Write};

use crate::core::result::MatchResult;
use crate::core::types::MatchSource;
use crate::duty::DutyEstimate;
use crate::matching::engine::ScoredEntry;

/// Message shown when nothing matched
pub const NO_MATCH_MESSAGE: &str = "No matching HS code found";

pub fn write_text(
    out: &mut impl Write,
    query: &str,
    result: &MatchResult,
    estimate: Option<&DutyEstimate>,
) -> io::Result<()> {
    writeln!(out, "Query: {query}")?;

    let MatchResult::Match(m) = result else {
        writeln!(out, "   {NO_MATCH_MESSAGE}")?;
        return Ok(());
    };

    writeln!(out, "   HS Code:     {}", m.classification_code)?;
    writeln!(out, "   Matched:     {}", m.reference_text)?;
    if m.description != m.reference_text {
        writeln!(out, "   Description: {}", m.description)?;
    }
    writeln!(out, "   Duty rate:   {}%", m.duty_percent)?;
    writeln!(
        out,
        "   Confidence:  {:.1}% ({})",
        m.confidence_score * 100.0,
        m.confidence()
    )?;
    writeln!(out, "   Source:      {}", m.source)?;

    if let Some(estimate) = estimate {
        writeln!(
            out,
            "   Duty on ${:.2} invoice: ${:.2}",
            estimate.invoice_value, estimate.estimated_duty
        )?;
    }

    Ok(())
}

pub fn write_alternatives_text(out: &mut impl Write, alternatives: &[ScoredEntry<'_>]) -> io::Result<()> {
    if alternatives.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n   Catalog candidates:")?;
    for (i, alt) in alternatives.iter().enumerate() {
        writeln!(
            out,
            "   {}. {:<10} {:>5.1}%  {}",
            i + 1,
            alt.entry.classification_code,
            alt.score * 100.0,
            alt.entry.reference_text
        )?;
    }
    Ok(())
}

#[must_use]
pub fn to_json(
    query: &str,
    result: &MatchResult,
    estimate: Option<&DutyEstimate>,
    alternatives: &[ScoredEntry<'_>],
) -> serde_json::Value {
    serde_json::json!({
        "query": query,
        "result": result,
        "estimate": estimate,
        "alternatives": alternatives.iter().map(|alt| {
            serde_json::json!({
                "index": alt.index,
                "classification_code": alt.entry.classification_code,
                "reference_text": alt.entry.reference_text,
                "duty_percent": alt.entry.duty_percent,
                "score": alt.score,
            })
        }).collect::<Vec<_>>(),
    })
}

pub const TSV_HEADER: &str =
    "query\tstatus\ths_code\treference_text\tduty_percent\tconfidence\tsource\testimated_duty";

fn source_label(source: MatchSource) -> &'static str {
    match source {
        MatchSource::Remote => "remote",
        MatchSource::Local => "local",
    }
}

/// Tabs and newlines would break the column layout
pub(crate) fn tsv_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

pub fn write_tsv_row(
    out: &mut impl Write,
    query: &str,
    result: &MatchResult,
    estimate: Option<&DutyEstimate>,
) -> io::Result<()> {
    let duty = estimate.map_or(String::new(), |e| format!("{:.2}", e.estimated_duty));
    match result {
        MatchResult::Match(m) => writeln!(
            out,
            "{}\tmatch\t{}\t{}\t{}\t{:.4}\t{}\t{}",
            tsv_field(query),
            tsv_field(&m.classification_code),
            tsv_field(&m.reference_text),
            m.duty_percent,
            m.confidence_score,
            source_label(m.source),
            duty
        ),
        MatchResult::NoMatch => writeln!(out, "{}\tno_match\t\t\t\t\t\t", tsv_field(query)),
    }
}
