//! CSV reporter
//!
//! One row per analyzed title. The column set and order is a
//! compatibility surface for spreadsheets and downstream scripts;
//! append new columns at the end, never rename or reorder.

use crate::models::{AnalysisReport, AnalyzedRow};
use anyhow::Result;

const COLUMNS: &[&str] = &[
    "source",
    "library",
    "title",
    "year",
    "imdb_rating",
    "imdb_votes",
    "rt_score",
    "metacritic",
    "decision",
    "reason",
    "rule_id",
    "misidentified_hint",
    "file",
    "file_size_bytes",
    "imdb_id",
    "external_title",
    "external_year",
];

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn record(row: &AnalyzedRow) -> Vec<String> {
    vec![
        row.source.to_string(),
        row.library.clone(),
        row.title.clone(),
        opt(&row.year),
        row.imdb_rating.map(|r| format!("{r:.1}")).unwrap_or_default(),
        opt(&row.imdb_votes),
        opt(&row.rt_score),
        opt(&row.metacritic),
        row.decision.to_string(),
        row.reason.clone(),
        row.rule_id.clone(),
        row.misidentified_hint.clone(),
        opt(&row.file),
        opt(&row.file_size_bytes),
        opt(&row.imdb_id),
        opt(&row.external_title),
        opt(&row.external_year),
    ]
}

/// Render report as CSV
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in &report.rows {
        writer.write_record(record(row))?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
