//! Text (terminal) reporter with colors and formatting

use crate::models::{candidate_rows, AnalysisReport, AnalyzedRow, Decision};
use anyhow::Result;

/// Decision colors (ANSI escape codes)
fn decision_color(decision: Decision) -> &'static str {
    match decision {
        Decision::Delete => "\x1b[31m",  // Red
        Decision::Maybe => "\x1b[33m",   // Yellow
        Decision::Keep => "\x1b[32m",    // Green
        Decision::Unknown => "\x1b[90m", // Gray
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn render_row(out: &mut String, row: &AnalyzedRow) {
    let color = decision_color(row.decision);
    let year = row.year.map_or_else(|| "????".to_string(), |y| y.to_string());
    out.push_str(&format!(
        "  {color}{:<7}{RESET} {BOLD}{}{RESET} ({year})",
        row.decision.to_string(),
        row.title
    ));
    if let Some(size) = row.file_size_bytes {
        out.push_str(&format!(" {DIM}[{}]{RESET}", human_size(size)));
    }
    out.push('\n');
    out.push_str(&format!("          {DIM}{}{RESET}\n", row.reason));
    if !row.misidentified_hint.is_empty() {
        out.push_str(&format!("          {DIM}suspect: {}{RESET}\n", row.misidentified_hint));
    }
}

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str(&format!("\n{BOLD}cinecull{RESET} — {}\n", report.scanned_path));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "{} titles: {}{} KEEP{}  {}{} DELETE{}  {}{} MAYBE{}  {}{} UNKNOWN{}\n",
        s.total,
        decision_color(Decision::Keep),
        s.keep,
        RESET,
        decision_color(Decision::Delete),
        s.delete,
        RESET,
        decision_color(Decision::Maybe),
        s.maybe,
        RESET,
        decision_color(Decision::Unknown),
        s.unknown,
        RESET,
    ));
    if s.reclaimable_bytes > 0 {
        out.push_str(&format!(
            "Reclaimable: {BOLD}{}{RESET} across {} DELETE-flagged files\n",
            human_size(s.reclaimable_bytes),
            s.delete
        ));
    }
    out.push('\n');

    let candidates = candidate_rows(&report.rows);
    if candidates.is_empty() {
        out.push_str("Nothing flagged for deletion or review.\n");
    } else {
        out.push_str(&format!("{BOLD}CANDIDATES{RESET} ({})\n", candidates.len()));
        for row in &candidates {
            render_row(&mut out, row);
        }
    }

    let suspects: Vec<&AnalyzedRow> = report
        .rows
        .iter()
        .filter(|r| !r.misidentified_hint.is_empty())
        .collect();
    if !suspects.is_empty() {
        out.push_str(&format!(
            "\n{BOLD}POSSIBLE WRONG MATCHES{RESET} ({}) — check title/year metadata\n",
            suspects.len()
        ));
        for row in suspects {
            out.push_str(&format!(
                "  {} ({}) — {}\n",
                row.title,
                row.year.map_or_else(|| "????".to_string(), |y| y.to_string()),
                row.misidentified_hint
            ));
        }
    }

    Ok(out)
}
