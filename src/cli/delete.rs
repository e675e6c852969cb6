//! Delete command - physically remove DELETE-flagged files
//!
//! Works from a saved JSON report, never from a live analysis, so the
//! user always reviews before anything touches the disk. Dry run unless
//! --force is given.

use crate::models::{AnalysisReport, AnalyzedRow, Decision};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn run(report_path: &Path, force: bool) -> Result<()> {
    let content = std::fs::read_to_string(report_path)
        .with_context(|| format!("reading report {}", report_path.display()))?;
    let report: AnalysisReport = serde_json::from_str(&content)
        .with_context(|| format!("parsing report {}", report_path.display()))?;

    let targets: Vec<&AnalyzedRow> = report
        .rows
        .iter()
        .filter(|r| r.decision == Decision::Delete && r.file.is_some())
        .collect();

    if targets.is_empty() {
        println!("No DELETE-flagged files in this report.");
        return Ok(());
    }

    println!(
        "{} DELETE-flagged file{}:",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" }
    );
    for row in &targets {
        let file = row.file.as_deref().unwrap_or_default();
        println!(
            "  {} {} — {}",
            style(&row.title).bold(),
            row.year.map_or_else(String::new, |y| format!("({y})")),
            file
        );
        println!("    {}", style(&row.reason).dim());
    }

    if !force {
        println!(
            "\nDry run - nothing removed. Run with {} to delete.",
            style("--force").yellow()
        );
        return Ok(());
    }

    println!();
    let mut removed = 0usize;
    let mut freed = 0u64;
    for row in &targets {
        let file = row.file.as_deref().unwrap_or_default();
        match std::fs::remove_file(file) {
            Ok(_) => {
                removed += 1;
                freed += row.file_size_bytes.unwrap_or(0);
                println!("{} {}", style("Removed:").green(), file);
            }
            Err(e) => eprintln!("{} {}: {}", style("Failed:").red(), file, e),
        }
    }

    println!(
        "\nDeleted {} of {} file{}, freed ~{:.1} GB.",
        removed,
        targets.len(),
        if targets.len() == 1 { "" } else { "s" },
        freed as f64 / 1e9
    );

    Ok(())
}
