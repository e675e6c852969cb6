//! HTML reporter with embedded styles
//!
//! Generates a standalone HTML report viewable in any browser:
//! - Decision summary cards
//! - Sortable-by-eye candidates table, colored by decision
//! - Possible wrong matches with their hints
//! - Full library table

use crate::models::{candidate_rows, AnalysisReport, AnalyzedRow, Decision};
use anyhow::Result;
use chrono::Local;

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn decision_class(decision: Decision) -> &'static str {
    match decision {
        Decision::Keep => "keep",
        Decision::Delete => "delete",
        Decision::Maybe => "maybe",
        Decision::Unknown => "unknown",
    }
}

fn fmt_opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| escape(&v.to_string()))
        .unwrap_or_else(|| "–".to_string())
}

/// Render report as standalone HTML
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut html = String::new();

    html.push_str(&render_head(report));
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header(report));
    html.push_str(&render_summary(report));

    let candidates = candidate_rows(&report.rows);
    html.push_str(&render_table(
        "Candidates (DELETE / MAYBE)",
        "candidates",
        &candidates,
    ));

    let suspects: Vec<AnalyzedRow> = report
        .rows
        .iter()
        .filter(|r| !r.misidentified_hint.is_empty())
        .cloned()
        .collect();
    if !suspects.is_empty() {
        html.push_str(&render_suspects(&suspects));
    }

    html.push_str(&render_table("All titles", "all", &report.rows));
    html.push_str(&render_footer());
    html.push_str("</div>\n</body>\n</html>");

    Ok(html)
}

fn render_head(report: &AnalysisReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>cinecull report — {path}</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f5f6f8; color: #222; }}
        .container {{ max-width: 1100px; margin: 0 auto; padding: 24px; }}
        h1 {{ margin: 0 0 4px; font-size: 1.6em; }}
        h2 {{ margin: 32px 0 8px; font-size: 1.15em; }}
        .meta {{ color: #777; font-size: 0.9em; }}
        .cards {{ display: flex; gap: 12px; margin: 20px 0; flex-wrap: wrap; }}
        .card {{ background: #fff; border-radius: 8px; padding: 14px 20px; min-width: 100px;
                 box-shadow: 0 1px 3px rgba(0,0,0,0.08); text-align: center; }}
        .card .num {{ font-size: 1.6em; font-weight: 700; }}
        table {{ width: 100%; border-collapse: collapse; background: #fff; border-radius: 8px;
                 box-shadow: 0 1px 3px rgba(0,0,0,0.08); font-size: 0.9em; }}
        th, td {{ padding: 8px 10px; text-align: left; border-bottom: 1px solid #eee; }}
        th {{ background: #fafafa; font-weight: 600; }}
        tr:last-child td {{ border-bottom: none; }}
        .badge {{ display: inline-block; padding: 2px 8px; border-radius: 10px; font-size: 0.85em;
                  font-weight: 600; color: #fff; }}
        .badge.keep {{ background: #2e9e4f; }}
        .badge.delete {{ background: #d33c3c; }}
        .badge.maybe {{ background: #d99a28; }}
        .badge.unknown {{ background: #888; }}
        .reason {{ color: #666; font-size: 0.85em; }}
        .hint {{ color: #b05a00; font-size: 0.85em; }}
        .footer {{ margin-top: 32px; color: #999; font-size: 0.8em; text-align: center; }}
    </style>
</head>
"#,
        path = escape(&report.scanned_path)
    )
}

fn render_header(report: &AnalysisReport) -> String {
    format!(
        "<h1>cinecull report</h1>\n<div class=\"meta\">{} — generated {}</div>\n",
        escape(&report.scanned_path),
        escape(&report.generated_at)
    )
}

fn render_summary(report: &AnalysisReport) -> String {
    let s = &report.summary;
    let mut cards = String::from("<div class=\"cards\">\n");
    for (label, class, count) in [
        ("KEEP", "keep", s.keep),
        ("DELETE", "delete", s.delete),
        ("MAYBE", "maybe", s.maybe),
        ("UNKNOWN", "unknown", s.unknown),
    ] {
        cards.push_str(&format!(
            "<div class=\"card\"><div class=\"num\">{count}</div><span class=\"badge {class}\">{label}</span></div>\n"
        ));
    }
    cards.push_str(&format!(
        "<div class=\"card\"><div class=\"num\">{}</div><div class=\"meta\">reclaimable GB</div></div>\n",
        s.reclaimable_bytes / 1_000_000_000
    ));
    cards.push_str("</div>\n");
    cards
}

fn render_table(title: &str, _id: &str, rows: &[AnalyzedRow]) -> String {
    let mut out = format!("<h2>{} ({})</h2>\n", escape(title), rows.len());
    out.push_str(
        "<table>\n<tr><th>Decision</th><th>Title</th><th>Year</th><th>IMDb</th>\
         <th>Votes</th><th>RT</th><th>Size</th><th>Why</th></tr>\n",
    );
    for row in rows {
        let class = decision_class(row.decision);
        let size = row
            .file_size_bytes
            .map(|b| format!("{:.1} GB", b as f64 / 1e9))
            .unwrap_or_else(|| "–".to_string());
        out.push_str(&format!(
            "<tr><td><span class=\"badge {class}\">{}</span></td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"reason\">{}</td></tr>\n",
            row.decision,
            escape(&row.title),
            fmt_opt(&row.year),
            row.imdb_rating
                .map(|r| format!("{r:.1}"))
                .unwrap_or_else(|| "–".to_string()),
            fmt_opt(&row.imdb_votes),
            row.rt_score
                .map(|s| format!("{s}%"))
                .unwrap_or_else(|| "–".to_string()),
            size,
            escape(&row.reason),
        ));
    }
    out.push_str("</table>\n");
    out
}

fn render_suspects(rows: &[AnalyzedRow]) -> String {
    let mut out = format!(
        "<h2>Possible wrong matches ({})</h2>\n<table>\n\
         <tr><th>Title</th><th>Year</th><th>Matched as</th><th>Hint</th></tr>\n",
        rows.len()
    );
    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{} ({})</td><td class=\"hint\">{}</td></tr>\n",
            escape(&row.title),
            fmt_opt(&row.year),
            fmt_opt(&row.external_title),
            fmt_opt(&row.external_year),
            escape(&row.misidentified_hint),
        ));
    }
    out.push_str("</table>\n");
    out
}

fn render_footer() -> String {
    format!(
        "<div class=\"footer\">cinecull {} — rendered {}</div>\n",
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%d %H:%M")
    )
}
