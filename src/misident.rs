//! Misidentification heuristics
//!
//! External lookups by title/year sometimes land on the wrong record.
//! These checks flag suspicious cross-matches; the result is a
//! `" | "`-joined list of triggered hints, empty when nothing looks off.

use crate::config::AnalysisConfig;
use crate::extract::{parse_lead_year, RatingPayload};
use crate::models::RatingSignals;

const HINT_SEPARATOR: &str = " | ";

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Check a fetched payload against the local record.
///
/// Checks run in a fixed order: title mismatch, year mismatch, low IMDb
/// rating despite high vote count, low RT score despite high vote count.
/// Extended-edition style variants are exempt from the title check
/// (substring containment either way counts as a match). A garbled
/// external year never produces a year hint.
pub fn detect(
    local_title: &str,
    local_year: Option<i32>,
    payload: Option<&RatingPayload>,
    signals: &RatingSignals,
    cfg: &AnalysisConfig,
) -> String {
    let Some(payload) = payload else {
        return String::new();
    };

    let mut hints: Vec<String> = Vec::new();

    if let Some(external_title) = payload.title.as_deref() {
        let local = normalize_title(local_title);
        let external = normalize_title(external_title);
        if !local.is_empty()
            && !external.is_empty()
            && local != external
            && !local.contains(&external)
            && !external.contains(&local)
        {
            hints.push(format!(
                "Title mismatch: local={local_title} vs external={external_title}"
            ));
        }
    }

    if let (Some(local_y), Some(external_y)) = (
        local_year,
        payload.year.as_deref().and_then(parse_lead_year),
    ) {
        if (local_y - external_y).abs() > 1 {
            hints.push(format!(
                "Year mismatch: local={local_y}, external={external_y}"
            ));
        }
    }

    if let (Some(rating), Some(votes)) = (signals.imdb_rating, signals.imdb_votes) {
        if rating < cfg.hint_low_rating_max && votes > cfg.hint_well_known_votes {
            hints.push(format!(
                "IMDb {rating:.1} despite {votes} votes suggests a wrong match"
            ));
        }
    }

    if let (Some(rt), Some(votes)) = (signals.rt_score, signals.imdb_votes) {
        if rt < cfg.hint_low_rt_max && votes > cfg.hint_well_known_votes {
            hints.push(format!(
                "RT {rt}% despite {votes} votes suggests a wrong match"
            ));
        }
    }

    hints.join(HINT_SEPARATOR)
}
